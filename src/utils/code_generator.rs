//! Short code generation and validation utilities.
//!
//! Generated and custom codes share one format: 6 to 8 ASCII letters or digits.

use crate::error::AppError;
use rand::Rng;
use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;

/// Length of generated codes.
pub const GENERATED_CODE_LENGTH: usize = 6;

/// Alphabet used for generated codes.
const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Codes that are well-formed but shadowed by a static route.
///
/// `/healthz` is matched before `/{code}`, so a link under that code could
/// never redirect. Generated codes are shorter than every entry.
pub const RESERVED_CODES: &[&str] = &["healthz"];

/// Accepted format for every code, generated or custom.
static CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]{6,8}$").expect("code regex is valid"));

/// Generates a random 6-character alphanumeric code.
///
/// Uniqueness is not checked here; see
/// [`crate::application::services::CodeAllocator`].
///
/// # Examples
///
/// ```ignore
/// let code = generate_code();
/// assert_eq!(code.len(), 6);
/// assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
/// ```
pub fn generate_code() -> String {
    let mut rng = rand::rng();

    (0..GENERATED_CODE_LENGTH)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Returns true if `code` matches `^[A-Za-z0-9]{6,8}$`.
pub fn is_valid_code(code: &str) -> bool {
    CODE_REGEX.is_match(code)
}

/// Validates a caller-supplied code and returns its trimmed form.
///
/// Surrounding whitespace is ignored; the remainder must be 6-8 ASCII letters
/// or digits and must not be one of [`RESERVED_CODES`].
///
/// # Errors
///
/// Returns [`AppError::Validation`] with reason `InvalidCodeFormat`.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(validate_custom_code(" abc123 ").unwrap(), "abc123");
/// assert!(validate_custom_code("abc").is_err());      // Too short
/// assert!(validate_custom_code("abc-123").is_err());  // Hyphen
/// assert!(validate_custom_code("healthz").is_err());  // Reserved
/// ```
pub fn validate_custom_code(code: &str) -> Result<String, AppError> {
    let trimmed = code.trim();

    if !is_valid_code(trimmed) {
        return Err(AppError::bad_request(
            "Custom code must match [A-Za-z0-9]{6,8}",
            json!({ "reason": "InvalidCodeFormat", "code": trimmed }),
        ));
    }

    if RESERVED_CODES.contains(&trimmed) {
        return Err(AppError::bad_request(
            "This code is reserved",
            json!({ "reason": "InvalidCodeFormat", "code": trimmed }),
        ));
    }

    Ok(trimmed.to_string())
}
