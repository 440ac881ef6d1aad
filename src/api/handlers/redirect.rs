//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use url::Url;

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::code_generator::is_valid_code;

/// Redirects a short code to its target URL and counts the click.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Reject anything that cannot be a code without touching the store
/// 2. Look up the active link
/// 3. Atomically increment its click counter
/// 4. Return 302 Found
///
/// # Errors
///
/// Returns 404 Not Found if there is no active link for the code, including
/// when it was deleted between the lookup and the increment.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    if !is_valid_code(&code) {
        metrics::counter!("redirects_not_found_total").increment(1);
        return Err(AppError::not_found(
            "Short link not found",
            json!({ "code": code }),
        ));
    }

    let link = match state.link_service.follow_link(&code).await {
        Ok(link) => link,
        Err(e @ AppError::NotFound { .. }) => {
            metrics::counter!("redirects_not_found_total").increment(1);
            return Err(e);
        }
        Err(e) => return Err(e),
    };

    metrics::counter!("redirects_total").increment(1);
    tracing::debug!(code = %link.code, "Redirecting");

    let location = location_header(&link.url)?;

    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}

/// Builds the `Location` header.
///
/// Targets that are not plain header-safe ASCII are re-serialized through
/// [`Url`], which percent-encodes non-ASCII and drops tabs and newlines.
fn location_header(target: &str) -> Result<HeaderValue, AppError> {
    if target.is_ascii()
        && let Ok(value) = HeaderValue::from_str(target)
    {
        return Ok(value);
    }

    Url::parse(target)
        .ok()
        .and_then(|url| HeaderValue::from_str(url.as_str()).ok())
        .ok_or_else(|| {
            AppError::internal(
                "Stored URL is not a valid Location header",
                json!({ "url": target }),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_header_ascii_unchanged() {
        let value = location_header("https://example.com/a?b=c").unwrap();
        assert_eq!(value, "https://example.com/a?b=c");
    }

    #[test]
    fn test_location_header_encodes_unicode() {
        let value = location_header("https://example.com/café").unwrap();
        assert_eq!(value, "https://example.com/caf%C3%A9");
    }

    #[test]
    fn test_location_header_strips_newlines() {
        let value = location_header("https://example.com/\nX-Injected: 1").unwrap();
        assert!(!value.to_str().unwrap().contains('\n'));
    }
}
