//! Code allocation: validate a requested code or generate a free one.

use std::sync::Arc;

use serde_json::json;

use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::{generate_code, validate_custom_code};

/// Default number of generation attempts before giving up.
pub const DEFAULT_MAX_ATTEMPTS: usize = 10;

/// Produces valid, currently unused codes.
///
/// Only reads from the store. Inserting the record is the caller's job, so a
/// concurrent writer can still take the code in between; the store's primary
/// key has the final word (see [`crate::application::services::LinkService`]).
pub struct CodeAllocator<L: LinkRepository + ?Sized> {
    link_repository: Arc<L>,
    max_attempts: usize,
}

impl<L: LinkRepository + ?Sized> CodeAllocator<L> {
    pub fn new(link_repository: Arc<L>) -> Self {
        Self::with_max_attempts(link_repository, DEFAULT_MAX_ATTEMPTS)
    }

    /// Creates an allocator with a custom retry bound (at least one attempt).
    pub fn with_max_attempts(link_repository: Arc<L>, max_attempts: usize) -> Self {
        Self {
            link_repository,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Returns a code for a new link.
    ///
    /// A requested code that is blank after trimming counts as absent.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] if the requested code is malformed; the store
    ///   is not consulted
    /// - [`AppError::Conflict`] if the requested code exists, deleted or not
    /// - [`AppError::AllocationExhausted`] if every generated candidate collided
    /// - storage errors unchanged
    pub async fn allocate(&self, requested_code: Option<&str>) -> Result<String, AppError> {
        match requested_code.filter(|c| !c.trim().is_empty()) {
            Some(requested) => self.claim(requested).await,
            None => self.generate().await,
        }
    }

    async fn claim(&self, requested: &str) -> Result<String, AppError> {
        let code = validate_custom_code(requested)?;

        if self.link_repository.get_any(&code).await?.is_some() {
            return Err(code_taken(&code));
        }

        Ok(code)
    }

    async fn generate(&self) -> Result<String, AppError> {
        for attempt in 1..=self.max_attempts {
            let code = generate_code();

            if self.link_repository.get_any(&code).await?.is_none() {
                return Ok(code);
            }

            metrics::counter!("code_allocation_collisions_total").increment(1);
            tracing::debug!(attempt, code = %code, "Generated code collided, retrying");
        }

        tracing::warn!(
            attempts = self.max_attempts,
            "Code allocation exhausted its retry budget"
        );

        Err(AppError::exhausted(
            "Failed to generate unique code",
            json!({ "reason": "AllocationExhausted", "attempts": self.max_attempts }),
        ))
    }
}

/// Conflict error for a code that is already in use.
pub(crate) fn code_taken(code: &str) -> AppError {
    AppError::conflict(
        "Code already exists",
        json!({ "reason": "CodeAlreadyExists", "code": code }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Link;
    use crate::domain::repositories::MockLinkRepository;
    use chrono::Utc;

    fn existing(code: &str, deleted: bool) -> Link {
        let mut link = Link::new(
            code.to_string(),
            "https://example.com".to_string(),
            Utc::now(),
        );
        link.deleted = deleted;
        link
    }

    #[tokio::test]
    async fn test_custom_code_free() {
        let mut repo = MockLinkRepository::new();
        repo.expect_get_any()
            .withf(|code| code == "abc123")
            .times(1)
            .returning(|_| Ok(None));

        let allocator = CodeAllocator::new(Arc::new(repo));

        assert_eq!(allocator.allocate(Some("abc123")).await.unwrap(), "abc123");
    }

    #[tokio::test]
    async fn test_custom_code_trimmed_success() {
        let mut repo = MockLinkRepository::new();
        repo.expect_get_any()
            .withf(|code| code == "Promo25")
            .times(1)
            .returning(|_| Ok(None));

        let allocator = CodeAllocator::new(Arc::new(repo));

        assert_eq!(allocator.allocate(Some(" Promo25\n")).await.unwrap(), "Promo25");
    }

    #[tokio::test]
    async fn test_custom_code_taken() {
        let mut repo = MockLinkRepository::new();
        repo.expect_get_any()
            .times(1)
            .returning(|code| Ok(Some(existing(code, false))));

        let allocator = CodeAllocator::new(Arc::new(repo));
        let err = allocator.allocate(Some("abc123")).await.unwrap_err();

        assert!(matches!(err, AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_custom_code_taken_by_deleted_link() {
        let mut repo = MockLinkRepository::new();
        repo.expect_get_any()
            .times(1)
            .returning(|code| Ok(Some(existing(code, true))));
        repo.expect_get_active().times(0);

        let allocator = CodeAllocator::new(Arc::new(repo));
        let err = allocator.allocate(Some("gone12")).await.unwrap_err();

        assert!(matches!(err, AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_malformed_custom_code_skips_store() {
        for code in ["abc", "abcdefghi", "abc-12", "abc 12", "äbc123"] {
            let mut repo = MockLinkRepository::new();
            repo.expect_get_any().times(0);

            let allocator = CodeAllocator::new(Arc::new(repo));
            let err = allocator.allocate(Some(code)).await.unwrap_err();

            assert!(
                matches!(err, AppError::Validation { .. }),
                "'{}' should be rejected",
                code
            );
        }
    }

    #[tokio::test]
    async fn test_absent_code_generates() {
        let mut repo = MockLinkRepository::new();
        repo.expect_get_any().times(1).returning(|_| Ok(None));

        let allocator = CodeAllocator::new(Arc::new(repo));
        let code = allocator.allocate(None).await.unwrap();

        assert_eq!(code.len(), 6);
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[tokio::test]
    async fn test_blank_code_generates() {
        let mut repo = MockLinkRepository::new();
        repo.expect_get_any().times(1).returning(|_| Ok(None));

        let allocator = CodeAllocator::new(Arc::new(repo));
        let code = allocator.allocate(Some("   ")).await.unwrap();

        assert_eq!(code.len(), 6);
    }

    #[tokio::test]
    async fn test_generation_retries_on_collision() {
        let mut repo = MockLinkRepository::new();
        let mut seq = mockall::Sequence::new();
        repo.expect_get_any()
            .times(2)
            .in_sequence(&mut seq)
            .returning(|code| Ok(Some(existing(code, false))));
        repo.expect_get_any()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(None));

        let allocator = CodeAllocator::new(Arc::new(repo));

        assert!(allocator.allocate(None).await.is_ok());
    }

    #[tokio::test]
    async fn test_generation_exhausted() {
        let mut repo = MockLinkRepository::new();
        repo.expect_get_any()
            .times(DEFAULT_MAX_ATTEMPTS)
            .returning(|code| Ok(Some(existing(code, false))));

        let allocator = CodeAllocator::new(Arc::new(repo));
        let err = allocator.allocate(None).await.unwrap_err();

        assert!(matches!(err, AppError::AllocationExhausted { .. }));
    }

    #[tokio::test]
    async fn test_custom_max_attempts() {
        let mut repo = MockLinkRepository::new();
        repo.expect_get_any()
            .times(3)
            .returning(|code| Ok(Some(existing(code, false))));

        let allocator = CodeAllocator::with_max_attempts(Arc::new(repo), 3);

        assert!(matches!(
            allocator.allocate(None).await.unwrap_err(),
            AppError::AllocationExhausted { .. }
        ));
    }

    #[tokio::test]
    async fn test_storage_error_is_not_retried() {
        let mut repo = MockLinkRepository::new();
        repo.expect_get_any()
            .times(1)
            .returning(|_| Err(AppError::unavailable("down", serde_json::json!({}))));

        let allocator = CodeAllocator::new(Arc::new(repo));

        assert!(matches!(
            allocator.allocate(None).await.unwrap_err(),
            AppError::StorageUnavailable { .. }
        ));
    }

    #[test]
    fn test_zero_attempts_is_clamped() {
        let allocator = CodeAllocator::with_max_attempts(Arc::new(MockLinkRepository::new()), 0);
        assert_eq!(allocator.max_attempts(), 1);
    }
}
