//! Repository trait for short link data access.

use crate::domain::entities::{Link, NewLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Storage contract for links.
///
/// Every mutating operation is a single atomic statement scoped by `code`,
/// so implementations are safe for any number of concurrent callers.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryLinkRepository`] - process-local map
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Finds a link by code, ignoring soft-deleted rows.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StorageUnavailable`] or [`AppError::Internal`] on database errors.
    async fn get_active(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Finds a link by code regardless of its delete state.
    ///
    /// Used for uniqueness checks: a deleted code is still taken.
    async fn get_any(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Lists active links, newest first.
    async fn list_active(&self) -> Result<Vec<Link>, AppError>;

    /// Inserts a new link with `clicks = 0` and `deleted = false`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the code already exists, including
    /// when a concurrent insert won the race after the allocator's check.
    async fn insert(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Atomically increments `clicks` and sets `last_clicked = now()` on the
    /// active link with this code.
    ///
    /// Returns `Ok(false)` if no active link matched.
    async fn record_click(&self, code: &str) -> Result<bool, AppError>;

    /// Marks an active link as deleted.
    ///
    /// Returns `Ok(true)` if the link was found and deleted, `Ok(false)` if not
    /// found or already deleted.
    async fn soft_delete(&self, code: &str) -> Result<bool, AppError>;

    /// Checks that the backend is reachable.
    async fn ping(&self) -> Result<(), AppError>;
}
