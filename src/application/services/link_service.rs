//! Link creation, lookup, redirect counting and deletion.

use std::sync::Arc;

use crate::application::services::code_allocator::{CodeAllocator, code_taken};
use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::url_validator::validate_url;
use serde_json::json;

/// Service for creating, resolving and deleting short links.
///
/// # Creation
///
/// The URL is validated before anything touches the store. The allocator then
/// produces a code and the link is inserted. If the insert loses a race on the
/// primary key, a generated code is re-allocated (within the allocator's
/// attempt bound) while a caller-supplied code fails with a conflict.
pub struct LinkService<L: LinkRepository + ?Sized> {
    link_repository: Arc<L>,
    allocator: CodeAllocator<L>,
}

impl<L: LinkRepository + ?Sized> LinkService<L> {
    /// Creates a new link service with the default allocation bound.
    pub fn new(link_repository: Arc<L>) -> Self {
        let allocator = CodeAllocator::new(link_repository.clone());
        Self {
            link_repository,
            allocator,
        }
    }

    /// Creates a link service whose allocator gives up after `max_attempts`.
    pub fn with_max_attempts(link_repository: Arc<L>, max_attempts: usize) -> Self {
        let allocator = CodeAllocator::with_max_attempts(link_repository.clone(), max_attempts);
        Self {
            link_repository,
            allocator,
        }
    }

    /// Creates a short link.
    ///
    /// # Arguments
    ///
    /// - `url` - Absolute `http`/`https` target, stored as given
    /// - `custom_code` - Optional code; blank counts as absent
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] for an invalid URL or code format
    /// - [`AppError::Conflict`] if the custom code is taken
    /// - [`AppError::AllocationExhausted`] if no free code was found
    pub async fn create_link(
        &self,
        url: String,
        custom_code: Option<String>,
    ) -> Result<Link, AppError> {
        validate_url(&url).map_err(|e| {
            AppError::bad_request(
                "Invalid URL",
                json!({ "reason": "InvalidUrl", "detail": e.to_string() }),
            )
        })?;

        let custom_code = custom_code.filter(|c| !c.trim().is_empty());
        let is_custom = custom_code.is_some();

        for _ in 0..self.allocator.max_attempts() {
            let code = self.allocator.allocate(custom_code.as_deref()).await?;

            let new_link = NewLink {
                code: code.clone(),
                url: url.clone(),
            };

            match self.link_repository.insert(new_link).await {
                Ok(link) => {
                    metrics::counter!("links_created_total").increment(1);
                    tracing::info!(code = %link.code, custom = is_custom, "Link created");
                    return Ok(link);
                }
                Err(AppError::Conflict { .. }) if is_custom => return Err(code_taken(&code)),
                Err(AppError::Conflict { .. }) => {
                    tracing::debug!("Generated code was taken before insert, reallocating");
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::exhausted(
            "Failed to generate unique code",
            json!({ "reason": "AllocationExhausted", "attempts": self.allocator.max_attempts() }),
        ))
    }

    /// Retrieves an active link by code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code is unknown or deleted.
    pub async fn get_link(&self, code: &str) -> Result<Link, AppError> {
        self.link_repository
            .get_active(code)
            .await?
            .ok_or_else(|| link_not_found(code))
    }

    /// Retrieves a link regardless of its delete state.
    pub async fn get_link_any(&self, code: &str) -> Result<Link, AppError> {
        self.link_repository
            .get_any(code)
            .await?
            .ok_or_else(|| link_not_found(code))
    }

    /// Lists active links, newest first.
    pub async fn list_links(&self) -> Result<Vec<Link>, AppError> {
        self.link_repository.list_active().await
    }

    /// Resolves a code for a redirect and counts the click.
    ///
    /// The link is fetched first, then the counter is bumped with a single
    /// atomic store operation. If the link is deleted in between, the redirect
    /// reports not found.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if there is no active link.
    pub async fn follow_link(&self, code: &str) -> Result<Link, AppError> {
        let link = self.get_link(code).await?;

        if !self.link_repository.record_click(code).await? {
            tracing::debug!(code, "Link disappeared before the click was recorded");
            return Err(link_not_found(code));
        }

        Ok(link)
    }

    /// Soft-deletes a link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the link is unknown or already deleted.
    pub async fn delete_link(&self, code: &str) -> Result<(), AppError> {
        if !self.link_repository.soft_delete(code).await? {
            return Err(AppError::not_found(
                "Link not found or already deleted",
                json!({ "code": code }),
            ));
        }

        metrics::counter!("links_deleted_total").increment(1);
        tracing::info!(code, "Link deleted");
        Ok(())
    }

    /// Checks that the store is reachable.
    pub async fn ping(&self) -> Result<(), AppError> {
        self.link_repository.ping().await
    }

    /// Builds the public short URL for `code`.
    pub fn get_short_url(&self, base_url: &str, code: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), code)
    }
}

fn link_not_found(code: &str) -> AppError {
    AppError::not_found("Short link not found", json!({ "code": code }))
}
