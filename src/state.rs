//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::LinkService;
use crate::domain::repositories::LinkRepository;

/// Link service over whichever store the process was started with.
pub type DynLinkService = LinkService<dyn LinkRepository>;

#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<DynLinkService>,
    /// Prefix for short URLs in API responses, without trailing slash.
    pub base_url: Arc<str>,
}

impl AppState {
    pub fn new(link_service: Arc<DynLinkService>, base_url: impl Into<Arc<str>>) -> Self {
        Self {
            link_service,
            base_url: base_url.into(),
        }
    }

    /// Builds the state around a store, with the given allocation bound.
    pub fn from_repository(
        link_repository: Arc<dyn LinkRepository>,
        max_attempts: usize,
        base_url: impl Into<Arc<str>>,
    ) -> Self {
        let link_service = Arc::new(LinkService::with_max_attempts(
            link_repository,
            max_attempts,
        ));
        Self::new(link_service, base_url)
    }

    /// Full short URL for `code`.
    pub fn short_url(&self, code: &str) -> String {
        self.link_service.get_short_url(&self.base_url, code)
    }
}
