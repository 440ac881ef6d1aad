//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};

/// A shortened URL with its click counter.
///
/// `code` is the primary key and never changes after insertion. `clicks` and
/// `last_clicked` are only touched by the redirect path.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Link {
    pub code: String,
    pub url: String,
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
    pub last_clicked: Option<DateTime<Utc>>,
    pub deleted: bool,
}

impl Link {
    /// Creates a freshly inserted link: no clicks, not deleted.
    pub fn new(code: String, url: String, created_at: DateTime<Utc>) -> Self {
        Self {
            code,
            url,
            clicks: 0,
            created_at,
            last_clicked: None,
            deleted: false,
        }
    }

    /// Returns true unless the link has been soft-deleted.
    pub fn is_active(&self) -> bool {
        !self.deleted
    }
}

/// Input data for creating a new link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLink {
    pub code: String,
    pub url: String,
}
