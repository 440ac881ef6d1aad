//! DTOs for link endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::Link;

/// Request to create a short link.
///
/// Only presence of `url` is checked here. URL scheme and code format are
/// checked by the service so that they report the dedicated `InvalidUrl` /
/// `InvalidCodeFormat` reasons; neither field has a length cap of its own.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    /// Target URL (absolute, HTTP or HTTPS). Missing counts as empty.
    #[serde(default)]
    #[validate(length(min = 1, message = "Invalid URL"))]
    pub url: String,

    /// Optional custom short code.
    pub code: Option<String>,
}

/// Response for a created link.
#[derive(Debug, Serialize)]
pub struct CreateLinkResponse {
    pub code: String,
    #[serde(rename = "shortUrl")]
    pub short_url: String,
}

/// Public representation of an active link.
#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub code: String,
    pub url: String,
    pub clicks: i64,
    pub last_clicked: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Link> for LinkResponse {
    fn from(link: Link) -> Self {
        Self {
            code: link.code,
            url: link.url,
            clicks: link.clicks,
            last_clicked: link.last_clicked,
            created_at: link.created_at,
        }
    }
}

/// Acknowledgement for a delete.
#[derive(Debug, Serialize)]
pub struct DeleteLinkResponse {
    pub ok: bool,
}
