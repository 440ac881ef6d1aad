//! In-process implementation of link repository.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use tokio::sync::RwLock;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// Link store backed by a `HashMap` behind an async `RwLock`.
///
/// Mutations take the write lock for their whole read-modify-write, which
/// gives the same per-code atomicity as the single-statement updates of
/// [`crate::infrastructure::persistence::PgLinkRepository`]. Data lives only as
/// long as the process.
#[derive(Default)]
pub struct InMemoryLinkRepository {
    links: RwLock<HashMap<String, Link>>,
}

impl InMemoryLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored links, deleted ones included.
    pub async fn len(&self) -> usize {
        self.links.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.links.read().await.is_empty()
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn get_active(&self, code: &str) -> Result<Option<Link>, AppError> {
        Ok(self
            .links
            .read()
            .await
            .get(code)
            .filter(|link| link.is_active())
            .cloned())
    }

    async fn get_any(&self, code: &str) -> Result<Option<Link>, AppError> {
        Ok(self.links.read().await.get(code).cloned())
    }

    async fn list_active(&self) -> Result<Vec<Link>, AppError> {
        let mut links: Vec<Link> = self
            .links
            .read()
            .await
            .values()
            .filter(|link| link.is_active())
            .cloned()
            .collect();

        links.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.code.cmp(&b.code))
        });

        Ok(links)
    }

    async fn insert(&self, new_link: NewLink) -> Result<Link, AppError> {
        let mut links = self.links.write().await;

        match links.entry(new_link.code) {
            Entry::Occupied(entry) => Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "links_pkey", "code": entry.key() }),
            )),
            Entry::Vacant(entry) => {
                let link = Link::new(entry.key().clone(), new_link.url, Utc::now());
                Ok(entry.insert(link).clone())
            }
        }
    }

    async fn record_click(&self, code: &str) -> Result<bool, AppError> {
        let mut links = self.links.write().await;

        match links.get_mut(code).filter(|link| link.is_active()) {
            Some(link) => {
                link.clicks += 1;
                link.last_clicked = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn soft_delete(&self, code: &str) -> Result<bool, AppError> {
        let mut links = self.links.write().await;

        match links.get_mut(code).filter(|link| link.is_active()) {
            Some(link) => {
                link.deleted = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
