#![allow(dead_code)]

use axum_test::TestServer;
use sqlx::PgPool;
use std::sync::Arc;
use tinylink::domain::repositories::LinkRepository;
use tinylink::infrastructure::persistence::{InMemoryLinkRepository, PgLinkRepository};
use tinylink::routes::app_router;
use tinylink::state::AppState;

pub const BASE_URL: &str = "http://localhost:3000";

/// App state over a fresh in-memory store. The store is returned so tests can
/// inspect it directly.
pub fn create_test_state() -> (AppState, Arc<InMemoryLinkRepository>) {
    let repo = Arc::new(InMemoryLinkRepository::new());
    let state = AppState::from_repository(repo.clone(), 10, BASE_URL);
    (state, repo)
}

/// App state over a PostgreSQL test database.
pub fn create_pg_state(pool: PgPool) -> AppState {
    let repo: Arc<dyn LinkRepository> = Arc::new(PgLinkRepository::new(Arc::new(pool)));
    AppState::from_repository(repo, 10, BASE_URL)
}

/// Full application router behind a test server.
pub fn test_server(state: AppState) -> TestServer {
    TestServer::new(app_router(state)).unwrap()
}

pub async fn create_test_link(pool: &PgPool, code: &str, url: &str) {
    sqlx::query("INSERT INTO links (code, url) VALUES ($1, $2)")
        .bind(code)
        .bind(url)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn create_deleted_link(pool: &PgPool, code: &str, url: &str) {
    sqlx::query("INSERT INTO links (code, url, deleted) VALUES ($1, $2, TRUE)")
        .bind(code)
        .bind(url)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn clicks_of(pool: &PgPool, code: &str) -> i64 {
    sqlx::query_scalar("SELECT clicks FROM links WHERE code = $1")
        .bind(code)
        .fetch_one(pool)
        .await
        .unwrap()
}
