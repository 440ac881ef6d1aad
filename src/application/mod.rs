//! Application layer services implementing business logic.
//!
//! Services consume the [`crate::domain::repositories::LinkRepository`] trait
//! and give HTTP handlers and the admin CLI a small, validated API.
//!
//! # Available Services
//!
//! - [`services::code_allocator::CodeAllocator`] - Custom code checks and bounded random generation
//! - [`services::link_service::LinkService`] - Link creation, redirects, lookup and deletion

pub mod services;
