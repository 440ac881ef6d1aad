//! Core domain entities.
//!
//! - [`Link`] - A shortened URL mapping with its click counter
//! - [`NewLink`] - Input for inserting a new link

pub mod link;

pub use link::{Link, NewLink};
