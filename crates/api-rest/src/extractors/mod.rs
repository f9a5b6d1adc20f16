//! Custom Axum extractors.

pub mod auth;
pub mod pagination;

pub use auth::{session_token, MaybePlayer};
pub use pagination::Page;
