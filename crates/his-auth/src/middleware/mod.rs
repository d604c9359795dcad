//! HTTP integration: the bearer token extractor and error responses.

mod auth;
mod error;

pub use auth::{AuthState, BearerAuth};
