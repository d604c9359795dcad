//! Bearer token extractor.
//!
//! # Example
//!
//! ```ignore
//! use his_auth::{AuthError, BearerAuth};
//!
//! async fn handler(auth: Result<BearerAuth, AuthError>) -> impl IntoResponse {
//!     // the handler decides what to do with a missing identity
//! }
//! ```

use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use his_core::Identity;

use crate::error::AuthError;
use crate::token::TokenService;

/// State required by [`BearerAuth`], made available through `FromRef`.
#[derive(Debug, Clone)]
pub struct AuthState {
    pub tokens: Arc<TokenService>,
}

impl AuthState {
    pub fn new(tokens: Arc<TokenService>) -> Self {
        Self { tokens }
    }
}

/// Resolved identity of the caller presenting `Authorization: Bearer <token>`.
///
/// Rejects with:
/// - `MissingCredentials` when the header is absent or the token is blank
/// - `InvalidToken` for any other scheme or a token that fails verification
/// - `InvalidTokenData` when the token lacks usable identity claims
#[derive(Debug, Clone)]
pub struct BearerAuth(pub Identity);

impl<S> FromRequestParts<S> for BearerAuth
where
    S: Send + Sync,
    AuthState: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);

        let header = parts
            .headers
            .get(AUTHORIZATION)
            .map(|value| value.to_str().unwrap_or_default().trim())
            .unwrap_or_default();
        if header.is_empty() {
            return Err(AuthError::missing_credentials("Missing Authorization header"));
        }

        let token = bearer_token(header)
            .ok_or_else(|| AuthError::invalid_token("Authorization scheme is not Bearer"))?;
        if token.is_empty() {
            return Err(AuthError::missing_credentials("Empty Bearer token"));
        }

        let identity = auth_state.tokens.verify(token)?;
        tracing::debug!(
            username = %identity.username(),
            hospital = %identity.hospital(),
            "Token validated"
        );
        Ok(BearerAuth(identity))
    }
}

/// Returns the token after a case-insensitive `Bearer` scheme.
fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, rest) = header.split_once(' ').unwrap_or((header, ""));
    scheme
        .eq_ignore_ascii_case("bearer")
        .then(|| rest.trim())
}
