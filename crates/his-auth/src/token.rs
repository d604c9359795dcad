//! Staff session tokens.
//!
//! Tokens are HS256 JWTs carrying `username`, `hospital` and `exp`. The signing
//! secret is passed to [`TokenService::new`]; nothing here reads the environment.

use std::fmt;

use his_core::{CoreError, Identity, StaffAccount};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::{Duration, OffsetDateTime};

use crate::error::{AuthError, AuthResult};

/// Default token lifetime.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::hours(24);

/// Claims written into every issued token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffClaims {
    pub username: String,
    pub hospital: String,
    /// Expiration as a Unix timestamp.
    pub exp: i64,
}

/// Issues and verifies staff tokens.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issues a token for `staff`, expiring after the configured lifetime.
    pub fn issue(&self, staff: &StaffAccount) -> AuthResult<String> {
        let exp = OffsetDateTime::now_utc()
            .checked_add(self.ttl)
            .ok_or_else(|| AuthError::token_issue("token lifetime overflows the calendar"))?
            .unix_timestamp();
        self.issue_claims(&StaffClaims {
            username: staff.username.clone(),
            hospital: staff.hospital.clone(),
            exp,
        })
    }

    /// Signs arbitrary staff claims.
    pub fn issue_claims(&self, claims: &StaffClaims) -> AuthResult<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AuthError::token_issue(e.to_string()))
    }

    /// Verifies `token` and resolves the caller identity.
    ///
    /// # Errors
    ///
    /// - `InvalidToken` when the signature, structure or expiry check fails
    /// - `InvalidTokenData` when `username` or `hospital` is missing, not a
    ///   string, or blank
    pub fn verify(&self, token: &str) -> AuthResult<Identity> {
        let claims = decode::<Map<String, Value>>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "Token verification failed");
                AuthError::invalid_token(e.to_string())
            })?
            .claims;

        let username = string_claim(&claims, "username")?;
        let hospital = string_claim(&claims, "hospital")?;

        Identity::new(username, hospital).map_err(|e| match e {
            CoreError::EmptyIdentityAttribute { attribute } => {
                AuthError::invalid_token_data(attribute)
            }
            other => AuthError::invalid_token(other.to_string()),
        })
    }
}

fn string_claim<'a>(claims: &'a Map<String, Value>, name: &'static str) -> AuthResult<&'a str> {
    claims
        .get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| AuthError::invalid_token_data(name))
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("algorithm", &"HS256")
            .field("secret", &"<redacted>")
            .field("ttl", &self.ttl)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SECRET: &str = "test-secret";

    fn service() -> TokenService {
        TokenService::new(SECRET, DEFAULT_TOKEN_TTL)
    }

    fn staff() -> StaffAccount {
        StaffAccount {
            id: 1,
            username: "admin".into(),
            password_hash: String::new(),
            hospital: "Hospital".into(),
        }
    }

    fn raw_token(claims: Value) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    fn in_one_hour() -> i64 {
        (OffsetDateTime::now_utc() + Duration::hours(1)).unix_timestamp()
    }

    #[test]
    fn test_issue_and_verify() {
        let service = service();
        let token = service.issue(&staff()).unwrap();
        let identity = service.verify(&token).unwrap();
        assert_eq!(identity.username(), "admin");
        assert_eq!(identity.hospital(), "Hospital");
    }

    #[test]
    fn test_oversized_ttl_fails_to_issue() {
        let service = TokenService::new(SECRET, Duration::seconds(1_000_000_000_000));
        assert!(matches!(
            service.issue(&staff()),
            Err(AuthError::TokenIssue { .. })
        ));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = TokenService::new("other", DEFAULT_TOKEN_TTL)
            .issue(&staff())
            .unwrap();
        assert!(matches!(
            service().verify(&token),
            Err(AuthError::InvalidToken { .. })
        ));
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(matches!(
            service().verify("invalid_token"),
            Err(AuthError::InvalidToken { .. })
        ));
    }

    #[test]
    fn test_expired_rejected() {
        let service = service();
        let token = service
            .issue_claims(&StaffClaims {
                username: "admin".into(),
                hospital: "Hospital".into(),
                exp: (OffsetDateTime::now_utc() - Duration::hours(1)).unix_timestamp(),
            })
            .unwrap();
        assert!(matches!(
            service.verify(&token),
            Err(AuthError::InvalidToken { .. })
        ));
    }

    #[test]
    fn test_missing_hospital_claim() {
        let token = raw_token(json!({ "username": "admin", "exp": in_one_hour() }));
        assert!(matches!(
            service().verify(&token),
            Err(AuthError::InvalidTokenData { claim: "hospital" })
        ));
    }

    #[test]
    fn test_non_string_username_claim() {
        let token = raw_token(json!({ "username": 42, "hospital": "Hospital", "exp": in_one_hour() }));
        assert!(matches!(
            service().verify(&token),
            Err(AuthError::InvalidTokenData { claim: "username" })
        ));
    }

    #[test]
    fn test_blank_hospital_claim() {
        let token = raw_token(json!({ "username": "admin", "hospital": " ", "exp": in_one_hour() }));
        assert!(matches!(
            service().verify(&token),
            Err(AuthError::InvalidTokenData { claim: "hospital" })
        ));
    }

    #[test]
    fn test_debug_redacts_secret() {
        assert!(!format!("{:?}", service()).contains(SECRET));
    }
}
