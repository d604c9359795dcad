//! Authentication error types.

/// Errors that can occur while authenticating a caller or issuing credentials.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No usable bearer credentials were presented.
    #[error("Missing credentials: {message}")]
    MissingCredentials { message: String },

    /// The token failed verification (signature, structure or expiry).
    #[error("Invalid token: {message}")]
    InvalidToken { message: String },

    /// The token verified but lacks a usable identity claim.
    #[error("Invalid token data: missing or empty '{claim}' claim")]
    InvalidTokenData { claim: &'static str },

    /// A token could not be signed.
    #[error("Token issue failed: {message}")]
    TokenIssue { message: String },

    /// A password could not be hashed or the stored hash is unreadable.
    #[error("Password hashing failed: {message}")]
    PasswordHash { message: String },
}

impl AuthError {
    /// Creates a new `MissingCredentials` error.
    #[must_use]
    pub fn missing_credentials(message: impl Into<String>) -> Self {
        Self::MissingCredentials {
            message: message.into(),
        }
    }

    /// Creates a new `InvalidToken` error.
    #[must_use]
    pub fn invalid_token(message: impl Into<String>) -> Self {
        Self::InvalidToken {
            message: message.into(),
        }
    }

    /// Creates a new `InvalidTokenData` error.
    #[must_use]
    pub fn invalid_token_data(claim: &'static str) -> Self {
        Self::InvalidTokenData { claim }
    }

    /// Creates a new `TokenIssue` error.
    #[must_use]
    pub fn token_issue(message: impl Into<String>) -> Self {
        Self::TokenIssue {
            message: message.into(),
        }
    }

    /// Creates a new `PasswordHash` error.
    #[must_use]
    pub fn password_hash(message: impl Into<String>) -> Self {
        Self::PasswordHash {
            message: message.into(),
        }
    }

    /// Returns `true` when the caller could not be authenticated.
    #[must_use]
    pub fn is_unauthenticated(&self) -> bool {
        matches!(
            self,
            Self::MissingCredentials { .. } | Self::InvalidToken { .. } | Self::InvalidTokenData { .. }
        )
    }

    /// Message safe to return to the client. Internal details stay in logs.
    #[must_use]
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::MissingCredentials { .. } => "Unauthorized",
            Self::InvalidToken { .. } => "Invalid token format",
            Self::InvalidTokenData { .. } => "Invalid token data",
            Self::TokenIssue { .. } => "Could not generate token",
            Self::PasswordHash { .. } => "Error hashing password",
        }
    }
}

impl From<argon2::password_hash::Error> for AuthError {
    fn from(err: argon2::password_hash::Error) -> Self {
        Self::password_hash(err.to_string())
    }
}

/// Result type alias for authentication operations.
pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_messages() {
        assert_eq!(
            AuthError::missing_credentials("no header").public_message(),
            "Unauthorized"
        );
        assert_eq!(
            AuthError::invalid_token("ExpiredSignature").public_message(),
            "Invalid token format"
        );
        assert_eq!(
            AuthError::invalid_token_data("hospital").public_message(),
            "Invalid token data"
        );
        assert_eq!(
            AuthError::token_issue("x").public_message(),
            "Could not generate token"
        );
    }

    #[test]
    fn test_unauthenticated_classification() {
        assert!(AuthError::missing_credentials("x").is_unauthenticated());
        assert!(AuthError::invalid_token_data("username").is_unauthenticated());
        assert!(!AuthError::password_hash("x").is_unauthenticated());
    }

    #[test]
    fn test_display_keeps_detail() {
        let err = AuthError::invalid_token_data("username");
        assert_eq!(
            err.to_string(),
            "Invalid token data: missing or empty 'username' claim"
        );
    }
}
