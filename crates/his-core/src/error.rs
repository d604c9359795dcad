use thiserror::Error;

/// Core error types for HIS domain values
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Identity attribute '{attribute}' must not be empty")]
    EmptyIdentityAttribute { attribute: &'static str },

    #[error("Invalid calendar date '{input}': {reason}")]
    InvalidDate { input: String, reason: String },

    #[error("Invalid gender code: {0}")]
    InvalidGender(String),
}

impl CoreError {
    /// Create a new EmptyIdentityAttribute error
    pub fn empty_identity_attribute(attribute: &'static str) -> Self {
        Self::EmptyIdentityAttribute { attribute }
    }

    /// Create a new InvalidDate error
    pub fn invalid_date(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDate {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Create a new InvalidGender error
    pub fn invalid_gender(code: impl Into<String>) -> Self {
        Self::InvalidGender(code.into())
    }
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
