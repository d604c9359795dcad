//! Validation errors raised while building a predicate.

use thiserror::Error;

/// Caller input that cannot be turned into a predicate.
///
/// The display strings are the messages returned to API callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// No recognized, non-empty criterion was supplied.
    #[error("At least one search criteria is required")]
    NoSearchCriteria,

    /// `date_of_birth` is not a `YYYY-MM-DD` calendar date.
    #[error("Invalid date_of_birth format. Use YYYY-MM-DD")]
    InvalidDateFormat {
        /// The rejected input.
        value: String,
    },
}

impl ValidationError {
    /// Creates a new `InvalidDateFormat` error.
    #[must_use]
    pub fn invalid_date_format(value: impl Into<String>) -> Self {
        Self::InvalidDateFormat {
            value: value.into(),
        }
    }
}
