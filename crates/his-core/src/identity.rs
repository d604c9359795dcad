//! Resolved caller identity.

use crate::error::{CoreError, Result};

/// The authenticated staff member behind a request.
///
/// Produced once by the authentication layer and passed explicitly into the
/// search flow. Both attributes are guaranteed non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    username: String,
    hospital: String,
}

impl Identity {
    /// Creates an identity, rejecting blank attributes.
    pub fn new(username: impl Into<String>, hospital: impl Into<String>) -> Result<Self> {
        let username = username.into();
        let hospital = hospital.into();
        if username.trim().is_empty() {
            return Err(CoreError::empty_identity_attribute("username"));
        }
        if hospital.trim().is_empty() {
            return Err(CoreError::empty_identity_attribute("hospital"));
        }
        Ok(Self { username, hospital })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// The facility this staff member belongs to.
    pub fn hospital(&self) -> &str {
        &self.hospital
    }

    /// Returns `true` if a record owned by `hospital` belongs to this caller's facility.
    #[must_use]
    pub fn is_same_hospital(&self, hospital: &str) -> bool {
        self.hospital == hospital
    }
}
