//! Storage traits implemented by every backend.

use std::sync::Arc;

use async_trait::async_trait;
use his_core::{NewStaff, PatientRecord, StaffAccount};
use his_search::Predicate;

use crate::error::StorageError;

/// Read-only patient lookup.
///
/// Implementations must be thread-safe (`Send + Sync`) and must never widen a
/// search: every returned record satisfies every clause of the predicate.
#[async_trait]
pub trait PatientStorage: Send + Sync {
    /// Returns every patient matching `predicate`, in the backend's stable order.
    ///
    /// An empty vector means nothing matched.
    ///
    /// # Errors
    ///
    /// Returns an error for infrastructure failures or unreadable rows.
    async fn find(&self, predicate: &Predicate) -> Result<Vec<PatientRecord>, StorageError>;
}

/// Staff account persistence.
#[async_trait]
pub trait StaffStorage: Send + Sync {
    /// Looks up an account by username.
    async fn find_by_username(&self, username: &str)
    -> Result<Option<StaffAccount>, StorageError>;

    /// Looks up an account whose username and hospital both match.
    async fn find_by_credentials(
        &self,
        username: &str,
        hospital: &str,
    ) -> Result<Option<StaffAccount>, StorageError>;

    /// Stores a new account and returns it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::AlreadyExists` when the username is taken, even
    /// when two registrations race.
    async fn create(&self, staff: NewStaff) -> Result<StaffAccount, StorageError>;
}

/// Type alias for a shared patient storage backend.
pub type DynPatientStorage = Arc<dyn PatientStorage>;

/// Type alias for a shared staff storage backend.
pub type DynStaffStorage = Arc<dyn StaffStorage>;
