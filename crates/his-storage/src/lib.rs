//! # his-storage
//!
//! Storage abstraction for the HIS API.
//!
//! Backends implement [`PatientStorage`] to answer predicate searches and
//! [`StaffStorage`] to keep staff accounts. Implementations live in separate
//! crates (`his-db-memory`, `his-db-postgres`).
//!
//! ## Example
//!
//! ```ignore
//! use his_search::{SearchCriteria, build};
//! use his_storage::{PatientStorage, StorageError};
//!
//! async fn by_national_id(
//!     storage: &dyn PatientStorage,
//!     id: &str,
//! ) -> Result<Vec<PatientRecord>, StorageError> {
//!     let predicate = build(&SearchCriteria::new().with("national_id", id))
//!         .map_err(|e| StorageError::invalid_query(e.to_string()))?;
//!     storage.find(&predicate).await
//! }
//! ```

mod error;
mod traits;

pub use error::{ErrorCategory, StorageError};
pub use traits::{DynPatientStorage, DynStaffStorage, PatientStorage, StaffStorage};
