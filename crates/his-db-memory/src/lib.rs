//! In-memory storage backend for the HIS API.
//!
//! [`InMemoryStorage`] implements both [`PatientStorage`] and [`StaffStorage`].
//! Predicates are evaluated in process, see [`query::matches`].
//!
//! # Example
//!
//! ```ignore
//! use his_db_memory::InMemoryStorage;
//! use his_storage::PatientStorage;
//!
//! let storage = InMemoryStorage::new();
//! storage.insert_patient(record);
//! let found = storage.find(&predicate).await?;
//! ```

pub mod query;
pub mod storage;

pub use his_storage::{PatientStorage, StaffStorage, StorageError};
pub use storage::InMemoryStorage;
