use std::path::Path;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use his_core::{NewStaff, PatientRecord, StaffAccount};
use his_search::Predicate;
use his_storage::{PatientStorage, StaffStorage, StorageError};
use parking_lot::RwLock;

use crate::query::matches;

/// In-memory storage backend.
///
/// Patients are kept in insertion order behind a read-write lock. Staff
/// accounts live in a concurrent map keyed by username, so uniqueness is
/// enforced atomically by the map's entry API.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    patients: RwLock<Vec<PatientRecord>>,
    staff: DashMap<String, StaffAccount>,
    patient_ids: AtomicI64,
    staff_ids: AtomicI64,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a storage pre-populated with `patients`.
    pub fn with_patients(patients: impl IntoIterator<Item = PatientRecord>) -> Self {
        let storage = Self::new();
        for patient in patients {
            storage.insert_patient(patient);
        }
        storage
    }

    /// Loads patients from a JSON array file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            StorageError::connection_error(format!("reading {}: {e}", path.display()))
        })?;
        let patients: Vec<PatientRecord> = serde_json::from_str(&raw).map_err(|e| {
            StorageError::invalid_record(format!("parsing {}: {e}", path.display()))
        })?;
        tracing::info!(count = patients.len(), path = %path.display(), "Loaded seed patients");
        Ok(Self::with_patients(patients))
    }

    /// Appends a patient. A non-positive id is replaced by the next free one.
    pub fn insert_patient(&self, mut record: PatientRecord) -> PatientRecord {
        if record.id <= 0 {
            record.id = self.patient_ids.fetch_add(1, Ordering::SeqCst) + 1;
        } else {
            self.patient_ids.fetch_max(record.id, Ordering::SeqCst);
        }
        self.patients.write().push(record.clone());
        record
    }

    pub fn patient_count(&self) -> usize {
        self.patients.read().len()
    }

    pub fn staff_count(&self) -> usize {
        self.staff.len()
    }
}

#[async_trait]
impl PatientStorage for InMemoryStorage {
    async fn find(&self, predicate: &Predicate) -> Result<Vec<PatientRecord>, StorageError> {
        let found: Vec<PatientRecord> = self
            .patients
            .read()
            .iter()
            .filter(|record| matches(record, predicate))
            .cloned()
            .collect();
        tracing::debug!(matched = found.len(), "In-memory patient lookup");
        Ok(found)
    }
}

#[async_trait]
impl StaffStorage for InMemoryStorage {
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<StaffAccount>, StorageError> {
        Ok(self.staff.get(username).map(|entry| entry.value().clone()))
    }

    async fn find_by_credentials(
        &self,
        username: &str,
        hospital: &str,
    ) -> Result<Option<StaffAccount>, StorageError> {
        Ok(self
            .staff
            .get(username)
            .filter(|entry| entry.hospital == hospital)
            .map(|entry| entry.value().clone()))
    }

    async fn create(&self, staff: NewStaff) -> Result<StaffAccount, StorageError> {
        match self.staff.entry(staff.username.clone()) {
            Entry::Occupied(_) => Err(StorageError::already_exists("staff", staff.username)),
            Entry::Vacant(slot) => {
                let account = StaffAccount {
                    id: self.staff_ids.fetch_add(1, Ordering::SeqCst) + 1,
                    username: staff.username,
                    password_hash: staff.password_hash,
                    hospital: staff.hospital,
                };
                slot.insert(account.clone());
                Ok(account)
            }
        }
    }
}
