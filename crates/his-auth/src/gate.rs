//! Hospital authorization gate.
//!
//! Every search result passes through [`HospitalGate::authorize`] before it is
//! returned. The gate is fail-closed: a single record owned by another hospital
//! rejects the whole result set.

use std::sync::Arc;

use his_core::{Identity, PatientRecord};

use crate::audit::{AuditEvent, AuditSink};

/// Authorization failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthorizationError {
    #[error("Unauthorized: You can only search for patients in your own hospital")]
    CrossHospitalAccess {
        caller_hospital: String,
        record_hospital: String,
        mismatched_records: usize,
    },
}

/// Checks that every record belongs to the caller's hospital.
#[derive(Clone)]
pub struct HospitalGate {
    audit: Arc<dyn AuditSink>,
}

impl HospitalGate {
    pub fn new(audit: Arc<dyn AuditSink>) -> Self {
        Self { audit }
    }

    /// Returns `records` unchanged if all of them belong to `identity`'s hospital.
    ///
    /// On rejection exactly one audit event is recorded.
    pub fn authorize(
        &self,
        identity: &Identity,
        records: Vec<PatientRecord>,
    ) -> Result<Vec<PatientRecord>, AuthorizationError> {
        let mut offending = records
            .iter()
            .filter(|record| !identity.is_same_hospital(&record.hospital));

        let Some(first) = offending.next() else {
            return Ok(records);
        };
        let record_hospital = first.hospital.clone();
        let mismatched_records = 1 + offending.count();

        self.audit.record(&AuditEvent::CrossHospitalAccess {
            actor_username: identity.username().to_owned(),
            actor_hospital: identity.hospital().to_owned(),
            record_hospital: record_hospital.clone(),
            mismatched_records,
        });

        Err(AuthorizationError::CrossHospitalAccess {
            caller_hospital: identity.hospital().to_owned(),
            record_hospital,
            mismatched_records,
        })
    }
}

impl std::fmt::Debug for HospitalGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HospitalGate").finish_non_exhaustive()
    }
}
