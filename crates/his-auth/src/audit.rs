//! Security audit events.
//!
//! Events never carry patient identifying fields, only the caller and the
//! hospitals involved.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;

/// A security-relevant event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AuditEvent {
    /// A search returned records owned by another hospital and was rejected.
    CrossHospitalAccess {
        actor_username: String,
        actor_hospital: String,
        /// Hospital of the first offending record.
        record_hospital: String,
        /// Number of records that did not belong to the caller's hospital.
        mismatched_records: usize,
    },
    /// A login attempt was rejected.
    LoginFailed { username: String, hospital: String },
}

impl AuditEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CrossHospitalAccess { .. } => "cross_hospital_access",
            Self::LoginFailed { .. } => "login_failed",
        }
    }
}

/// Destination for audit events.
pub trait AuditSink: Send + Sync {
    fn record(&self, event: &AuditEvent);
}

/// Writes audit events to the `his::audit` tracing target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, event: &AuditEvent) {
        match event {
            AuditEvent::CrossHospitalAccess {
                actor_username,
                actor_hospital,
                record_hospital,
                mismatched_records,
            } => tracing::warn!(
                target: "his::audit",
                event = event.kind(),
                actor.username = %actor_username,
                actor.hospital = %actor_hospital,
                record.hospital = %record_hospital,
                mismatched_records,
                "Rejected cross-hospital patient access"
            ),
            AuditEvent::LoginFailed { username, hospital } => tracing::warn!(
                target: "his::audit",
                event = event.kind(),
                actor.username = %username,
                actor.hospital = %hospital,
                "Failed staff login"
            ),
        }
    }
}

/// Keeps events in memory, for tests and diagnostics.
#[derive(Debug, Clone, Default)]
pub struct MemoryAuditSink {
    events: Arc<Mutex<Vec<AuditEvent>>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl AuditSink for MemoryAuditSink {
    fn record(&self, event: &AuditEvent) {
        self.events.lock().push(event.clone());
    }
}
