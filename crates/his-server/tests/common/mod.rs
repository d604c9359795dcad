#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use his_auth::{MemoryAuditSink, StaffClaims, TokenService};
use his_core::{Gender, PatientRecord, StaffAccount};
use his_db_memory::InMemoryStorage;
use his_search::Predicate;
use his_server::{AppConfig, AppState, build_app};
use his_storage::{PatientStorage, StorageError};
use time::macros::date;
use tokio::task::JoinHandle;

pub const SECRET: &str = "integration-secret";

pub struct TestServer {
    pub base: String,
    pub audit: MemoryAuditSink,
    pub tokens: Arc<TokenService>,
    shutdown: Option<tokio::sync::oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    pub fn token_for(&self, username: &str, hospital: &str) -> String {
        self.tokens
            .issue(&StaffAccount {
                id: 1,
                username: username.into(),
                password_hash: String::new(),
                hospital: hospital.into(),
            })
            .unwrap()
    }

    pub fn expired_token(&self, username: &str, hospital: &str) -> String {
        let exp = (time::OffsetDateTime::now_utc() - time::Duration::hours(1)).unix_timestamp();
        self.tokens
            .issue_claims(&StaffClaims {
                username: username.into(),
                hospital: hospital.into(),
                exp,
            })
            .unwrap()
    }

    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

/// Starts the app on an ephemeral port over the given storage backends.
pub async fn start_with(
    patients: Arc<dyn PatientStorage>,
    staff: Arc<InMemoryStorage>,
) -> TestServer {
    let audit = MemoryAuditSink::new();
    let tokens = Arc::new(TokenService::new(SECRET, time::Duration::hours(1)));
    let state = AppState::new(patients, staff, tokens.clone(), Arc::new(audit.clone()));
    let app = build_app(&AppConfig::default(), state);

    let listener = tokio::net::TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0))
        .await
        .expect("bind");
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = tokio::sync::oneshot::channel::<()>();

    let handle = tokio::spawn(async move {
        let _ = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = rx.await;
            })
            .await;
    });

    TestServer {
        base: format!("http://{addr}"),
        audit,
        tokens,
        shutdown: Some(tx),
        handle: Some(handle),
    }
}

/// Starts the app over an in-memory store seeded with `patients`.
pub async fn start_server(patients: Vec<PatientRecord>) -> TestServer {
    let storage = Arc::new(InMemoryStorage::with_patients(patients));
    start_with(storage.clone(), storage).await
}

pub fn somchai() -> PatientRecord {
    PatientRecord {
        id: 0,
        first_name_th: "สมชาย".into(),
        middle_name_th: String::new(),
        last_name_th: "สุขดี".into(),
        first_name_en: "Somchai".into(),
        middle_name_en: String::new(),
        last_name_en: "Sukdee".into(),
        date_of_birth: date!(1990 - 05 - 12),
        patient_hn: Some("HN001".into()),
        national_id: Some("1234567890123".into()),
        passport_id: Some("A12345678".into()),
        phone_number: "0812345678".into(),
        email: "somchai@example.com".into(),
        gender: Gender::Male,
        hospital: "Hospital".into(),
    }
}

pub fn malee(hospital: &str) -> PatientRecord {
    PatientRecord {
        id: 0,
        first_name_th: "มาลี".into(),
        middle_name_th: String::new(),
        last_name_th: "ใจดี".into(),
        first_name_en: "Malee".into(),
        middle_name_en: String::new(),
        last_name_en: "Jaidee".into(),
        date_of_birth: date!(1985 - 11 - 02),
        patient_hn: None,
        national_id: Some("9876543210987".into()),
        passport_id: None,
        phone_number: "0898765432".into(),
        email: "malee@example.com".into(),
        gender: Gender::Female,
        hospital: hospital.into(),
    }
}

/// Patient storage that counts calls and optionally fails.
#[derive(Default)]
pub struct ProbeStorage {
    pub calls: AtomicUsize,
    pub fail: bool,
    pub records: Vec<PatientRecord>,
}

impl ProbeStorage {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn returning(records: Vec<PatientRecord>) -> Self {
        Self {
            records,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PatientStorage for ProbeStorage {
    async fn find(&self, _predicate: &Predicate) -> Result<Vec<PatientRecord>, StorageError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(StorageError::connection_error("connection refused"));
        }
        Ok(self.records.clone())
    }
}
