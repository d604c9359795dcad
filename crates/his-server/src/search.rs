//! Patient search orchestration.
//!
//! A search moves through `Validating → Building → Querying → Authorizing →
//! Responding`. Any stage may reject; a rejected search never returns records.
//! `Authorizing` runs for every successful query, including empty results.

use std::fmt;

use axum::response::{IntoResponse, Response};
use his_api::ApiError;
use his_auth::{AuthError, AuthorizationError, HospitalGate};
use his_core::{Identity, PatientRecord};
use his_search::{FilterBuilder, SearchCriteria, ValidationError};
use his_storage::{DynPatientStorage, StorageError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStage {
    Validating,
    Building,
    Querying,
    Authorizing,
    Responding,
}

impl SearchStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validating => "validating",
            Self::Building => "building",
            Self::Querying => "querying",
            Self::Authorizing => "authorizing",
            Self::Responding => "responding",
        }
    }
}

impl fmt::Display for SearchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a search was rejected.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("unauthenticated: {0}")]
    Unauthenticated(#[from] AuthError),
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("storage failed: {0}")]
    Storage(#[from] StorageError),
    #[error("authorization failed: {0}")]
    Authorization(#[from] AuthorizationError),
}

impl SearchError {
    /// The stage that rejected the search.
    pub fn stage(&self) -> SearchStage {
        match self {
            Self::Unauthenticated(_) => SearchStage::Validating,
            Self::Validation(_) => SearchStage::Building,
            Self::Storage(_) => SearchStage::Querying,
            Self::Authorization(_) => SearchStage::Authorizing,
        }
    }
}

impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthenticated(err) => err.into_response(),
            Self::Validation(err) => ApiError::bad_request(err.to_string()).into_response(),
            Self::Storage(_) => ApiError::internal("Error fetching patients").into_response(),
            Self::Authorization(err) => ApiError::unauthorized(err.to_string()).into_response(),
        }
    }
}

/// Runs patient searches against a storage backend behind the hospital gate.
#[derive(Clone)]
pub struct PatientSearchService {
    patients: DynPatientStorage,
    gate: HospitalGate,
}

impl PatientSearchService {
    pub fn new(patients: DynPatientStorage, gate: HospitalGate) -> Self {
        Self { patients, gate }
    }

    /// Searches on behalf of `identity`.
    ///
    /// `identity` is whatever the authentication layer resolved; a failure there
    /// rejects the search before criteria are looked at.
    pub async fn search(
        &self,
        identity: Result<Identity, AuthError>,
        criteria: &SearchCriteria,
    ) -> Result<Vec<PatientRecord>, SearchError> {
        let result = self.run(identity, criteria).await;
        if let Err(err) = &result {
            match err {
                SearchError::Storage(e) => tracing::error!(
                    stage = %err.stage(),
                    error = %e,
                    category = %e.category(),
                    "Patient search rejected"
                ),
                _ => tracing::debug!(stage = %err.stage(), error = %err, "Patient search rejected"),
            }
        }
        result
    }

    async fn run(
        &self,
        identity: Result<Identity, AuthError>,
        criteria: &SearchCriteria,
    ) -> Result<Vec<PatientRecord>, SearchError> {
        enter(SearchStage::Validating);
        let identity = identity?;

        enter(SearchStage::Building);
        let predicate = FilterBuilder::from_criteria(criteria)?;

        enter(SearchStage::Querying);
        let records = self.patients.find(&predicate).await?;

        enter(SearchStage::Authorizing);
        let authorized = self.gate.authorize(&identity, records)?;

        enter(SearchStage::Responding);
        tracing::info!(
            username = %identity.username(),
            hospital = %identity.hospital(),
            results = authorized.len(),
            "Patient search completed"
        );
        Ok(authorized)
    }
}

fn enter(stage: SearchStage) {
    tracing::debug!(stage = %stage, "Patient search stage");
}

impl fmt::Debug for PatientSearchService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatientSearchService")
            .field("gate", &self.gate)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use his_auth::MemoryAuditSink;
    use his_core::Gender;
    use his_db_memory::InMemoryStorage;
    use std::sync::Arc;
    use time::macros::date;

    fn patient(national_id: &str, hospital: &str) -> PatientRecord {
        PatientRecord {
            id: 0,
            first_name_th: "สมชาย".into(),
            middle_name_th: String::new(),
            last_name_th: "สุขดี".into(),
            first_name_en: "Somchai".into(),
            middle_name_en: String::new(),
            last_name_en: "Sukdee".into(),
            date_of_birth: date!(1990 - 05 - 12),
            patient_hn: None,
            national_id: Some(national_id.into()),
            passport_id: None,
            phone_number: "0812345678".into(),
            email: String::new(),
            gender: Gender::Male,
            hospital: hospital.into(),
        }
    }

    fn service(patients: Vec<PatientRecord>) -> (PatientSearchService, MemoryAuditSink) {
        let sink = MemoryAuditSink::new();
        let storage = Arc::new(InMemoryStorage::with_patients(patients));
        let service = PatientSearchService::new(storage, HospitalGate::new(Arc::new(sink.clone())));
        (service, sink)
    }

    fn caller() -> Result<Identity, AuthError> {
        Ok(Identity::new("admin", "Hospital").unwrap())
    }

    #[tokio::test]
    async fn test_rejects_unauthenticated_before_building() {
        let (service, _) = service(Vec::new());
        let err = service
            .search(Err(AuthError::missing_credentials("none")), &SearchCriteria::new())
            .await
            .unwrap_err();
        assert_eq!(err.stage(), SearchStage::Validating);
    }

    #[tokio::test]
    async fn test_rejects_empty_criteria() {
        let (service, _) = service(Vec::new());
        let err = service
            .search(caller(), &SearchCriteria::new())
            .await
            .unwrap_err();
        assert_eq!(err.stage(), SearchStage::Building);
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_empty_result_is_authorized() {
        let (service, sink) = service(vec![patient("1", "Hospital")]);
        let found = service
            .search(caller(), &SearchCriteria::new().with("national_id", "2"))
            .await
            .unwrap();
        assert!(found.is_empty());
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn test_cross_hospital_rejected() {
        let (service, sink) = service(vec![patient("1", "Other Hospital")]);
        let err = service
            .search(caller(), &SearchCriteria::new().with("national_id", "1"))
            .await
            .unwrap_err();
        assert_eq!(err.stage(), SearchStage::Authorizing);
        assert_eq!(sink.len(), 1);
        assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_storage_error_maps_to_internal() {
        let err = SearchError::from(StorageError::connection_error("down"));
        assert_eq!(err.stage(), SearchStage::Querying);
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
