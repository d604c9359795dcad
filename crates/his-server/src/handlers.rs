use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use his_api::{ApiError, LoginResponse, MessageResponse, PatientSearchResponse, StaffCredentials};
use his_auth::{
    AuditEvent, AuthError, BearerAuth,
    password::{hash_password, verify_password},
};
use his_core::NewStaff;
use his_search::SearchCriteria;
use serde::Serialize;
use serde_json::json;

use crate::search::SearchError;
use crate::server::AppState;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

pub async fn root() -> impl IntoResponse {
    let body = json!({
        "service": "HIS API",
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    });
    (StatusCode::OK, Json(body))
}

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthResponse { status: "ok" }))
}

/// `GET /patient/search`
pub async fn search_patients(
    State(state): State<AppState>,
    auth: Result<BearerAuth, AuthError>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<PatientSearchResponse>, SearchError> {
    let criteria: SearchCriteria = params.into_iter().collect();
    let identity = auth.map(|BearerAuth(identity)| identity);
    let patients = state.search.search(identity, &criteria).await?;
    Ok(Json(PatientSearchResponse::from_patients(patients)))
}

/// `POST /staff/create`
pub async fn register_staff(
    State(state): State<AppState>,
    body: Result<Json<StaffCredentials>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(creds) = body.map_err(|e| {
        tracing::debug!(error = %e, "Rejected staff registration body");
        ApiError::bad_request("Invalid input")
    })?;
    if !creds.is_complete() {
        return Err(ApiError::bad_request("All fields are required"));
    }

    let existing = state
        .staff
        .find_by_username(&creds.username)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Staff lookup failed");
            ApiError::internal("Error saving staff to database")
        })?;
    if existing.is_some() {
        return Err(ApiError::bad_request("Username already exists"));
    }

    let password = creds.password.clone();
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| e.to_string())
        .and_then(|hashed| hashed.map_err(|e| e.to_string()))
        .map_err(|e| {
            tracing::error!(error = %e, "Password hashing failed");
            ApiError::internal("Error hashing password")
        })?;

    let created = state
        .staff
        .create(NewStaff {
            username: creds.username,
            password_hash,
            hospital: creds.hospital,
        })
        .await
        .map_err(|e| {
            if e.is_already_exists() {
                ApiError::bad_request("Username already exists")
            } else {
                tracing::error!(error = %e, "Saving staff failed");
                ApiError::internal("Error saving staff to database")
            }
        })?;

    tracing::info!(
        staff.id = created.id,
        username = %created.username,
        hospital = %created.hospital,
        "Staff registered"
    );
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Staff registered successfully!")),
    ))
}

/// `POST /staff/login`
pub async fn login_staff(
    State(state): State<AppState>,
    body: Result<Json<StaffCredentials>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    const FIELDS_REQUIRED: &str = "All fields (username, password, hospital) are required";

    let Json(creds) = body.map_err(|_| ApiError::bad_request(FIELDS_REQUIRED))?;
    if !creds.is_complete() {
        return Err(ApiError::bad_request(FIELDS_REQUIRED));
    }

    let invalid = || {
        state.audit.record(&AuditEvent::LoginFailed {
            username: creds.username.clone(),
            hospital: creds.hospital.clone(),
        });
        ApiError::unauthorized("Invalid credentials")
    };

    let staff = match state
        .staff
        .find_by_credentials(&creds.username, &creds.hospital)
        .await
    {
        Ok(Some(staff)) => staff,
        Ok(None) => return Err(invalid()),
        Err(e) => {
            tracing::error!(error = %e, "Staff lookup failed");
            return Err(invalid());
        }
    };

    let password = creds.password.clone();
    let hash = staff.password_hash.clone();
    let verified = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| e.to_string())
        .and_then(|checked| checked.map_err(|e| e.to_string()));
    match verified {
        Ok(true) => {}
        Ok(false) => return Err(invalid()),
        Err(e) => {
            tracing::warn!(error = %e, staff.id = staff.id, "Stored password hash unusable");
            return Err(invalid());
        }
    }

    let token = state.auth.tokens.issue(&staff).map_err(|e| {
        tracing::error!(error = %e, "Token issue failed");
        ApiError::internal(e.public_message())
    })?;

    tracing::info!(staff.id = staff.id, hospital = %staff.hospital, "Staff logged in");
    Ok(Json(LoginResponse::new(token, staff)))
}
