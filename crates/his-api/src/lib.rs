use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use his_core::{PatientRecord, StaffAccount};
use serde::{Deserialize, Serialize};

/// Message returned alongside an empty search result.
pub const PATIENTS_NOT_FOUND: &str = "Patients not found";

/// Error body shared by every endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Body of a successful `GET /patient/search`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientSearchResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub patients: Vec<PatientRecord>,
}

impl PatientSearchResponse {
    /// Wraps authorized patients, adding the not-found message when empty.
    pub fn from_patients(patients: Vec<PatientRecord>) -> Self {
        let message = patients.is_empty().then(|| PATIENTS_NOT_FOUND.to_owned());
        Self { message, patients }
    }
}

/// Body carrying only a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Request body for `/staff/create` and `/staff/login`.
///
/// Missing fields deserialize as empty strings so the handler can answer with
/// its own validation message.
#[derive(Clone, Default, Deserialize)]
pub struct StaffCredentials {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub hospital: String,
}

impl StaffCredentials {
    /// Returns `true` when every field is non-empty.
    pub fn is_complete(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty() && !self.hospital.is_empty()
    }
}

impl std::fmt::Debug for StaffCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaffCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("hospital", &self.hospital)
            .finish()
    }
}

/// Body of a successful `/staff/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub staff: StaffAccount,
}

impl LoginResponse {
    pub fn new(token: String, staff: StaffAccount) -> Self {
        Self {
            message: "Login successful".to_owned(),
            token,
            staff,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The client-facing message.
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) | ApiError::Unauthorized(msg) | ApiError::Internal(msg) => {
                msg
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.message().to_owned(),
        };
        (status, Json(body)).into_response()
    }
}
