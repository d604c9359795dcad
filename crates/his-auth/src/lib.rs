//! # his-auth
//!
//! Authentication and authorization for the HIS API.
//!
//! - [`token`]: HS256 token issuing and verification into an [`Identity`](his_core::Identity)
//! - [`password`]: Argon2id password hashing for staff accounts
//! - [`middleware`]: the [`BearerAuth`] extractor and HTTP error mapping
//! - [`gate`]: the fail-closed hospital authorization gate
//! - [`audit`]: security audit events and sinks

pub mod audit;
pub mod error;
pub mod gate;
pub mod middleware;
pub mod password;
pub mod token;

pub use audit::{AuditEvent, AuditSink, MemoryAuditSink, TracingAuditSink};
pub use error::{AuthError, AuthResult};
pub use gate::{AuthorizationError, HospitalGate};
pub use middleware::{AuthState, BearerAuth};
pub use token::{StaffClaims, TokenService};
