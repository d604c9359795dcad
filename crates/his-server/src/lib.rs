pub mod config;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod search;
pub mod server;

pub use config::{AppConfig, AuthSettings, LoggingConfig, ServerConfig, StorageBackend, StorageConfig};
pub use observability::init_tracing;
pub use search::{PatientSearchService, SearchError, SearchStage};
pub use server::{AppState, HisServer, ServerBuilder, build_app};
