use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    extract::FromRef,
    middleware,
    routing::{get, post},
};
use his_auth::{AuditSink, AuthState, HospitalGate, TokenService, TracingAuditSink};
use his_db_memory::InMemoryStorage;
use his_db_postgres::{PostgresStorage, mask_password};
use his_storage::{DynPatientStorage, DynStaffStorage};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::{AppConfig, StorageBackend};
use crate::search::PatientSearchService;
use crate::{handlers, middleware as app_middleware};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub search: PatientSearchService,
    pub staff: DynStaffStorage,
    pub auth: AuthState,
    pub audit: Arc<dyn AuditSink>,
}

impl AppState {
    pub fn new(
        patients: DynPatientStorage,
        staff: DynStaffStorage,
        tokens: Arc<TokenService>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        let gate = HospitalGate::new(audit.clone());
        Self {
            search: PatientSearchService::new(patients, gate),
            staff,
            auth: AuthState::new(tokens),
            audit,
        }
    }

    /// Builds state from configuration, connecting the configured backend.
    pub async fn from_config(cfg: &AppConfig) -> anyhow::Result<Self> {
        let tokens = Arc::new(TokenService::new(&cfg.auth.jwt_secret, cfg.token_ttl()));
        let audit: Arc<dyn AuditSink> = Arc::new(TracingAuditSink);

        match cfg.storage.backend {
            StorageBackend::Memory => {
                let storage = match &cfg.storage.seed_patients {
                    Some(path) => InMemoryStorage::from_json_file(path)?,
                    None => InMemoryStorage::new(),
                };
                tracing::info!(patients = storage.patient_count(), "Using in-memory storage");
                let storage = Arc::new(storage);
                Ok(Self::new(storage.clone(), storage, tokens, audit))
            }
            StorageBackend::Postgres => {
                tracing::info!(
                    url = %mask_password(&cfg.storage.postgres.url),
                    "Using PostgreSQL storage"
                );
                let storage = Arc::new(PostgresStorage::new(cfg.storage.postgres.clone()).await?);
                Ok(Self::new(storage.clone(), storage, tokens, audit))
            }
        }
    }
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}

pub fn build_app(cfg: &AppConfig, state: AppState) -> Router {
    let body_limit = cfg.server.body_limit_bytes;
    Router::new()
        .route("/", get(handlers::root))
        .route("/healthz", get(handlers::healthz))
        .route("/staff/create", post(handlers::register_staff))
        .route("/staff/login", post(handlers::login_staff))
        .route("/patient/search", get(handlers::search_patients))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    use tracing::field::Empty;
                    let req_id = req
                        .extensions()
                        .get::<axum::http::HeaderValue>()
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("")
                        .to_string();
                    // Path only: query strings carry patient identifiers.
                    tracing::info_span!(
                        "http.request",
                        http.method = %req.method(),
                        http.path = %req.uri().path(),
                        http.status_code = Empty,
                        request_id = %req_id
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        span.record("http.status_code", tracing::field::display(res.status().as_u16()));
                        tracing::info!(
                            http.status = %res.status().as_u16(),
                            elapsed_ms = %latency.as_millis(),
                            "request handled"
                        );
                    },
                ),
        )
        // Outside the trace layer so the span sees the request id
        .layer(middleware::from_fn(app_middleware::request_id))
        .layer(axum::extract::DefaultBodyLimit::max(body_limit))
}

pub struct HisServer {
    addr: SocketAddr,
    app: Router,
}

#[derive(Default)]
pub struct ServerBuilder {
    config: AppConfig,
    state: Option<AppState>,
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, cfg: AppConfig) -> Self {
        self.config = cfg;
        self
    }

    /// Uses prebuilt state instead of connecting the configured backend.
    pub fn with_state(mut self, state: AppState) -> Self {
        self.state = Some(state);
        self
    }

    pub async fn build(self) -> anyhow::Result<HisServer> {
        let state = match self.state {
            Some(state) => state,
            None => AppState::from_config(&self.config).await?,
        };
        Ok(HisServer {
            addr: self.config.addr(),
            app: build_app(&self.config, state),
        })
    }
}

impl HisServer {
    pub async fn run(self) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!("listening on {}", self.addr);
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
