//! Security Alert API Server
//!
//! REST boundary over the alert registry: request validation, error
//! mapping, configuration, logging, rate limiting and metrics.

use alert_registry::{AlertRegistry, RegistryError};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_governor::GovernorLayer;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

pub mod config;
mod error;
pub mod rate_limit;
pub mod routes;

pub use crate::config::AppConfig;
pub use error::{ApiError, GENERIC_FAILURE};

use crate::config::LoggingConfig;
use rate_limit::{create_governor_config, RateLimitError};
use routes::{alerts, lifecycle, reports};

/// Application state shared across handlers
pub struct AppState {
    /// Alert registry
    pub registry: AlertRegistry,
    /// Loaded configuration
    pub config: AppConfig,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
    /// Prometheus handle, when the recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    /// Create new application state with an empty registry
    pub fn new(config: AppConfig) -> Self {
        Self {
            registry: AlertRegistry::new(),
            config,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: Option<PrometheusHandle>) -> Self {
        self.metrics = handle;
        self
    }

    /// Log a registry fault and turn it into a caller-safe error
    pub fn fault(&self, err: RegistryError) -> ApiError {
        counter!("api_internal_errors_total").increment(1);
        error!("Registry fault: {:?}", err);

        if self.config.show_detailed_errors {
            ApiError::Internal(err.to_string())
        } else {
            ApiError::Internal(GENERIC_FAILURE.to_string())
        }
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub environment: String,
    pub uptime_seconds: u64,
    pub total_alerts: usize,
    pub active_alerts: usize,
}

/// Create the application router
pub fn create_router(state: SharedState) -> Result<Router, RateLimitError> {
    let mut api = Router::new()
        .route(
            "/api/v1/alerts",
            get(alerts::list_alerts).post(alerts::create_alert),
        )
        .route("/api/v1/alerts/active", get(alerts::active_alerts))
        .route("/api/v1/alerts/summary", get(reports::summary))
        .route("/api/v1/alerts/close-resolved", post(reports::close_resolved))
        .route("/api/v1/alerts/:id", get(alerts::get_alert))
        .route("/api/v1/alerts/:id/validate", post(lifecycle::validate_alert))
        .route("/api/v1/alerts/:id/logs", post(lifecycle::gather_logs))
        .route(
            "/api/v1/alerts/:id/false-positive",
            post(lifecycle::check_false_positive),
        )
        .route(
            "/api/v1/alerts/:id/investigate",
            post(lifecycle::investigate_alert),
        )
        .route("/api/v1/alerts/:id/remediate", post(lifecycle::remediate_alert))
        .route("/api/v1/alerts/:id/escalate", post(lifecycle::escalate_alert))
        .route("/api/v1/alerts/:id/close", post(lifecycle::close_alert));

    if state.config.rate_limit.enabled {
        let governor = create_governor_config(&state.config.rate_limit)?;
        api = api.layer(GovernorLayer { config: governor });
    }

    Ok(Router::new()
        .route("/api/v1/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .merge(api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state))
}

/// Health check handler
async fn health_handler(State(state): State<SharedState>) -> Result<Json<HealthResponse>, ApiError> {
    let summary = state.registry.summary().map_err(|e| state.fault(e))?;
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let active_alerts: usize = summary
        .alerts_by_status
        .iter()
        .filter(|(status, _)| status.is_active())
        .map(|(_, n)| n)
        .sum();

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp,
        version: state.version.clone(),
        environment: state.config.environment.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        total_alerts: summary.total_alerts,
        active_alerts,
    }))
}

/// Prometheus exposition
async fn metrics_handler(State(state): State<SharedState>) -> Response {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Initialize logging
pub fn init_logging(config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let level: Level = config.level.parse().unwrap_or(Level::INFO);
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true);

    if config.json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}

/// Run the server until Ctrl-C
pub async fn run_server(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let metrics = if config.metrics.enabled {
        Some(PrometheusBuilder::new().install_recorder()?)
    } else {
        None
    };

    let addr = config.server.bind_addr.clone();
    if config.show_detailed_errors && config.is_production() {
        tracing::warn!("Detailed errors are enabled in production");
    }

    let state = Arc::new(AppState::new(config).with_metrics(metrics));
    let app = create_router(state)?;

    info!("Starting alert API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}
