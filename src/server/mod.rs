//! HTTP surface: `POST /design_prompt`.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::models::{DesignPromptRequest, RequestError, UserRequest};
use crate::pipeline::Pipeline;
use crate::stages::PipelineError;

/// Response header carrying the pipeline trace id
pub const TRACE_ID_HEADER: &str = "x-trace-id";

/// Frontend origin allowed when none is configured
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:3000";

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            allowed_origins: vec![DEFAULT_ALLOWED_ORIGIN.to_string()],
        }
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    pub fn bad_request(err: RequestError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: err.to_string(),
        }
    }
}

impl From<PipelineError> for AppError {
    // Provider details stay in the logs.
    fn from(err: PipelineError) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("{} stage failed", err.stage()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

#[derive(Clone)]
struct AppState {
    pipeline: Arc<Pipeline>,
}

/// CORS for the configured frontend origins, with credentials.
///
/// Methods and headers are mirrored from the preflight because wildcards are
/// not allowed together with credentials.
pub fn cors_layer(allowed_origins: &[String]) -> Result<CorsLayer> {
    if allowed_origins.iter().any(|origin| origin.trim() == "*") {
        anyhow::bail!("wildcard origin cannot be combined with credentials");
    }

    let origins = allowed_origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin)
                .with_context(|| format!("Invalid allowed origin: {origin:?}"))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request()))
}

pub fn build_router(pipeline: Arc<Pipeline>, cors: CorsLayer) -> Router {
    Router::new()
        .route("/design_prompt", post(design_prompt))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { pipeline })
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub async fn run_serve(pipeline: Arc<Pipeline>, config: &ServerConfig) -> Result<()> {
    let app = build_router(pipeline, cors_layer(&config.allowed_origins)?);
    let listener = bind_listener(config).await?;
    let addr = listener.local_addr()?;

    info!("Allowed origins: {:?}", config.allowed_origins);
    info!("prompt-designer listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("prompt-designer shut down");
    Ok(())
}

/// Bind the configured host, which may be a hostname or an IP address
async fn bind_listener(config: &ServerConfig) -> Result<TcpListener> {
    TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", config.host, config.port))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn design_prompt(
    State(state): State<AppState>,
    Json(body): Json<DesignPromptRequest>,
) -> Result<Response, AppError> {
    let request = UserRequest::try_from(body).map_err(|e| {
        warn!("Rejected request: {}", e);
        AppError::bad_request(e)
    })?;

    let run = state.pipeline.run_traced(&request).await?;

    Ok((
        [(TRACE_ID_HEADER, run.trace.trace_id.to_string())],
        Json(run.result),
    )
        .into_response())
}
