use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use lnac_library::{LibraryError, LibraryReport, LibraryStore};
use lnac_types::{HealthStatus, InferenceRequest, InferenceResponse, LevelPolicy, PingStatus};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::auth::{Authenticator, API_KEY_HEADER};
use crate::error::ApiError;
use crate::inference;
use crate::settings::Settings;

/// Immutable per-process state shared by every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub authenticator: Authenticator,
    pub library: LibraryStore,
    pub level_policy: LevelPolicy,
}

impl AppState {
    pub fn new(
        authenticator: Authenticator,
        library: LibraryStore,
        level_policy: LevelPolicy,
    ) -> Self {
        Self {
            authenticator,
            library,
            level_policy,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            Authenticator::new(settings.api_key.clone()),
            LibraryStore::new(settings.data_dir.clone()),
            settings.level_policy,
        )
    }
}

type SharedState = Arc<AppState>;

pub async fn start_server(state: AppState, addr: &str) -> Result<()> {
    if !state.authenticator.is_configured() {
        warn!("LNAC_API_KEY is not set; /v1 endpoints will answer 500");
    }
    if !state.library.data_dir().is_dir() {
        warn!(
            "Library directory {} does not exist",
            state.library.data_dir().display()
        );
    }

    let app = build_router(state);
    let listener = bind_listener(addr).await?;
    info!("LNAC gateway listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("gateway server terminated unexpectedly")
}

async fn bind_listener(addr: &str) -> Result<tokio::net::TcpListener> {
    if let Ok(socket_addr) = addr.parse::<SocketAddr>() {
        tokio::net::TcpListener::bind(socket_addr)
            .await
            .with_context(|| format!("failed to bind gateway listener on {socket_addr}"))
    } else {
        tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind gateway listener on {addr}"))
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, draining connections");
}

pub fn build_router(state: AppState) -> Router {
    let shared: SharedState = Arc::new(state);

    let authenticated = Router::new()
        .route("/v1/inference", post(handle_inference))
        .route_layer(middleware::from_fn_with_state(shared.clone(), require_api_key));

    Router::new()
        .route("/health", get(handle_health))
        .route("/debug/ping", get(handle_ping))
        .route("/debug/library", get(handle_debug_library))
        .merge(authenticated)
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}

/// Runs before the body is read, so bad keys are rejected whatever the payload.
async fn require_api_key(
    State(state): State<SharedState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let provided = api_key_from(request.headers());
    state.authenticator.verify(provided)?;
    Ok(next.run(request).await)
}

fn api_key_from(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
}

async fn handle_health() -> Json<HealthStatus> {
    Json(HealthStatus::ok())
}

async fn handle_ping() -> Json<PingStatus> {
    Json(PingStatus::default())
}

async fn handle_inference(
    State(state): State<SharedState>,
    payload: Result<Json<InferenceRequest>, JsonRejection>,
) -> Result<Json<InferenceResponse>, ApiError> {
    let Json(request) = payload?;
    let index = read_library(&state, LibraryStore::load_index).await?;
    let response = inference::respond(&request, &index, state.level_policy);
    debug!(
        "request {} classified as {}",
        request.request_id, response.primary_classification.derailer_id
    );
    Ok(Json(response))
}

async fn handle_debug_library(
    State(state): State<SharedState>,
) -> Result<Json<LibraryReport>, ApiError> {
    let report = read_library(&state, LibraryStore::introspect).await?;
    Ok(Json(report))
}

/// Runs a library read on the blocking pool.
async fn read_library<T, F>(state: &SharedState, read: F) -> Result<T, ApiError>
where
    F: FnOnce(&LibraryStore) -> Result<T, LibraryError> + Send + 'static,
    T: Send + 'static,
{
    let library = state.library.clone();
    let outcome = tokio::task::spawn_blocking(move || read(&library))
        .await
        .map_err(|err| {
            warn!("library read task failed: {}", err);
            ApiError::internal("library read failed")
        })?;
    Ok(outcome?)
}
