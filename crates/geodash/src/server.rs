//! HTTP endpoint serving the project list.
//!
//! `GET /api/projects` returns a freshly generated array on every request,
//! or the contents of a dump file when one is configured. Every response
//! carries permissive CORS headers so a browser page on any origin can read
//! it.

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::dump::read_dump;
use crate::error::{Error, Result};
use crate::generator::{GeneratorSettings, ProjectGenerator, DEFAULT_PROJECT_COUNT};
use crate::project::Project;

/// Path of the project list endpoint.
pub const PROJECTS_PATH: &str = "/api/projects";

/// Path of the health check.
pub const HEALTH_PATH: &str = "/api/health";

const ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
const ALLOW_HEADERS: &str = "Content-Type, Authorization";
const GENERATION_FAILED: &str = "Failed to generate projects data";
const METHOD_NOT_ALLOWED: &str = "Method not allowed";

/// What the endpoint serves.
#[derive(Debug, Clone)]
pub struct ServerState {
    settings: GeneratorSettings,
    count: usize,
    seed: Option<u64>,
    dump_path: Option<PathBuf>,
}

impl ServerState {
    /// Serve `count` generated projects per request.
    #[must_use]
    pub fn new(settings: GeneratorSettings, count: usize) -> Self {
        Self {
            settings,
            count,
            seed: None,
            dump_path: None,
        }
    }

    /// Seed the generator so every request returns the same records.
    #[must_use]
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Serve the records in a dump file instead of generating them.
    #[must_use]
    pub fn with_dump(mut self, path: Option<PathBuf>) -> Self {
        self.dump_path = path;
        self
    }

    fn load(&self) -> Result<Vec<Project>> {
        if let Some(path) = &self.dump_path {
            return read_dump(path);
        }
        let settings = self.settings.clone();
        let mut generator = match self.seed {
            Some(seed) => ProjectGenerator::with_seed(settings, seed),
            None => ProjectGenerator::new(settings),
        };
        Ok(generator.generate(self.count))
    }
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new(GeneratorSettings::default(), DEFAULT_PROJECT_COUNT)
    }
}

/// Build the router.
pub fn router(state: ServerState) -> Router {
    // `get` also answers HEAD unless it is routed explicitly.
    let projects = get(list_projects)
        .head(method_not_allowed)
        .options(preflight)
        .fallback(method_not_allowed);

    Router::new()
        .route(PROJECTS_PATH, projects)
        .route(HEALTH_PATH, get(health))
        .with_state(Arc::new(state))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOW_METHODS),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOW_HEADERS),
        ))
        .layer(TraceLayer::new_for_http())
}

async fn list_projects(State(state): State<Arc<ServerState>>) -> Response {
    let loaded = tokio::task::spawn_blocking(move || state.load()).await;
    match loaded {
        Ok(Ok(projects)) => {
            info!(count = projects.len(), "served projects");
            Json(projects).into_response()
        }
        Ok(Err(e)) => {
            error!(error = %e, "failed to load projects");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, GENERATION_FAILED)
        }
        Err(e) => {
            error!(error = %e, "project generation task failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, GENERATION_FAILED)
        }
    }
}

async fn preflight() -> StatusCode {
    StatusCode::OK
}

async fn method_not_allowed() -> Response {
    error_response(StatusCode::METHOD_NOT_ALLOWED, METHOD_NOT_ALLOWED)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// Serve on an already bound listener until `shutdown` resolves.
///
/// # Errors
///
/// Returns [`Error::Server`] if the server stops with an I/O error.
pub async fn serve_listener<F>(listener: TcpListener, state: ServerState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener
        .local_addr()
        .map_or_else(|_| "unknown".to_string(), |a| a.to_string());
    info!(addr = %addr, path = PROJECTS_PATH, "serving projects");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| Error::server(addr, e.to_string()))
}

/// Bind `addr` and serve until Ctrl-C.
///
/// # Errors
///
/// Returns [`Error::Server`] if the address cannot be bound or serving fails.
pub async fn serve(addr: &str, state: ServerState) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| Error::server(addr, e.to_string()))?;
    serve_listener(listener, state, async {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutting down");
        }
    })
    .await
}
