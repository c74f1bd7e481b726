//! HTTP server setup and the gateway handler.
//!
//! # Responsibilities
//! - Create the axum router with the health/root/proxy surface
//! - Compose the middleware pipeline in its fixed order
//! - Dispatch routed requests: resolve path → directory lookup → forward
//! - Serve with graceful shutdown bounded by the configured grace period

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Request, State};
use axum::middleware::{from_fn, from_fn_with_state};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::auth::{Authenticator, RemoteAuthenticator};
use crate::config::GatewayConfig;
use crate::directory::{HttpDirectory, ServiceDirectory};
use crate::error::GatewayError;
use crate::http::middleware::{access_log, auth_gate, cors, recovery};
use crate::proxy::Forwarder;
use crate::routing::{resolve_path, StreamingFlag};

/// Application state injected into handlers. Everything here is shared,
/// reentrant, and read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    pub directory: Arc<dyn ServiceDirectory>,
    pub authenticator: Arc<dyn Authenticator>,
    pub forwarder: Arc<Forwarder>,
}

/// The edge gateway HTTP server.
pub struct GatewayServer {
    state: AppState,
}

impl GatewayServer {
    /// Create a server with the production directory and authenticator.
    pub fn new(config: GatewayConfig) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let directory: Arc<dyn ServiceDirectory> = Arc::new(HttpDirectory::new(&config.directory)?);
        let authenticator: Arc<dyn Authenticator> =
            Arc::new(RemoteAuthenticator::new(&config.auth, directory.clone())?);
        Ok(Self::with_components(config, directory, authenticator))
    }

    /// Create a server with substituted collaborators (used by tests).
    pub fn with_components(
        config: GatewayConfig,
        directory: Arc<dyn ServiceDirectory>,
        authenticator: Arc<dyn Authenticator>,
    ) -> Self {
        let forwarder = Arc::new(Forwarder::new(&config.timeouts));
        let state = AppState {
            config: Arc::new(config),
            directory,
            authenticator,
            forwarder,
        };
        Self { state }
    }

    /// Build the axum router with the full middleware pipeline.
    ///
    /// Layer order: layers added later wrap earlier ones, so the list below
    /// reads inner-to-outer. Outermost first at runtime: trace → recovery →
    /// access log → CORS → auth gate → handler.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/health", get(health))
            .route("/", get(root))
            .fallback(gateway_handler)
            .layer(from_fn_with_state(state.clone(), auth_gate))
            .layer(from_fn(cors))
            .layer(from_fn_with_state(state.clone(), access_log))
            .layer(from_fn(recovery))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    /// Run the server until the shutdown signal fires, then drain in-flight
    /// requests for the configured grace period before closing hard.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        let grace = Duration::from_secs(self.state.config.server.shutdown_grace_secs);
        tracing::info!(address = %addr, "gateway server starting");

        let mut graceful = shutdown;
        let mut forced = graceful.resubscribe();

        let app = Self::build_router(self.state)
            .into_make_service_with_connect_info::<SocketAddr>();

        tokio::select! {
            result = async move {
                axum::serve(listener, app)
                    .with_graceful_shutdown(async move {
                        let _ = graceful.recv().await;
                        tracing::info!("shutdown signal received, draining connections");
                    })
                    .await
            } => result?,
            _ = async {
                let _ = forced.recv().await;
                tokio::time::sleep(grace).await;
            } => {
                tracing::warn!(
                    grace_secs = grace.as_secs(),
                    "grace period expired, closing remaining connections"
                );
            }
        }

        tracing::info!("gateway server stopped");
        Ok(())
    }
}

/// `GET /health` — liveness probe, bypasses auth.
async fn health() -> Response {
    Json(serde_json::json!({ "status": "ok", "service": "edge-gateway" })).into_response()
}

/// `GET /` — static informational response.
async fn root() -> Response {
    Json(serde_json::json!({
        "message": "Edge Gateway",
        "version": env!("CARGO_PKG_VERSION"),
    }))
    .into_response()
}

/// The routed proxy surface: every path that is not health or root lands
/// here, so the resolver's MalformedPath covers unknown paths with a 400.
async fn gateway_handler(
    State(state): State<AppState>,
    request: Request,
) -> Result<Response, GatewayError> {
    // Evaluated once in the access-log layer; the fallback only covers
    // requests constructed outside the normal pipeline.
    let streaming = request
        .extensions()
        .get::<StreamingFlag>()
        .map(|flag| flag.0)
        .unwrap_or(false);

    let candidate = resolve_path(request.uri().path(), &state.config.routing)?;

    tracing::debug!(
        segment = %candidate.service_segment,
        registry_name = %candidate.registry_name,
        forward_path = %candidate.forward_path,
        streaming,
        "route resolved"
    );

    let endpoint = state
        .directory
        .resolve(&candidate.registry_name)
        .await
        .map_err(|error| {
            tracing::warn!(
                service = %candidate.registry_name,
                path = %candidate.raw_path,
                %error,
                "directory lookup failed"
            );
            GatewayError::from(error)
        })?;

    tracing::debug!(
        service = %candidate.registry_name,
        endpoint = %endpoint,
        "endpoint resolved"
    );

    state
        .forwarder
        .forward(&endpoint, &candidate.forward_path, streaming, request)
        .await
}
