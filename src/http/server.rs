//! HTTP server setup and request dispatch.
//!
//! # Responsibilities
//! - Create the Axum router with a single catch-all handler
//! - Wire up middleware (request ID, tracing, request ceiling)
//! - Classify each request and dispatch it to the right stage
//! - Serve with graceful shutdown

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{HeaderMap, Request},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::admin::{self, AdminAuth};
use crate::backend::{resolve, BackendClient, LookupResult};
use crate::config::EdgeConfig;
use crate::error::EdgeError;
use crate::http::pages;
use crate::http::request::{request_id, MakeRequestUuidV4, TraceContext};
use crate::http::response::{no_store, redirect_no_store, relay};
use crate::observability::metrics;
use crate::routing::{normalize_path, route, RouteDecision};

/// Application state injected into handlers. Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<EdgeConfig>,
    /// `None` when no backend base URL is configured.
    pub backend: Option<Arc<BackendClient>>,
    pub admin_auth: Arc<AdminAuth>,
}

impl AppState {
    pub fn new(config: EdgeConfig) -> Result<Self, reqwest::Error> {
        let backend = match &config.backend.base_url {
            Some(base) => Some(Arc::new(BackendClient::new(base.clone(), &config.backend)?)),
            None => None,
        };
        let admin_auth = Arc::new(AdminAuth::from_config(&config.admin));

        Ok(Self {
            config: Arc::new(config),
            backend,
            admin_auth,
        })
    }
}

/// HTTP server for the edge handler.
pub struct EdgeServer {
    router: Router,
}

impl EdgeServer {
    /// Create a new server with the given configuration.
    pub fn new(config: EdgeConfig) -> Result<Self, reqwest::Error> {
        let router = build_router(AppState::new(config)?);
        Ok(Self { router })
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining requests");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
#[allow(deprecated)]
pub fn build_router(state: AppState) -> Router {
    let request_timeout = Duration::from_secs(state.config.timeouts.request_secs);

    Router::new()
        .route("/", get(edge_handler))
        .route("/{*path}", get(edge_handler))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(TimeoutLayer::new(request_timeout)),
        )
}

/// Main edge handler: classify the path, then dispatch.
async fn edge_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip());
    let (parts, _) = request.into_parts();

    let request_id = request_id(&parts.headers).to_string();
    let decision = route(normalize_path(parts.uri.path()));
    let label = decision.label();

    tracing::debug!(
        request_id = %request_id,
        path = %parts.uri.path(),
        route = label,
        "Dispatching request"
    );

    let response = match dispatch(&state, decision, &parts.headers, peer).await {
        Ok(response) => response,
        Err(e) => {
            match &e {
                EdgeError::Upstream(_) | EdgeError::MissingBackend => {
                    tracing::error!(request_id = %request_id, route = label, error = %e, "Request failed")
                }
                _ => tracing::warn!(request_id = %request_id, route = label, error = %e, "Request rejected"),
            }
            e.into_response()
        }
    };

    metrics::record_request(label, response.status().as_u16(), start_time);
    response
}

async fn dispatch(
    state: &AppState,
    decision: RouteDecision,
    headers: &HeaderMap,
    peer: Option<IpAddr>,
) -> Result<Response, EdgeError> {
    let backend = state.backend.as_deref().ok_or(EdgeError::MissingBackend)?;
    let trace = TraceContext::from_headers(headers, peer, &state.config.backend.country_headers);

    match decision {
        RouteDecision::Health => Ok(pages::landing(backend.base_url())),
        RouteDecision::Admin => admin::admin_panel(state, backend, headers, &trace).await,
        RouteDecision::QrProxy(slug) => proxy_qr(backend, &slug, &trace).await,
        RouteDecision::SlugLookup(slug) => redirect_slug(backend, &slug, &trace).await,
        RouteDecision::NotFound => Ok(pages::not_found(None)),
    }
}

/// Relay the backend's QR image for a slug.
async fn proxy_qr(backend: &BackendClient, slug: &str, trace: &TraceContext) -> Result<Response, EdgeError> {
    let upstream = backend.qr(slug, trace).await?;
    Ok(relay(upstream))
}

async fn redirect_slug(backend: &BackendClient, slug: &str, trace: &TraceContext) -> Result<Response, EdgeError> {
    let response = match resolve(backend, slug, trace).await? {
        LookupResult::Redirect(target) => redirect_no_store(&target),
        LookupResult::NotFound => pages::not_found(Some(slug)),
        LookupResult::Passthrough(page) => no_store(relay(page)),
    };
    Ok(response)
}
