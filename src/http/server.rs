//! HTTP server setup and dispatch.
//!
//! # Responsibilities
//! - Build the Axum app with the dispatch handler as the single entry
//!   point for every path
//! - Wire up middleware (request ID, tracing)
//! - Hand each matched request to its bound handler: stub script,
//!   compiler proxy, upstream proxy, or static files
//! - Serve with graceful shutdown

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::{ConnectInfo, State};
use axum::http::{Request, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::Router;
use tokio::net::TcpListener;
use tower::util::ServiceExt;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::{FallbackConfig, ServerConfig};
use crate::proxy::forwarder::stripped_path;
use crate::proxy::Forwarder;
use crate::routing::{RouteAction, RouteTable};

/// Application state injected into the dispatch handler.
///
/// Everything here is immutable or internally synchronized; concurrent
/// requests share it without locking.
#[derive(Clone)]
pub struct AppState {
    pub table: Arc<RouteTable>,
    pub forwarder: Forwarder,
    pub static_files: Option<ServeDir>,
}

/// HTTP server for the development front-end.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a server around a built route table.
    pub fn new(config: &ServerConfig, table: RouteTable) -> Self {
        let static_files = match &config.fallback {
            FallbackConfig::Static { base_dir } => Some(ServeDir::new(base_dir)),
            FallbackConfig::Proxy { .. } => None,
        };
        let state = AppState {
            table: Arc::new(table),
            forwarder: Forwarder::new(),
            static_files,
        };
        Self {
            router: Self::build_router(state),
        }
    }

    /// Build the Axum router. A single catch-all feeds our own
    /// dispatcher; Axum is transport, the route table decides.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(dispatch))
            .route("/", any(dispatch))
            .with_state(state)
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::x_request_id())
    }

    /// Run the server until `shutdown` resolves.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Resolves when Ctrl+C is received.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        return;
    }
    tracing::info!("Shutdown signal received");
}

/// Single entry point: match the path against the route table and
/// invoke the bound handler.
async fn dispatch(
    State(state): State<AppState>,
    ConnectInfo(client_addr): ConnectInfo<SocketAddr>,
    request: Request<Body>,
) -> Response {
    let path = request.uri().path().to_string();

    let Some(route) = state.table.dispatch(&path) else {
        // Outside the configured context path; not ours to serve.
        tracing::debug!(path = %path, "No route matched");
        return (StatusCode::NOT_FOUND, "Not Found").into_response();
    };

    match &route.action {
        RouteAction::Stub(stub) => {
            tracing::debug!(path = %path, "Serving stub script");
            stub.response()
        }
        RouteAction::Proxy(binding) => {
            match state.forwarder.forward(binding, request, client_addr).await {
                Ok(response) => response.into_response(),
                Err(e) => {
                    tracing::error!(path = %path, error = %e, "Upstream error");
                    (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
                }
            }
        }
        RouteAction::Static { strip_prefix } => {
            serve_static(&state, strip_prefix.as_deref(), request).await
        }
    }
}

/// Hand the request to the static-file collaborator, with the context
/// path (and only the context path) removed.
async fn serve_static(
    state: &AppState,
    strip_prefix: Option<&str>,
    request: Request<Body>,
) -> Response {
    let Some(files) = state.static_files.clone() else {
        // The table builder only emits Static actions for static
        // configurations, so this is unreachable in a built server.
        tracing::error!("Static route matched but no base directory is configured");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };
    let request = match strip_prefix {
        Some(prefix) => rewrite_path(request, prefix),
        None => request,
    };
    match files.oneshot(request).await {
        Ok(response) => response.map(Body::new).into_response(),
        Err(infallible) => match infallible {},
    }
}

/// Rebuild the request with `prefix` stripped from the path, keeping
/// the query string.
fn rewrite_path(request: Request<Body>, prefix: &str) -> Request<Body> {
    let (mut parts, body) = request.into_parts();
    let path = stripped_path(parts.uri.path(), Some(prefix));
    let path_and_query = match parts.uri.query() {
        Some(query) => format!("{}?{}", path, query),
        None => path.to_string(),
    };
    match path_and_query.parse::<Uri>() {
        Ok(uri) => parts.uri = uri,
        Err(e) => {
            tracing::warn!(error = %e, "Could not rewrite static path; serving unstripped");
        }
    }
    Request::from_parts(parts, body)
}
