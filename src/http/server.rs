//! HTTP server setup and request dispatch.
//!
//! # Responsibilities
//! - Create Axum Router with the mount-prefix routes and the root info page
//! - Wire up middleware (tracing, request ID)
//! - Translate inbound paths, forward to the upstream, transform the response
//! - Observability (metrics, request IDs)

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::ProxyConfig;
use crate::http::request::{RequestIdLayer, X_REQUEST_ID};
use crate::http::response::transform_response;
use crate::observability::metrics;
use crate::rewrite::{PathTranslator, ProxyBase};
use crate::upstream::OriginClient;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub client: Arc<OriginClient>,
    pub translator: Arc<PathTranslator>,
    pub config: Arc<ProxyConfig>,
}

/// HTTP server for the mirror proxy.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Result<Self, reqwest::Error> {
        let client = Arc::new(OriginClient::new(&config)?);
        let translator = Arc::new(PathTranslator::new(
            client.origin(),
            config.upstream.mount_prefix.clone(),
        ));

        let state = AppState {
            client,
            translator,
            config: Arc::new(config),
        };

        let router = Self::build_router(state);
        Ok(Self { router })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        let prefix = state.config.upstream.mount_prefix.clone();
        Router::new()
            .route("/", get(index_handler))
            .route(&prefix, any(proxy_handler))
            .route(&format!("{}/{{*path}}", prefix), any(proxy_handler))
            .with_state(state)
            .layer(RequestIdLayer)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Root informational page. Never proxied.
async fn index_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    let prefix = &state.config.upstream.mount_prefix;
    Json(serde_json::json!({
        "service": "mirror-proxy",
        "status": "running",
        "mount_prefix": prefix,
        "usage": format!("request {}/<path> to reach the upstream", prefix),
    }))
}

/// Main proxy handler: translate, forward, transform, emit.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let method = request.method().clone();
    let (parts, body) = request.into_parts();
    let path = parts.uri.path().to_string();
    let query = parts.uri.query().map(String::from);

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        "Proxying request"
    );

    // Resolved per request: forwarding headers vary behind different front ends.
    let base = ProxyBase::resolve(&parts.headers, state.config.upstream.mount_prefix.as_str());
    let upstream_path = state.translator.to_upstream(&path);

    let body_bytes = match axum::body::to_bytes(body, state.config.limits.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(_) => {
            metrics::record_request(method.as_str(), 413, start_time);
            return (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large").into_response();
        }
    };

    match state
        .client
        .forward(
            method.clone(),
            &upstream_path,
            query.as_deref(),
            &parts.headers,
            body_bytes,
        )
        .await
    {
        Ok(upstream) => {
            let status = upstream.status;
            tracing::debug!(
                request_id = %request_id,
                status = %status,
                body_bytes = upstream.body.len(),
                "Upstream responded"
            );
            let response = transform_response(upstream, &state.translator, &base);
            metrics::record_request(method.as_str(), status.as_u16(), start_time);
            response
        }
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                path = %upstream_path,
                error = %e,
                "Upstream request failed"
            );
            metrics::record_request(method.as_str(), 502, start_time);
            (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
        }
    }
}
