//! HTTP surface guarded by the infra-token gate.
//!
//! - `GET /health` is open.
//! - `GET /v1/infra/token` requires a valid infra token and describes it.

use crate::auth::{require_infra_token, Grant, TokenGate};
use axum::http::HeaderValue;
use axum::routing::get;
use axum::{middleware, Extension, Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Path of the token introspection endpoint.
pub const TOKEN_STATUS_PATH: &str = "/v1/infra/token";

/// Body returned by [`TOKEN_STATUS_PATH`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenStatus {
    pub label: Option<String>,
    pub expires_on: DateTime<Utc>,
}

async fn token_status(Extension(grant): Extension<Grant>) -> Json<TokenStatus> {
    Json(TokenStatus {
        label: grant.label,
        expires_on: grant.expires_on,
    })
}

async fn health() -> &'static str {
    "ok"
}

/// Build the CORS layer from a comma-separated origin list or `*`.
fn cors_layer(cors_origins: &str) -> CorsLayer {
    if cors_origins.trim() == "*" {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = cors_origins
        .split(',')
        .filter_map(|s| s.trim().parse::<HeaderValue>().ok())
        .collect();

    if origins.is_empty() {
        tracing::warn!("No valid CORS origins configured, using permissive CORS");
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

pub fn build_router(gate: Arc<TokenGate>, cors_origins: &str) -> Router {
    let infra = Router::new()
        .route(TOKEN_STATUS_PATH, get(token_status))
        .route_layer(middleware::from_fn_with_state(gate, require_infra_token));

    Router::new()
        .route("/health", get(health))
        .merge(infra)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(cors_origins)),
        )
}

/// Serve `router` on all interfaces at `port` until the process stops.
pub async fn serve(router: Router, port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "tollgate listening - gated endpoint: {TOKEN_STATUS_PATH}");
    axum::serve(listener, router).await?;
    Ok(())
}
