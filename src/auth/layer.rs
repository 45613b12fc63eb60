//! Axum integration for [`TokenGate`].

use super::error::AuthError;
use super::gate::TokenGate;
use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use std::sync::Arc;

/// Middleware rejecting requests that do not carry a valid infra token.
///
/// Install with `axum::middleware::from_fn_with_state(gate, require_infra_token)`.
/// On success the [`Grant`](super::Grant) is stored in the request extensions.
pub async fn require_infra_token(
    State(gate): State<Arc<TokenGate>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    // Owned copy: the request body is not `Sync`, so no borrow of `req` may
    // live across the store lookup.
    let authorization = req.headers().get(AUTHORIZATION).cloned();
    let grant = gate.authorize_header(authorization.as_ref()).await?;
    req.extensions_mut().insert(grant);
    Ok(next.run(req).await)
}
