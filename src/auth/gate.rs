//! Infra-token gate.
//!
//! Decides whether an inbound request carrying an `Authorization` header may
//! proceed. The gate holds no state of its own: one store lookup and one clock
//! reading per call.

use super::clock::{Clock, SystemClock};
use super::error::{AuthError, DenyReason};
use super::store::{StoredToken, TokenStore};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, HeaderValue};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Scheme marker stripped from the header value before lookup.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Successful authorization. Handlers can read it from request extensions.
#[derive(Debug, Clone)]
pub struct Grant {
    pub label: Option<String>,
    pub expires_on: DateTime<Utc>,
}

impl From<StoredToken> for Grant {
    fn from(record: StoredToken) -> Self {
        Self {
            label: record.label,
            expires_on: record.expires_on,
        }
    }
}

/// Extract the token from a raw header value.
///
/// A value starting with [`BEARER_PREFIX`] yields the remainder; anything else
/// is taken whole.
#[must_use]
pub fn extract_token(header_value: &str) -> &str {
    header_value
        .strip_prefix(BEARER_PREFIX)
        .unwrap_or(header_value)
}

pub struct TokenGate {
    store: Arc<dyn TokenStore>,
    clock: Arc<dyn Clock>,
}

impl TokenGate {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: Arc<dyn TokenStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Current instant according to the gate's clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Authorize a request given its `Authorization` header value.
    pub async fn authorize(&self, header_value: Option<&str>) -> Result<Grant, AuthError> {
        let Some(raw) = header_value else {
            tracing::warn!("Infra token rejected: missing Authorization header");
            return Err(DenyReason::HeaderMissing.into());
        };

        let token = extract_token(raw);
        if token.is_empty() {
            tracing::warn!("Infra token rejected: empty token");
            return Err(DenyReason::InvalidToken.into());
        }

        let record = self.store.find_token(token).await.map_err(|e| {
            tracing::error!(error = %e, "Infra token lookup failed");
            AuthError::Store(e)
        })?;

        let Some(record) = record else {
            tracing::warn!("Infra token rejected: no matching token");
            return Err(DenyReason::InvalidToken.into());
        };

        let now = self.clock.now();
        if record.is_expired_at(now) {
            tracing::warn!(
                label = ?record.label,
                expires_on = %record.expires_on,
                "Infra token rejected: token expired"
            );
            return Err(DenyReason::TokenExpired.into());
        }

        tracing::debug!(
            label = ?record.label,
            "Infra token accepted"
        );
        Ok(record.into())
    }

    /// Authorize using the `Authorization` entry of a header map.
    pub async fn authorize_headers(&self, headers: &HeaderMap) -> Result<Grant, AuthError> {
        self.authorize_header(headers.get(AUTHORIZATION)).await
    }

    /// Authorize a typed header value.
    ///
    /// A header that is present but not valid visible ASCII cannot match any
    /// stored token and is denied as [`DenyReason::InvalidToken`].
    pub async fn authorize_header(&self, value: Option<&HeaderValue>) -> Result<Grant, AuthError> {
        match value.map(HeaderValue::to_str) {
            None => self.authorize(None).await,
            Some(Ok(raw)) => self.authorize(Some(raw)).await,
            Some(Err(_)) => {
                tracing::warn!("Infra token rejected: Authorization header is not ASCII");
                Err(DenyReason::InvalidToken.into())
            }
        }
    }
}
