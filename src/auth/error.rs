use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why the gate refused a request.
///
/// Every reason is an authentication failure and surfaces as HTTP 401 at the
/// boundary, carrying [`DenyReason::code`] so clients can tell an expired
/// token apart from an unknown one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DenyReason {
    #[error("Authorization header is missing")]
    HeaderMissing,
    #[error("Infra token is invalid")]
    InvalidToken,
    #[error("Infra token has expired")]
    TokenExpired,
}

impl DenyReason {
    /// Stable wire code sent in rejection bodies.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::HeaderMissing => "infra_token/header_missing",
            Self::InvalidToken => "infra_token/invalid_token",
            Self::TokenExpired => "infra_token/expired",
        }
    }

    /// Inverse of [`DenyReason::code`].
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "infra_token/header_missing" => Some(Self::HeaderMissing),
            "infra_token/invalid_token" => Some(Self::InvalidToken),
            "infra_token/expired" => Some(Self::TokenExpired),
            _ => None,
        }
    }
}

/// Errors returned by [`TokenGate::authorize`](super::TokenGate::authorize).
#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Denied(#[from] DenyReason),
    /// The token store could not answer. Never downgraded to a deny.
    #[error("token store lookup failed: {0}")]
    Store(#[source] anyhow::Error),
}

impl AuthError {
    #[must_use]
    pub fn deny_reason(&self) -> Option<DenyReason> {
        match self {
            Self::Denied(reason) => Some(*reason),
            Self::Store(_) => None,
        }
    }

    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Denied(_) => StatusCode::UNAUTHORIZED,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON rejection body: `{"error": {"code": ..., "message": ...}}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let (code, message) = match &self {
            Self::Denied(reason) => (reason.code(), reason.to_string()),
            Self::Store(e) => {
                tracing::error!(error = %e, "Token store failure while authorizing request");
                ("infra_token/store_unavailable", "Token store unavailable".to_string())
            }
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deny_codes_round_trip() {
        for reason in [
            DenyReason::HeaderMissing,
            DenyReason::InvalidToken,
            DenyReason::TokenExpired,
        ] {
            assert_eq!(DenyReason::from_code(reason.code()), Some(reason));
        }
        assert_eq!(DenyReason::from_code("infra_token/unknown"), None);
    }

    #[test]
    fn every_deny_is_unauthorized() {
        for reason in [
            DenyReason::HeaderMissing,
            DenyReason::InvalidToken,
            DenyReason::TokenExpired,
        ] {
            let err = AuthError::from(reason);
            assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
            assert_eq!(err.deny_reason(), Some(reason));
        }
    }

    #[test]
    fn store_failure_is_not_a_deny() {
        let err = AuthError::Store(anyhow::anyhow!("connection reset"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.deny_reason().is_none());
        assert!(err.to_string().contains("connection reset"));
    }

    #[test]
    fn into_response_uses_status() {
        let response = AuthError::Denied(DenyReason::TokenExpired).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
