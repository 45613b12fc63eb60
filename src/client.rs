//! Remote token check against a running tollgate instance.

use crate::auth::DenyReason;
use crate::report::{Cause, CliError};
use crate::server::{TokenStatus, TOKEN_STATUS_PATH};
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Hide all but the first few characters of a token for diagnostics.
#[must_use]
pub fn mask_token(token: &str) -> String {
    const VISIBLE: usize = 4;
    let visible: String = token.chars().take(VISIBLE).collect();
    if token.chars().count() <= VISIBLE {
        "****".to_string()
    } else {
        format!("{visible}****")
    }
}

fn parse_server_url(server_url: &str) -> Result<Url, CliError> {
    let invalid = || CliError::InvalidServerUrl {
        data: server_url.to_string(),
    };
    let base = Url::parse(server_url).map_err(|_| invalid())?;
    if !matches!(base.scheme(), "http" | "https") || base.host_str().is_none() {
        return Err(invalid());
    }
    base.join(TOKEN_STATUS_PATH).map_err(|_| invalid())
}

/// Ask the instance at `server_url` whether `token` is accepted.
pub async fn check_remote(
    server_url: &str,
    token: &str,
    timeout: Duration,
) -> Result<TokenStatus, CliError> {
    let endpoint = parse_server_url(server_url)?;

    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| CliError::RequestError(Cause::from(e)))?;

    tracing::debug!(%endpoint, "Checking infra token remotely");
    let response = client
        .get(endpoint.clone())
        .bearer_auth(token)
        .send()
        .await
        .map_err(|e| {
            if e.is_connect() {
                CliError::ServerConnectionRefused {
                    data: server_url.to_string(),
                }
            } else {
                CliError::RequestError(Cause::from(e))
            }
        })?;

    let status = response.status();
    if status.is_success() {
        return response
            .json::<TokenStatus>()
            .await
            .map_err(|e| CliError::RequestError(Cause::from(e)));
    }

    let text = response.text().await.map_err(|e| {
        tracing::debug!(error = %e, %status, "Failed to read error response body");
        CliError::RequestError(Cause::from(e))
    })?;
    let body = if text.trim().is_empty() {
        Value::String(format!("{endpoint} responded with {status}"))
    } else {
        serde_json::from_str(&text).unwrap_or(Value::String(text))
    };

    if status == StatusCode::UNAUTHORIZED {
        let reason = body
            .pointer("/error/code")
            .and_then(Value::as_str)
            .and_then(DenyReason::from_code);
        tracing::debug!(?reason, "Remote instance rejected the token");
        return Err(match reason {
            Some(DenyReason::TokenExpired) => CliError::TokenExpired {
                data: mask_token(token),
            },
            _ => CliError::TokenInvalid {
                data: mask_token(token),
            },
        });
    }

    let detail = body.get("error").cloned().unwrap_or(body);
    Err(CliError::RequestError(Cause::from(detail)))
}
