//! Offline token verification against the configured store.

use crate::auth::{AuthError, DenyReason, TokenGate};
use crate::client::mask_token;
use crate::report::{Cause, CliError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Outcome of `tollgate verify`, also written by `--output`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    pub token: String,
    pub allowed: bool,
    pub reason: Option<&'static str>,
    pub label: Option<String>,
    pub expires_on: Option<DateTime<Utc>>,
    pub checked_at: DateTime<Utc>,
}

/// Run `token` through `gate`, optionally exporting the verdict to `output`.
///
/// The verdict file is written for denials too; a denial still ends in
/// [`CliError::TokenExpired`] or [`CliError::TokenInvalid`].
pub async fn verify_token(
    gate: &TokenGate,
    token: &str,
    output: Option<&Path>,
) -> Result<Verdict, CliError> {
    let masked = mask_token(token);
    let checked_at = gate.now();
    let outcome = gate.authorize(Some(token)).await;

    let verdict = match &outcome {
        Ok(grant) => Verdict {
            token: masked.clone(),
            allowed: true,
            reason: None,
            label: grant.label.clone(),
            expires_on: Some(grant.expires_on),
            checked_at,
        },
        Err(AuthError::Denied(reason)) => Verdict {
            token: masked.clone(),
            allowed: false,
            reason: Some(reason.code()),
            label: None,
            expires_on: None,
            checked_at,
        },
        Err(AuthError::Store(_)) => Verdict {
            token: masked.clone(),
            allowed: false,
            reason: None,
            label: None,
            expires_on: None,
            checked_at,
        },
    };

    if let Some(path) = output {
        export_verdict(&verdict, path)?;
    }

    match outcome {
        Ok(_) => Ok(verdict),
        Err(AuthError::Denied(DenyReason::TokenExpired)) => {
            Err(CliError::TokenExpired { data: masked })
        }
        Err(AuthError::Denied(_)) => Err(CliError::TokenInvalid { data: masked }),
        Err(AuthError::Store(e)) => Err(CliError::UnknownError(Cause::from(e))),
    }
}

fn export_verdict(verdict: &Verdict, path: &Path) -> Result<(), CliError> {
    let export_failed = |data: String| CliError::ReportExportFailed {
        path: path.display().to_string(),
        data,
    };

    let json = serde_json::to_vec_pretty(verdict).map_err(|e| export_failed(e.to_string()))?;
    fs::write(path, json).map_err(|e| export_failed(e.to_string()))?;
    tracing::debug!(path = %path.display(), "Verdict exported");
    Ok(())
}
