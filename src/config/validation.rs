//! Configuration validation functions.

use super::Config;
use chrono::Utc;
use std::collections::HashSet;
use std::path::Path;

/// Reject configurations the gate or the client cannot work with.
///
/// Tokens that have already expired are logged at `warn` but accepted:
/// the gate denies them anyway.
pub fn validate_config(config: &Config) -> anyhow::Result<()> {
    let mut seen = HashSet::with_capacity(config.security.tokens.len());
    for (index, entry) in config.security.tokens.iter().enumerate() {
        if entry.token.is_empty() {
            anyhow::bail!("security.tokens[{index}].token must not be empty");
        }
        if !seen.insert(entry.token.as_str()) {
            anyhow::bail!(
                "security.tokens[{index}] duplicates an earlier token{}",
                entry
                    .label
                    .as_deref()
                    .map(|label| format!(" (label '{label}')"))
                    .unwrap_or_default()
            );
        }
    }

    let now = Utc::now();
    let expired = config
        .security
        .tokens
        .iter()
        .filter(|entry| entry.expires_on <= now)
        .count();
    if expired > 0 {
        tracing::warn!(
            expired,
            "Configured infra tokens have already expired and will be rejected"
        );
    }

    if let Some(path) = config.security.tokens_file.as_deref() {
        let is_json = Path::new(path)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if !is_json {
            anyhow::bail!("security.tokens_file must point to a .json file, got {path}");
        }
    }

    if let Some(raw) = config.client.server_url.as_deref() {
        let url = url::Url::parse(raw)
            .map_err(|e| anyhow::anyhow!("client.server_url '{raw}' is not a valid URL: {e}"))?;
        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!("client.server_url must use http or https, got {}", url.scheme());
        }
    }

    if config.client.timeout_secs == 0 {
        anyhow::bail!("client.timeout_secs must be greater than zero");
    }

    Ok(())
}
