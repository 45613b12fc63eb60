//! Loading infra token records for the CLI.
//!
//! A token file is a JSON array of [`StoredToken`] records:
//!
//! ```json
//! [{ "token": "…", "label": "deploy", "expiresOn": "2030-01-01T00:00:00Z" }]
//! ```
//!
//! Every failure is classified as a [`CliError`] so the binary can report it
//! directly.

use crate::auth::{InMemoryTokenStore, StoredToken};
use crate::config::SecurityConfig;
use crate::report::{Cause, CliError};
use serde_json::error::Category;
use std::fs;
use std::io;
use std::path::Path;

pub fn load_token_file(path: &Path) -> Result<Vec<StoredToken>, CliError> {
    let display = path.display().to_string();

    if !path.exists() {
        return Err(CliError::FileNotFound { path: display });
    }

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if !is_json {
        return Err(CliError::InvalidFileType { data: display });
    }

    let contents = fs::read_to_string(path).map_err(|e| inaccessible(&display, &e))?;

    serde_json::from_str::<Vec<StoredToken>>(&contents).map_err(|e| match e.classify() {
        Category::Syntax | Category::Eof => CliError::ParsingError {
            data: format!("{display}: {e}"),
        },
        Category::Data => CliError::MalformedCollection {
            path: display.clone(),
            cause: Cause::from(e),
        },
        Category::Io => CliError::InvalidId {
            data: format!("{display}: {e}"),
        },
    })
}

fn inaccessible(display: &str, err: &io::Error) -> CliError {
    CliError::InvalidId {
        data: format!("{display}: {err}"),
    }
}

/// Build the token store from inline configuration plus an optional token
/// file. `file_override` takes the place of `security.tokens_file`. Records
/// from the file replace inline records with the same token.
pub fn load_store(
    security: &SecurityConfig,
    file_override: Option<&Path>,
) -> Result<InMemoryTokenStore, CliError> {
    let store: InMemoryTokenStore = security
        .tokens
        .iter()
        .cloned()
        .map(StoredToken::from)
        .collect();

    let file = file_override.or_else(|| security.tokens_file.as_deref().map(Path::new));
    if let Some(path) = file {
        let records = load_token_file(path)?;
        tracing::debug!(path = %path.display(), count = records.len(), "Loaded token file");
        for record in records {
            if store.insert(record).is_some() {
                tracing::debug!("Token file entry replaced an inline token");
            }
        }
    }

    tracing::info!(tokens = store.len(), "Token store ready");
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TokenEntry;
    use crate::report::ErrorKind;
    use chrono::{TimeZone, Utc};
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    fn file_with(suffix: &str, contents: &str) -> NamedTempFile {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn missing_file_is_file_not_found() {
        let err = load_token_file(Path::new("does/not/exist.json")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FileNotFound);
        assert_eq!(err.to_string(), "File doesn't exist: does/not/exist.json");
    }

    #[test]
    fn wrong_extension_is_invalid_file_type() {
        let file = file_with(".yaml", "[]");
        let err = load_token_file(file.path()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFileType);
    }

    #[test]
    fn syntax_error_is_parsing_error() {
        let file = file_with(".json", "[{\"token\": ");
        let err = load_token_file(file.path()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ParsingError);
        assert!(err.to_string().starts_with("Unable to parse -\n"));
    }

    #[test]
    fn wrong_shape_is_malformed_collection() {
        let file = file_with(".json", r#"[{"label": "no token"}]"#);
        let err = load_token_file(file.path()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedCollection);
        let message = err.to_string();
        let (first, second) = message.split_once('\n').unwrap();
        assert_eq!(first, file.path().display().to_string());
        assert!(second.contains("missing field"));
    }

    #[test]
    fn valid_file_loads_records() {
        let file = file_with(
            ".json",
            r#"[{"token":"a","expiresOn":"2030-01-01T00:00:00Z"},
                {"token":"b","label":"ci","expiresOn":"2031-01-01T00:00:00Z"}]"#,
        );
        let records = load_token_file(file.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].label.as_deref(), Some("ci"));
    }

    #[tokio::test]
    async fn store_merges_inline_and_file_records() {
        use crate::auth::TokenStore;

        let file = file_with(
            ".json",
            r#"[{"token":"shared","label":"from-file","expiresOn":"2031-01-01T00:00:00Z"}]"#,
        );
        let security = SecurityConfig {
            tokens: vec![
                TokenEntry {
                    token: "inline".to_string(),
                    label: None,
                    expires_on: Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap(),
                },
                TokenEntry {
                    token: "shared".to_string(),
                    label: Some("inline".to_string()),
                    expires_on: Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap(),
                },
            ],
            ..SecurityConfig::default()
        };

        let store = load_store(&security, Some(file.path())).unwrap();
        assert_eq!(store.len(), 2);
        let shared = store.find_token("shared").await.unwrap().unwrap();
        assert_eq!(shared.label.as_deref(), Some("from-file"));
    }

    #[test]
    fn store_surfaces_file_errors() {
        let security = SecurityConfig {
            tokens_file: Some("missing-tokens.json".to_string()),
            ..SecurityConfig::default()
        };
        let err = load_store(&security, None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FileNotFound);
    }
}
