//! Configuration loading and environment parsing.

use super::Config;
use serde_json::{Map, Value};
use std::env;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Prefix for per-field overrides, e.g. `TOLLGATE__SECURITY__TOKENS_FILE`.
pub const ENV_OVERRIDE_PREFIX: &str = "TOLLGATE__";

/// File looked up in the working directory when nothing else is configured.
pub const DEFAULT_CONFIG_FILE: &str = "tollgate.json";

/// Load configuration without an explicit file. See [`load_from`].
#[must_use]
pub fn load() -> Config {
    load_from(None)
}

/// Load configuration with the following precedence (highest first):
/// 1) `TOLLGATE_CONFIG_JSON` env var containing raw JSON
/// 2) JSON from stdin when `TOLLGATE_CONFIG_STDIN` is `true`/`1`/`yes`
/// 3) `explicit_path` (the `--config` flag)
/// 4) File pointed to by `TOLLGATE_CONFIG_PATH`
/// 5) `tollgate.json` in the current working directory
/// 6) Defaults compiled into the binary
///
/// Documents are merged key by key, so a higher source only replaces the
/// fields it mentions. `TOLLGATE__SECTION__FIELD` variables are applied last.
///
/// Read or parse failures are printed to stderr and the source is skipped;
/// `load_from` always returns a `Config`. The result is not validated; callers
/// that must refuse a bad config run
/// [`validate_config`](super::validate_config) once themselves.
#[must_use]
pub fn load_from(explicit_path: Option<&Path>) -> Config {
    let defaults = Config::default();
    let mut merged =
        serde_json::to_value(&defaults).unwrap_or_else(|_| Value::Object(Map::new()));

    // Lowest precedence first; later merges win.
    merge_file_source(&mut merged, Path::new(DEFAULT_CONFIG_FILE));

    if let Ok(path) = env::var("TOLLGATE_CONFIG_PATH") {
        merge_file_source(&mut merged, &PathBuf::from(path));
    }

    if let Some(path) = explicit_path {
        merge_file_source(&mut merged, path);
    }

    if env::var("TOLLGATE_CONFIG_STDIN").is_ok_and(|v| env_var_truthy(&v)) {
        let mut buf = String::new();
        match std::io::stdin().read_to_string(&mut buf) {
            Ok(_) => {
                if let Some(value) = parse_json_document(&buf, "stdin") {
                    merge_values(&mut merged, value);
                }
            }
            Err(e) => eprintln!("Failed to read config from stdin: {e}"),
        }
    }

    if let Ok(json) = env::var("TOLLGATE_CONFIG_JSON") {
        if let Some(value) = parse_json_document(&json, "TOLLGATE_CONFIG_JSON") {
            merge_values(&mut merged, value);
        }
    }

    apply_env_overrides(&mut merged, env::vars());

    match serde_json::from_value::<Config>(merged) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to deserialize config; using defaults: {e}");
            defaults
        }
    }
}

fn parse_json_document(raw: &str, label: &str) -> Option<Value> {
    if raw.trim().is_empty() {
        return None;
    }

    serde_json::from_str(raw)
        .map_err(|err| eprintln!("Failed to parse config from {label}: {err}"))
        .ok()
}

fn merge_file_source(target: &mut Value, path: &Path) {
    if path.as_os_str().is_empty() || !path.exists() {
        return;
    }

    match fs::read_to_string(path) {
        Ok(contents) => {
            let label = format!("file {}", path.display());
            if let Some(value) = parse_json_document(&contents, &label) {
                merge_values(target, value);
            }
        }
        Err(err) => eprintln!("Failed to read config from {}: {err}", path.display()),
    }
}

/// Deep-merge `source` into `target`. Objects merge per key; anything else
/// replaces the target value.
pub(crate) fn merge_values(target: &mut Value, source: Value) {
    match (target, source) {
        (Value::Object(target_map), Value::Object(source_map)) => {
            for (key, value) in source_map {
                match target_map.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        target_map.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

/// Apply `TOLLGATE__A__B=value` style overrides from `vars`.
pub(crate) fn apply_env_overrides<I>(root: &mut Value, vars: I)
where
    I: IntoIterator<Item = (String, String)>,
{
    for (key, raw_value) in vars {
        let Some(stripped) = key.strip_prefix(ENV_OVERRIDE_PREFIX) else {
            continue;
        };

        let segments: Vec<String> = stripped
            .split("__")
            .filter(|segment| !segment.is_empty())
            .map(str::to_ascii_lowercase)
            .collect();

        if segments.is_empty() {
            continue;
        }

        set_nested_value(root, &segments, parse_env_value(&raw_value));
    }
}

fn env_var_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes"
    )
}

/// Comma-separated values become arrays; scalars are parsed as JSON when
/// possible (numbers, booleans) and kept as strings otherwise.
fn parse_env_value(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.contains(',') {
        return Value::Array(
            trimmed
                .split(',')
                .map(|segment| parse_scalar(segment.trim()))
                .collect(),
        );
    }
    parse_scalar(trimmed)
}

fn parse_scalar(raw: &str) -> Value {
    if raw.is_empty() {
        return Value::String(String::new());
    }
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn set_nested_value(target: &mut Value, segments: &[String], value: Value) {
    let Some((head, rest)) = segments.split_first() else {
        *target = value;
        return;
    };

    if !target.is_object() {
        *target = Value::Object(Map::new());
    }
    let Value::Object(map) = target else {
        return;
    };

    if rest.is_empty() {
        map.insert(head.clone(), value);
    } else {
        let entry = map
            .entry(head.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        set_nested_value(entry, rest, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn merge_replaces_only_mentioned_fields() {
        let mut base = json!({"port": 1, "logging": {"dir": "logs", "filename": "a.log"}});
        merge_values(&mut base, json!({"logging": {"filename": "b.log"}}));
        assert_eq!(
            base,
            json!({"port": 1, "logging": {"dir": "logs", "filename": "b.log"}})
        );
    }

    #[test]
    fn env_overrides_nest_and_parse_scalars() {
        let mut root = json!({"port": 3170, "client": {"timeout_secs": 10}});
        apply_env_overrides(
            &mut root,
            vars(&[
                ("TOLLGATE__PORT", "8080"),
                ("TOLLGATE__CLIENT__SERVER_URL", "http://localhost:8080"),
                ("TOLLGATE__SECURITY__CORS_ORIGINS", "https://a.test"),
                ("UNRELATED__PORT", "1"),
                ("TOLLGATE__", "ignored"),
            ]),
        );
        assert_eq!(root["port"], json!(8080));
        assert_eq!(root["client"]["timeout_secs"], json!(10));
        assert_eq!(root["client"]["server_url"], json!("http://localhost:8080"));
        assert_eq!(root["security"]["cors_origins"], json!("https://a.test"));
    }

    #[test]
    fn comma_values_become_arrays() {
        assert_eq!(parse_env_value("a, b,3"), json!(["a", "b", 3]));
        assert_eq!(parse_env_value("true"), json!(true));
        assert_eq!(parse_env_value(""), json!(""));
    }

    #[test]
    fn overrides_deserialize_into_config() {
        let mut root = serde_json::to_value(Config::default()).unwrap();
        apply_env_overrides(
            &mut root,
            vars(&[
                ("TOLLGATE__LOGGING__LEVEL", "debug"),
                ("TOLLGATE__SECURITY__TOKENS_FILE", "tokens.json"),
            ]),
        );
        let cfg: Config = serde_json::from_value(root).unwrap();
        assert_eq!(cfg.logging.level, Some(crate::config::LogLevel::Debug));
        assert_eq!(cfg.security.tokens_file.as_deref(), Some("tokens.json"));
    }

    #[test]
    fn blank_documents_are_skipped() {
        assert!(parse_json_document("   ", "test").is_none());
        assert!(parse_json_document("{not json", "test").is_none());
        assert_eq!(parse_json_document("{}", "test"), Some(json!({})));
    }
}
