//! Token storage abstraction.
//!
//! The gate only ever performs point-in-time lookups; issuing, rotating and
//! deleting tokens is the owner's business. [`InMemoryTokenStore`] is the
//! backend used by the binary, seeded from configuration and token files.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

/// A persisted infra token record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredToken {
    pub token: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(alias = "expires_on")]
    pub expires_on: DateTime<Utc>,
}

impl StoredToken {
    pub fn new(token: impl Into<String>, expires_on: DateTime<Utc>) -> Self {
        Self {
            token: token.into(),
            label: None,
            expires_on,
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Whether the token is no longer usable at `now`. Expiry is inclusive.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_on
    }
}

/// Lookup of stored tokens by exact token string.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Find the record whose token equals `token` exactly.
    ///
    /// `Ok(None)` means no such record; `Err` means the store could not be
    /// consulted at all.
    async fn find_token(&self, token: &str) -> Result<Option<StoredToken>>;
}

/// Concurrent in-memory token store.
#[derive(Debug, Default)]
pub struct InMemoryTokenStore {
    tokens: DashMap<String, StoredToken>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a record, returning the previous one.
    pub fn insert(&self, record: StoredToken) -> Option<StoredToken> {
        self.tokens.insert(record.token.clone(), record)
    }

    pub fn remove(&self, token: &str) -> Option<StoredToken> {
        self.tokens.remove(token).map(|(_, record)| record)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl FromIterator<StoredToken> for InMemoryTokenStore {
    fn from_iter<I: IntoIterator<Item = StoredToken>>(iter: I) -> Self {
        let store = Self::new();
        for record in iter {
            store.insert(record);
        }
        store
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn find_token(&self, token: &str) -> Result<Option<StoredToken>> {
        Ok(self.tokens.get(token).map(|entry| entry.value().clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn expiry() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn lookup_is_exact_match() {
        let store: InMemoryTokenStore = [StoredToken::new("abc123", expiry())]
            .into_iter()
            .collect();

        assert!(store.find_token("abc123").await.unwrap().is_some());
        assert!(store.find_token("abc").await.unwrap().is_none());
        assert!(store.find_token("abc1234").await.unwrap().is_none());
        assert!(store.find_token("ABC123").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn insert_replaces_and_remove_deletes() {
        let store = InMemoryTokenStore::new();
        assert!(store.is_empty());
        assert!(store.insert(StoredToken::new("t", expiry())).is_none());

        let replaced = store.insert(StoredToken::new("t", expiry()).with_label("ci"));
        assert!(replaced.is_some());
        assert_eq!(store.len(), 1);

        let found = store.find_token("t").await.unwrap().unwrap();
        assert_eq!(found.label.as_deref(), Some("ci"));

        assert!(store.remove("t").is_some());
        assert!(store.find_token("t").await.unwrap().is_none());
    }

    #[test]
    fn expiry_is_inclusive() {
        let record = StoredToken::new("t", expiry());
        assert!(!record.is_expired_at(expiry() - Duration::seconds(1)));
        assert!(record.is_expired_at(expiry()));
        assert!(record.is_expired_at(expiry() + Duration::seconds(1)));
    }

    #[test]
    fn deserializes_camel_case_records() {
        let record: StoredToken = serde_json::from_str(
            r#"{"token":"abc","label":"deploy","expiresOn":"2030-01-01T00:00:00+02:00"}"#,
        )
        .unwrap();
        assert_eq!(record.label.as_deref(), Some("deploy"));
        assert_eq!(
            record.expires_on,
            Utc.with_ymd_and_hms(2029, 12, 31, 22, 0, 0).unwrap()
        );
    }

    #[test]
    fn records_accept_either_expiry_spelling() {
        let camel: StoredToken =
            serde_json::from_str(r#"{"token":"a","expiresOn":"2030-01-01T00:00:00Z"}"#).unwrap();
        let snake: StoredToken =
            serde_json::from_str(r#"{"token":"a","expires_on":"2030-01-01T00:00:00Z"}"#).unwrap();
        assert_eq!(camel, snake);
        assert_eq!(camel.expires_on, expiry());
    }
}
