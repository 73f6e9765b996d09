//! Cache of semantic relations keyed by term.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::concepts::Relations;
use crate::error::Result;

/// A cached lookup result with access bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedRelations {
    pub concept: String,
    pub relations: Relations,
    pub last_updated: DateTime<Utc>,
    pub last_accessed: DateTime<Utc>,
    pub access_count: u64,
}

impl CachedRelations {
    pub fn new(concept: impl Into<String>, relations: Relations) -> Self {
        let now = Utc::now();
        Self {
            concept: concept.into(),
            relations,
            last_updated: now,
            last_accessed: now,
            access_count: 0,
        }
    }

    /// Older than `expiry` as of `now`.
    pub fn is_expired(&self, expiry: Duration, now: DateTime<Utc>) -> bool {
        match chrono::Duration::from_std(expiry) {
            Ok(expiry) => now - self.last_updated > expiry,
            // Out of chrono's range; never expires.
            Err(_) => false,
        }
    }
}

/// Storage backend for the relation cache.
///
/// Writes are upserts keyed by term; concurrent writers are serialized by the
/// backend.
#[async_trait]
pub trait RelationStore: Send + Sync {
    async fn get(&self, term: &str) -> Result<Option<CachedRelations>>;

    /// Insert or replace the relations for `term`, keeping its access history.
    async fn put(&self, term: &str, relations: Relations) -> Result<()>;

    /// Record a cache hit.
    async fn touch(&self, term: &str) -> Result<()>;

    async fn len(&self) -> Result<usize>;
}

/// In-memory relation cache
#[derive(Default, Clone)]
pub struct InMemoryRelationStore {
    entries: Arc<RwLock<HashMap<String, CachedRelations>>>,
}

impl InMemoryRelationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fully specified entry, e.g. to seed a cache or simulate age.
    pub async fn insert(&self, entry: CachedRelations) {
        self.entries
            .write()
            .await
            .insert(entry.concept.clone(), entry);
    }
}

#[async_trait]
impl RelationStore for InMemoryRelationStore {
    async fn get(&self, term: &str) -> Result<Option<CachedRelations>> {
        Ok(self.entries.read().await.get(term).cloned())
    }

    async fn put(&self, term: &str, relations: Relations) -> Result<()> {
        let mut entries = self.entries.write().await;
        match entries.get_mut(term) {
            Some(entry) => {
                entry.relations = relations;
                entry.last_updated = Utc::now();
            }
            None => {
                entries.insert(term.to_string(), CachedRelations::new(term, relations));
            }
        }
        Ok(())
    }

    async fn touch(&self, term: &str) -> Result<()> {
        if let Some(entry) = self.entries.write().await.get_mut(term) {
            entry.access_count += 1;
            entry.last_accessed = Utc::now();
        }
        Ok(())
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.entries.read().await.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn relations(pairs: &[(&str, &[&str])]) -> Relations {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.iter().map(|s| s.to_string()).collect()))
            .collect()
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let store = InMemoryRelationStore::new();
        store.put("apple", relations(&[("is-a", &["fruit"])])).await.unwrap();

        let cached = store.get("apple").await.unwrap().unwrap();
        assert_eq!(cached.relations["is-a"], vec!["fruit".to_string()]);
        assert_eq!(cached.access_count, 0);
        assert!(store.get("pear").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upsert_keeps_access_history() {
        let store = InMemoryRelationStore::new();
        store.put("lamp", relations(&[("used-for", &["light"])])).await.unwrap();
        store.touch("lamp").await.unwrap();
        store.touch("lamp").await.unwrap();
        store.put("lamp", relations(&[("is-a", &["object"])])).await.unwrap();

        let cached = store.get("lamp").await.unwrap().unwrap();
        assert_eq!(cached.access_count, 2);
        assert!(cached.relations.contains_key("is-a"));
        assert!(!cached.relations.contains_key("used-for"));
        assert_eq!(store.len().await.unwrap(), 1);
    }

    #[test]
    fn test_expiry() {
        let mut entry = CachedRelations::new("diya", Relations::new());
        let expiry = Duration::from_secs(30 * 24 * 3600);
        assert!(!entry.is_expired(expiry, Utc::now()));

        entry.last_updated = Utc::now() - chrono::Duration::days(31);
        assert!(entry.is_expired(expiry, Utc::now()));
    }
}
