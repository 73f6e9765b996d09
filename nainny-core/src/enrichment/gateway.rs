use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::Utc;

use crate::concepts::{Concept, Relations};
use crate::config::EnrichmentConfig;
use crate::error::{NainnyError, Result};

use super::retry::{RetryConfig, is_transient, with_retry_if};
use super::source::{ConceptNetClient, RelationSource};
use super::store::{InMemoryRelationStore, RelationStore};

/// Concepts below this importance are never looked up.
pub const DEFAULT_IMPORTANCE_THRESHOLD: f64 = 0.3;

/// Outcome of a relation lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum Enrichment {
    /// Relations were found (from cache or the source).
    Found(Relations),
    /// The source answered but knows no relations for the term.
    Empty,
    /// No answer: offline, timed out, or the source failed.
    Unavailable(String),
}

impl Enrichment {
    fn from_relations(relations: Relations) -> Self {
        if relations.is_empty() {
            Enrichment::Empty
        } else {
            Enrichment::Found(relations)
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Enrichment::Found(_))
    }

    pub fn relations(self) -> Option<Relations> {
        match self {
            Enrichment::Found(relations) => Some(relations),
            _ => None,
        }
    }
}

/// Best-effort lookup of semantic relations with a local cache.
///
/// Never returns an error: every failure becomes [`Enrichment::Unavailable`]
/// and is logged at warn level.
pub struct ConceptEnricher {
    store: Arc<dyn RelationStore>,
    source: Option<Arc<dyn RelationSource>>,
    offline: AtomicBool,
    cache_expiry: Duration,
    timeout: Duration,
    retry: RetryConfig,
    importance_threshold: f64,
}

impl ConceptEnricher {
    pub fn new(
        store: Arc<dyn RelationStore>,
        source: Option<Arc<dyn RelationSource>>,
        config: &EnrichmentConfig,
    ) -> Self {
        Self {
            store,
            source,
            offline: AtomicBool::new(config.offline),
            cache_expiry: config.cache_expiry,
            timeout: config.timeout,
            retry: RetryConfig::from_enrichment(config),
            importance_threshold: config.importance_threshold,
        }
    }

    /// In-memory cache in front of ConceptNet.
    pub fn from_config(config: &EnrichmentConfig) -> Result<Self> {
        let source: Arc<dyn RelationSource> = Arc::new(ConceptNetClient::from_config(config)?);
        Ok(Self::new(
            Arc::new(InMemoryRelationStore::new()),
            Some(source),
            config,
        ))
    }

    /// Cache-only enricher with no external source.
    pub fn cache_only(store: Arc<dyn RelationStore>) -> Self {
        Self::new(store, None, &EnrichmentConfig::default())
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn is_offline(&self) -> bool {
        self.offline.load(Ordering::Relaxed) || self.source.is_none()
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::Relaxed);
        tracing::info!(offline, "Enrichment mode changed");
    }

    pub fn importance_threshold(&self) -> f64 {
        self.importance_threshold
    }

    /// Look up relations for a term (lowercased).
    pub async fn lookup(&self, term: &str) -> Enrichment {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return Enrichment::Empty;
        }

        let cached = match self.store.get(&term).await {
            Ok(cached) => cached,
            Err(e) => {
                tracing::warn!(term = %term, error = %e, "Relation cache read failed");
                None
            }
        };

        let fresh = cached
            .as_ref()
            .is_some_and(|c| !c.is_expired(self.cache_expiry, Utc::now()));

        if let Some(entry) = &cached
            && (fresh || self.is_offline())
        {
            self.record_hit(&term).await;
            return Enrichment::from_relations(entry.relations.clone());
        }

        let Some(source) = self.source.clone().filter(|_| !self.is_offline()) else {
            return Enrichment::Unavailable("offline".to_string());
        };

        match self.fetch(source, &term).await {
            Ok(relations) => {
                if let Err(e) = self.store.put(&term, relations.clone()).await {
                    tracing::warn!(term = %term, error = %e, "Relation cache write failed");
                }
                Enrichment::from_relations(relations)
            }
            Err(e) => {
                tracing::warn!(term = %term, error = %e, "Relation lookup failed");
                match cached {
                    // stale beats nothing
                    Some(entry) => {
                        self.record_hit(&term).await;
                        Enrichment::from_relations(entry.relations)
                    }
                    None => Enrichment::Unavailable(e.to_string()),
                }
            }
        }
    }

    async fn fetch(&self, source: Arc<dyn RelationSource>, term: &str) -> Result<Relations> {
        let timeout = self.timeout;
        with_retry_if(&self.retry, is_transient, || {
            let source = source.clone();
            async move {
                tokio::time::timeout(timeout, source.fetch(term))
                    .await
                    .map_err(|_| {
                        NainnyError::Enrichment(format!(
                            "{} lookup timed out after {:?}",
                            source.name(),
                            timeout
                        ))
                    })?
            }
        })
        .await
    }

    async fn record_hit(&self, term: &str) {
        if let Err(e) = self.store.touch(term).await {
            tracing::debug!(term, error = %e, "Failed to record cache hit");
        }
    }

    /// Relations for `term`, or `None` when nothing could be found.
    pub async fn get_relations(&self, term: &str) -> Option<Relations> {
        self.lookup(term).await.relations()
    }

    /// Attach relations to every concept at or above the importance threshold.
    ///
    /// Concepts whose lookup does not find anything are returned unchanged.
    pub async fn enrich(&self, concepts: Vec<Concept>) -> Vec<Concept> {
        let mut enriched = Vec::with_capacity(concepts.len());
        for concept in concepts {
            if concept.importance < self.importance_threshold {
                enriched.push(concept);
                continue;
            }
            match self.lookup(&concept.text).await {
                Enrichment::Found(relations) => enriched.push(concept.with_relations(relations)),
                _ => enriched.push(concept),
            }
        }
        enriched
    }

    /// Terms related both to `concept` and to `culture`, in the concept's
    /// relation order. Empty when either lookup finds nothing.
    pub async fn suggest_equivalents(&self, concept: &str, culture: &str) -> Vec<String> {
        let (Enrichment::Found(concept_relations), Enrichment::Found(culture_relations)) =
            (self.lookup(concept).await, self.lookup(culture).await)
        else {
            return Vec::new();
        };

        let culture_terms: std::collections::HashSet<&String> =
            culture_relations.values().flatten().collect();
        let concept_lower = concept.trim().to_lowercase();
        let culture_lower = culture.trim().to_lowercase();

        let mut suggestions: Vec<String> = Vec::new();
        for term in concept_relations.values().flatten() {
            if culture_terms.contains(term)
                && *term != concept_lower
                && *term != culture_lower
                && !suggestions.contains(term)
            {
                suggestions.push(term.clone());
            }
        }
        suggestions
    }
}
