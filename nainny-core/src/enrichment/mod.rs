//! Best-effort enrichment of concepts with external semantic relations.
//!
//! Lookups go through a [`RelationStore`] cache first and fall back to a
//! [`RelationSource`] (ConceptNet by default) with a timeout and bounded
//! retries. Failures never propagate; they surface as
//! [`Enrichment::Unavailable`].

pub mod gateway;
pub mod retry;
pub mod source;
pub mod store;

pub use gateway::{ConceptEnricher, DEFAULT_IMPORTANCE_THRESHOLD, Enrichment};
pub use retry::{RetryConfig, with_retry};
pub use source::{ConceptNetClient, RelationSource};
pub use store::{CachedRelations, InMemoryRelationStore, RelationStore};
