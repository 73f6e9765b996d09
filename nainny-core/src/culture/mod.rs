//! Cultural marker detection, fit scoring and concept mapping.
//!
//! A [`CulturalAnalyzer`] snapshots a [`CulturalKnowledgeSource`] for one
//! culture and matches story text against its festivals and cultural
//! contexts.

pub mod analyzer;
pub mod knowledge;
pub mod markers;
pub mod models;

pub use analyzer::{Alternative, ConceptMapping, CulturalAnalyzer, fit_score};
pub use knowledge::{CulturalKnowledgeSource, EmbeddedKnowledgeBase, FileKnowledgeBase};
pub use markers::{
    CulturalFitReport, CulturalIssue, CulturalMarker, IssueKind, MarkerDetail, MarkerKind,
    Priority, Severity, Suggestion, SuggestionKind,
};
pub use models::{
    AgeRange, CulturalContext, CulturalMapping, Festival, KnowledgeSnapshot, Sensitivity,
    UsageExample, is_age_appropriate,
};
