//! # Nainny - Narrative Intelligence for Children's Stories
//!
//! Nainny analyses children's stories and adapts them for a target culture
//! and age group:
//! - Readability and complexity scoring with an age recommendation
//! - Concept extraction and theme detection
//! - Best-effort enrichment of concepts with ConceptNet relations
//! - Cultural marker detection and fit scoring against a knowledge base
//! - Rule-based or generative story adaptation
//! - Scoring of adaptations for meaning, simplicity and cultural presence
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use nainny_core::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = NainnyConfig::load()?;
//!     let repository = Arc::new(InMemoryStoryRepository::new());
//!     let parser = StoryParser::new(LanguageModel::load(), repository, &config)?;
//!
//!     let text = "Meena and her grandmother lit a diya on Diwali. The whole street glowed.";
//!     let analysis = parser.parse_story(text, "Meena's Diya", false).await?;
//!
//!     let analyzer =
//!         CulturalAnalyzer::load(&EmbeddedKnowledgeBase::seeded(), "indian", None).await?;
//!     let report = analyzer.analyze_cultural_fit(text, &analysis.concepts, None);
//!     println!("fit {:.2}: {}", report.score, report.overall_assessment);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `llm-ollama`: generative adaptation through a local Ollama server
//! - `embeddings-local`: sentence embeddings with fastembed for evaluation

pub mod adaptation;
pub mod analysis;
pub mod concepts;
pub mod config;
pub mod culture;
pub mod embeddings;
pub mod enrichment;
pub mod error;
pub mod evaluation;
pub mod llm;
pub mod story;
pub mod text;

/// Current library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Re-export commonly used types
pub mod prelude {
    pub use crate::adaptation::{AdaptationHints, AdaptedStory, AdaptiveStoryteller};
    pub use crate::analysis::{ComplexityAnalyzer, ComplexityMetrics, Theme, detect_themes};
    pub use crate::concepts::{
        BasicConceptExtractor, Concept, ConceptExtractionConfig, ConceptExtractor, ConceptType,
        Relations,
    };
    pub use crate::config::{
        EmbeddingProvider, EmbeddingsConfig, LLMProvider as LLMProviderType, LLMProviderConfig,
        NainnyConfig,
    };
    pub use crate::culture::{
        CulturalAnalyzer, CulturalFitReport, CulturalKnowledgeSource, CulturalMarker,
        EmbeddedKnowledgeBase, FileKnowledgeBase,
    };
    pub use crate::embeddings::{
        EmbeddingProvider as EmbeddingProviderTrait, EmbeddingProviderFactory, cosine_similarity,
    };
    pub use crate::enrichment::{ConceptEnricher, Enrichment, InMemoryRelationStore};
    pub use crate::error::{ErrorKind, NainnyError, Result};
    pub use crate::evaluation::{StoryEvaluator, StoryScores};
    pub use crate::llm::{LLMConfig, LLMProvider, LLMProviderFactory};
    pub use crate::story::{
        InMemoryStoryRepository, Story, StoryAnalysis, StoryParser, StoryRepository,
    };
    pub use crate::text::{LanguageModel, ParsedDocument, RuleBasedParser, TextParser};
}
