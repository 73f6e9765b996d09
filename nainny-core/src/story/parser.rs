//! Story analysis pipeline: parse, extract, score and persist.

use std::sync::Arc;

use regex::Regex;

use crate::analysis::{ComplexityAnalyzer, detect_themes};
use crate::concepts::{BasicConceptExtractor, ConceptExtractor};
use crate::config::NainnyConfig;
use crate::enrichment::ConceptEnricher;
use crate::error::{NainnyError, Result};
use crate::text::{EntityLabel, LanguageModel, ParsedDocument};

use super::models::{Story, StoryAnalysis, StoryConcept, StoryEntities, StoryId};
use super::repository::StoryRepository;

/// Concepts persisted per story.
pub const MAX_SAVED_CONCEPTS: usize = 15;

/// Longest stored concept context, in characters.
const MAX_CONTEXT_CHARS: usize = 250;

/// Analyses stories and stores the results.
pub struct StoryParser {
    model: LanguageModel,
    repository: Arc<dyn StoryRepository>,
    extractor: BasicConceptExtractor,
    complexity: ComplexityAnalyzer,
    enricher: Option<Arc<ConceptEnricher>>,
    min_story_length: usize,
    max_story_length: usize,
    default_complexity: u8,
    marker_patterns: Vec<(String, Regex)>,
}

impl StoryParser {
    /// # Errors
    ///
    /// Returns `ModelUnavailable` if `model` has no parser loaded, or
    /// `Configuration` if a marker term cannot be compiled.
    pub fn new(
        model: LanguageModel,
        repository: Arc<dyn StoryRepository>,
        config: &NainnyConfig,
    ) -> Result<Self> {
        if !model.is_loaded() {
            return Err(NainnyError::ModelUnavailable(
                "language model not loaded".to_string(),
            ));
        }

        let marker_patterns = config
            .culture
            .marker_terms
            .iter()
            .map(|term| {
                let term = term.to_lowercase();
                Regex::new(&format!(r"\b{}\b", regex::escape(&term)))
                    .map(|re| (term.clone(), re))
                    .map_err(|e| {
                        NainnyError::Configuration(format!("Invalid marker term '{}': {}", term, e))
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            model,
            repository,
            extractor: BasicConceptExtractor::default(),
            complexity: ComplexityAnalyzer::default(),
            enricher: None,
            min_story_length: config.story.min_story_length,
            max_story_length: config.story.max_story_length,
            default_complexity: config.story.default_complexity,
            marker_patterns,
        })
    }

    /// Store a new story at the configured starting complexity.
    pub async fn create_story(&self, title: &str, content: &str) -> Result<Story> {
        let story = Story::new(title, content).with_complexity(self.default_complexity);
        self.repository.create_story(story).await
    }

    pub fn with_enricher(mut self, enricher: Arc<ConceptEnricher>) -> Self {
        self.enricher = Some(enricher);
        self
    }

    pub fn with_extractor(mut self, extractor: BasicConceptExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Run the full analysis on one story.
    ///
    /// With `enrich` set and an enricher configured, concepts above the
    /// importance threshold get external relations attached. Enrichment
    /// failures never fail the parse.
    ///
    /// # Errors
    ///
    /// `StoryTooShort` if the trimmed text is below the configured minimum;
    /// any later failure is wrapped as `ParsingFailure` carrying `title`.
    pub async fn parse_story(&self, text: &str, title: &str, enrich: bool) -> Result<StoryAnalysis> {
        let length = text.trim().chars().count();
        if length < self.min_story_length {
            return Err(NainnyError::StoryTooShort {
                min: self.min_story_length,
                actual: length,
            });
        }

        let doc = self
            .model
            .parse(text)
            .map_err(|e| NainnyError::parsing(title, e.to_string()))?;

        let mut concepts = self.extractor.extract(&doc);
        let themes = detect_themes(text);
        let complexity = self.complexity.analyze(&doc);
        let entities = group_entities(&doc);

        if enrich && let Some(enricher) = &self.enricher {
            concepts = enricher.enrich(concepts).await;
        }

        let word_count = doc.non_punct_len();
        if word_count > self.max_story_length {
            tracing::warn!(title, word_count, max = self.max_story_length, "Story exceeds recommended length");
        }

        let analysis = StoryAnalysis {
            title: title.to_string(),
            word_count,
            sentence_count: doc.sentences.len(),
            age_recommendation: complexity.age_recommendation().to_string(),
            cultural_elements: self.cultural_elements(text),
            concepts,
            themes,
            complexity,
            entities,
        };

        tracing::debug!(
            title,
            concepts = analysis.concepts.len(),
            themes = analysis.themes.len(),
            complexity = analysis.complexity.score,
            "Parsed story"
        );
        Ok(analysis)
    }

    /// Configured cultural terms appearing as whole words, in configured order.
    pub fn cultural_elements(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        self.marker_patterns
            .iter()
            .filter(|(_, re)| re.is_match(&lower))
            .map(|(term, _)| term.clone())
            .collect()
    }

    /// Store an analysis against an existing story.
    ///
    /// Replaces the story's concepts with the top ranked ones and updates its
    /// themes, complexity, age range and counts.
    ///
    /// # Errors
    ///
    /// `RecordNotFound` if the story does not exist; other failures are
    /// wrapped as `ParsingFailure` carrying `story_id`.
    pub async fn save_story_analysis(
        &self,
        story_id: StoryId,
        analysis: &StoryAnalysis,
    ) -> Result<Story> {
        let wrap = |e: NainnyError| match e {
            NainnyError::RecordNotFound(_) => e,
            other => NainnyError::saving(story_id, other.to_string()),
        };

        let mut story = self
            .repository
            .get_story(story_id)
            .await
            .map_err(wrap)?
            .ok_or_else(|| NainnyError::RecordNotFound(format!("story {}", story_id)))?;

        let concepts = analysis
            .concepts
            .iter()
            .take(MAX_SAVED_CONCEPTS)
            .map(|concept| StoryConcept {
                context: concept_context(&story.content, &concept.text),
                ..StoryConcept::from_concept(story_id, concept)
            })
            .collect();
        self.repository
            .replace_concepts(story_id, concepts)
            .await
            .map_err(wrap)?;

        story.themes = analysis.themes.clone();
        story.complexity_level = analysis.complexity.score;
        story.age_range = Some(analysis.age_recommendation.clone());
        story.word_count = Some(analysis.word_count);
        story.sentence_count = Some(analysis.sentence_count);

        let story = self.repository.update_story(story).await.map_err(wrap)?;
        tracing::info!(story_id, title = %story.title, "Saved story analysis");
        Ok(story)
    }

    /// Parse a stored story and save the result.
    pub async fn analyze_stored(&self, story_id: StoryId, enrich: bool) -> Result<StoryAnalysis> {
        let story = self
            .repository
            .get_story(story_id)
            .await?
            .ok_or_else(|| NainnyError::RecordNotFound(format!("story {}", story_id)))?;

        let analysis = self.parse_story(&story.content, &story.title, enrich).await?;
        self.save_story_analysis(story_id, &analysis).await?;
        Ok(analysis)
    }
}

fn group_entities(doc: &ParsedDocument) -> StoryEntities {
    let mut entities = StoryEntities::default();
    for span in &doc.entities {
        let bucket = match span.label {
            EntityLabel::Person => &mut entities.characters,
            EntityLabel::Gpe | EntityLabel::Loc | EntityLabel::Fac => &mut entities.locations,
            EntityLabel::Product | EntityLabel::WorkOfArt => &mut entities.objects,
            EntityLabel::Event => &mut entities.events,
            _ => continue,
        };
        bucket.push(span.text.clone());
    }

    for bucket in [
        &mut entities.characters,
        &mut entities.locations,
        &mut entities.objects,
        &mut entities.events,
    ] {
        bucket.sort();
        bucket.dedup();
    }
    entities
}

/// First sentence of `content` mentioning `concept`, case-insensitively.
fn concept_context(content: &str, concept: &str) -> Option<String> {
    let needle = concept.to_lowercase();
    content
        .split_inclusive(['.', '!', '?'])
        .map(str::trim)
        .find(|sentence| sentence.to_lowercase().contains(&needle))
        .map(|sentence| sentence.chars().take(MAX_CONTEXT_CHARS).collect())
}
