//! Persisted story records and the transient analysis result.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::adaptation::{AdaptationChange, AdaptedStory};
use crate::analysis::{ComplexityMetrics, Theme};
use crate::concepts::{Concept, ConceptType, Relations};

pub type StoryId = u64;

/// A stored story and its analysis metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    /// Assigned by the repository on create
    pub id: StoryId,
    pub title: String,
    pub content: String,
    pub culture: String,
    /// Recommended age range, e.g. "6-8"
    pub age_range: Option<String>,
    /// 1-10
    pub complexity_level: u8,
    #[serde(default)]
    pub themes: Vec<Theme>,
    pub word_count: Option<usize>,
    pub sentence_count: Option<usize>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Story {
    /// A new unsaved story with the default culture and complexity.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            title: title.into(),
            content: content.into(),
            culture: "Indian".to_string(),
            age_range: None,
            complexity_level: 5,
            themes: Vec::new(),
            word_count: None,
            sentence_count: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_culture(mut self, culture: impl Into<String>) -> Self {
        self.culture = culture.into();
        self
    }

    pub fn with_complexity(mut self, level: u8) -> Self {
        self.complexity_level = level.clamp(1, 10);
        self
    }
}

/// A concept persisted for a story.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryConcept {
    pub story_id: StoryId,
    pub concept: String,
    pub concept_type: ConceptType,
    pub importance_score: f64,
    /// Sentence where the concept appears
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relations: Option<Relations>,
}

impl StoryConcept {
    pub fn from_concept(story_id: StoryId, concept: &Concept) -> Self {
        Self {
            story_id,
            concept: concept.text.clone(),
            concept_type: concept.concept_type,
            importance_score: concept.importance,
            context: None,
            relations: concept.relations.clone(),
        }
    }
}

/// What an adaptation set out to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdaptationType {
    Simplify,
    Elaborate,
    CulturalAdapt,
}

/// A stored adapted version of a story.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryAdaptation {
    pub id: u64,
    pub original_story_id: StoryId,
    pub adapted_content: String,
    pub target_age_range: Option<String>,
    pub target_complexity: Option<u8>,
    pub adaptation_type: AdaptationType,
    #[serde(default)]
    pub changes_made: Vec<AdaptationChange>,
    pub created_at: DateTime<Utc>,
}

impl StoryAdaptation {
    /// Record an adaptation of `story_id`. The id is assigned on save.
    pub fn from_adapted(
        story_id: StoryId,
        adapted: &AdaptedStory,
        adaptation_type: AdaptationType,
    ) -> Self {
        Self {
            id: 0,
            original_story_id: story_id,
            adapted_content: adapted.text.clone(),
            target_age_range: Some(adapted.target_age.clone()),
            target_complexity: None,
            adaptation_type,
            changes_made: adapted.changes.clone(),
            created_at: Utc::now(),
        }
    }
}

/// Named entities grouped by role. Each list is deduplicated and sorted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoryEntities {
    pub characters: Vec<String>,
    pub locations: Vec<String>,
    pub objects: Vec<String>,
    pub events: Vec<String>,
}

/// Result of parsing one story.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryAnalysis {
    pub title: String,
    pub word_count: usize,
    pub sentence_count: usize,
    pub concepts: Vec<Concept>,
    pub themes: Vec<Theme>,
    pub complexity: ComplexityMetrics,
    pub entities: StoryEntities,
    pub age_recommendation: String,
    /// Configured cultural terms found in the text
    pub cultural_elements: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adaptation::AdaptationStrategy;

    #[test]
    fn test_story_defaults() {
        let story = Story::new("The Lamp", "Once upon a time.").with_complexity(42);
        assert_eq!(story.culture, "Indian");
        assert_eq!(story.complexity_level, 10);
        assert!(story.themes.is_empty());
    }

    #[test]
    fn test_concept_record_keeps_relations() {
        let mut relations = Relations::new();
        relations.insert("IsA".into(), vec!["light".into()]);
        let concept =
            Concept::new("lamp", ConceptType::Concept, "NOUN_CHUNK", 0.4).with_relations(relations);

        let record = StoryConcept::from_concept(3, &concept);
        assert_eq!(record.story_id, 3);
        assert_eq!(record.concept, "lamp");
        assert!(record.relations.is_some());
    }

    #[test]
    fn test_adaptation_record() {
        let adapted = AdaptedStory {
            text: "(Adapted for Indian / 3-5)\nHi.".into(),
            target_culture: "Indian".into(),
            target_age: "3-5".into(),
            strategy: AdaptationStrategy::RuleBased,
            changes: Vec::new(),
        };
        let record = StoryAdaptation::from_adapted(9, &adapted, AdaptationType::Simplify);
        assert_eq!(record.original_story_id, 9);
        assert_eq!(record.target_age_range.as_deref(), Some("3-5"));

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["adaptation_type"], "simplify");
    }
}
