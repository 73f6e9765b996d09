use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::text::EntityLabel;

/// Semantic relations attached to a concept: relation kind → related terms.
pub type Relations = BTreeMap<String, Vec<String>>;

/// Semantic type of an extracted concept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConceptType {
    Character,
    Organization,
    Location,
    Event,
    Object,
    Concept,
    Other,
}

impl ConceptType {
    /// Map a named-entity label to a concept type.
    pub fn from_entity_label(label: &EntityLabel) -> Self {
        match label {
            EntityLabel::Person => ConceptType::Character,
            EntityLabel::Org | EntityLabel::Norp => ConceptType::Organization,
            EntityLabel::Gpe | EntityLabel::Loc | EntityLabel::Fac => ConceptType::Location,
            EntityLabel::Event => ConceptType::Event,
            EntityLabel::Product | EntityLabel::WorkOfArt => ConceptType::Object,
            EntityLabel::Other(_) => ConceptType::Other,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ConceptType::Character => "character",
            ConceptType::Organization => "organization",
            ConceptType::Location => "location",
            ConceptType::Event => "event",
            ConceptType::Object => "object",
            ConceptType::Concept => "concept",
            ConceptType::Other => "other",
        }
    }
}

impl std::fmt::Display for ConceptType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Represents an extracted concept/entity from a story.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Concept {
    /// The exact text of the concept as extracted
    pub text: String,

    /// Semantic type
    pub concept_type: ConceptType,

    /// Source label (entity label or `NOUN_CHUNK`)
    pub label: String,

    /// Importance score (0.0-1.0)
    pub importance: f64,

    /// Relations from the enrichment gateway, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relations: Option<Relations>,
}

impl Concept {
    /// Create a new concept; importance is clamped to [0, 1].
    pub fn new(
        text: impl Into<String>,
        concept_type: ConceptType,
        label: impl Into<String>,
        importance: f64,
    ) -> Self {
        Self {
            text: text.into(),
            concept_type,
            label: label.into(),
            importance: importance.clamp(0.0, 1.0),
            relations: None,
        }
    }

    /// Attach enrichment relations.
    pub fn with_relations(mut self, relations: Relations) -> Self {
        self.relations = Some(relations);
        self
    }

    pub fn is_enriched(&self) -> bool {
        self.relations.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concept_creation() {
        let concept = Concept::new("Ramesh", ConceptType::Character, "PERSON", 0.8);
        assert_eq!(concept.text, "Ramesh");
        assert_eq!(concept.concept_type, ConceptType::Character);
        assert_eq!(concept.importance, 0.8);
        assert!(!concept.is_enriched());
    }

    #[test]
    fn test_importance_clamped() {
        let concept = Concept::new("lamp", ConceptType::Concept, "NOUN_CHUNK", 1.7);
        assert_eq!(concept.importance, 1.0);
    }

    #[test]
    fn test_entity_label_mapping() {
        assert_eq!(
            ConceptType::from_entity_label(&EntityLabel::Person),
            ConceptType::Character
        );
        assert_eq!(ConceptType::from_entity_label(&EntityLabel::Fac), ConceptType::Location);
        assert_eq!(
            ConceptType::from_entity_label(&EntityLabel::WorkOfArt),
            ConceptType::Object
        );
        assert_eq!(
            ConceptType::from_entity_label(&EntityLabel::Other("DATE".into())),
            ConceptType::Other
        );
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&ConceptType::Organization).unwrap();
        assert_eq!(json, "\"organization\"");
    }
}
