//! Cultural knowledge base records.

use serde::{Deserialize, Serialize};

/// Fixed age ranges, youngest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AgeRange {
    ThreeToFive,
    SixToEight,
    NineToTwelve,
    ThirteenPlus,
}

impl AgeRange {
    pub const ALL: [AgeRange; 4] = [
        AgeRange::ThreeToFive,
        AgeRange::SixToEight,
        AgeRange::NineToTwelve,
        AgeRange::ThirteenPlus,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AgeRange::ThreeToFive => "3-5",
            AgeRange::SixToEight => "6-8",
            AgeRange::NineToTwelve => "9-12",
            AgeRange::ThirteenPlus => "13+",
        }
    }

    /// Parse one of the fixed labels. "all" and anything else yield `None`.
    pub fn parse(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == label.trim())
    }
}

impl std::fmt::Display for AgeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether content rated for `marker_age` suits a `target_age` audience.
///
/// Only too-young audiences are rejected. Labels outside the fixed ranges
/// (including "all") are always appropriate.
pub fn is_age_appropriate(marker_age: &str, target_age: &str) -> bool {
    match (AgeRange::parse(marker_age), AgeRange::parse(target_age)) {
        (Some(marker), Some(target)) => target >= marker,
        _ => true,
    }
}

/// How carefully a cultural element must be handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sensitivity {
    #[default]
    Neutral,
    Caution,
    Avoid,
}

fn default_culture() -> String {
    "indian".to_string()
}

fn default_age() -> String {
    "all".to_string()
}

fn default_popularity() -> f64 {
    0.5
}

fn default_source_context() -> String {
    "generic".to_string()
}

fn default_mapping_type() -> String {
    mapping_type::SIMILAR.to_string()
}

/// Known context categories.
pub mod category {
    pub const FESTIVAL: &str = "festival";
    pub const VALUE: &str = "value";
    pub const FOOD: &str = "food";
    pub const CUSTOM: &str = "custom";
    pub const SYMBOL: &str = "symbol";
}

/// Known mapping types.
pub mod mapping_type {
    pub const EQUIVALENT: &str = "equivalent";
    pub const SIMILAR: &str = "similar";
    pub const CONCEPTNET_SUGGESTED: &str = "conceptnet_suggested";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Festival {
    pub name: String,
    #[serde(default = "default_culture")]
    pub culture: String,
    #[serde(default)]
    pub regional_names: Vec<String>,
    #[serde(default)]
    pub month: Option<String>,
    #[serde(default)]
    pub season: Option<String>,
    #[serde(default)]
    pub significance: Option<String>,
    #[serde(default)]
    pub story_elements: Vec<String>,
    #[serde(default, alias = "common_activities")]
    pub activities: Vec<String>,
    #[serde(default, alias = "traditional_foods")]
    pub foods: Vec<String>,
    #[serde(default)]
    pub decorations: Vec<String>,
    #[serde(default, alias = "child_friendly_explanation")]
    pub child_explanation: Option<String>,
    #[serde(default)]
    pub story_hooks: Vec<String>,
    #[serde(default = "default_age")]
    pub age_appropriate: String,
    #[serde(default = "default_popularity", alias = "popularity_score")]
    pub popularity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CulturalContext {
    #[serde(default = "default_culture")]
    pub culture: String,
    pub category: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "related_concepts")]
    pub related_terms: Vec<String>,
    #[serde(default, alias = "sensitivity_level")]
    pub sensitivity: Sensitivity,
    #[serde(default = "default_age")]
    pub age_appropriate: String,
    #[serde(default)]
    pub examples: Vec<String>,
    #[serde(default)]
    pub storytelling_notes: Option<String>,
}

/// A before/after rewrite illustrating a mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageExample {
    pub before: String,
    pub after: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CulturalMapping {
    pub source_concept: String,
    #[serde(default = "default_source_context")]
    pub source_context: String,
    pub target_concept: String,
    #[serde(default = "default_culture")]
    pub target_culture: String,
    #[serde(default = "default_mapping_type")]
    pub mapping_type: String,
    #[serde(default = "default_popularity", alias = "confidence_score")]
    pub confidence: f64,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub usage_examples: Vec<UsageExample>,
    #[serde(default)]
    pub verified: bool,
}

/// Everything an analyzer needs for one culture, loaded once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeSnapshot {
    #[serde(default)]
    pub festivals: Vec<Festival>,
    #[serde(default)]
    pub contexts: Vec<CulturalContext>,
    #[serde(default)]
    pub mappings: Vec<CulturalMapping>,
}

impl KnowledgeSnapshot {
    /// Drop blank match terms and clamp scores into [0, 1].
    pub fn sanitized(mut self) -> Self {
        let keep = |terms: &mut Vec<String>| terms.retain(|t| !t.trim().is_empty());
        for festival in &mut self.festivals {
            keep(&mut festival.regional_names);
            festival.popularity = festival.popularity.clamp(0.0, 1.0);
        }
        for context in &mut self.contexts {
            keep(&mut context.related_terms);
        }
        for mapping in &mut self.mappings {
            mapping.confidence = mapping.confidence.clamp(0.0, 1.0);
        }
        self
    }

    /// Records belonging to `culture` (festivals and contexts by culture,
    /// mappings by target culture).
    pub fn for_culture(&self, culture: &str) -> Self {
        Self {
            festivals: self
                .festivals
                .iter()
                .filter(|f| f.culture.eq_ignore_ascii_case(culture))
                .cloned()
                .collect(),
            contexts: self
                .contexts
                .iter()
                .filter(|c| c.culture.eq_ignore_ascii_case(culture))
                .cloned()
                .collect(),
            mappings: self
                .mappings
                .iter()
                .filter(|m| m.target_culture.eq_ignore_ascii_case(culture))
                .cloned()
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.festivals.is_empty() && self.contexts.is_empty() && self.mappings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_age_ordering() {
        assert!(is_age_appropriate("3-5", "6-8"));
        assert!(is_age_appropriate("6-8", "6-8"));
        assert!(!is_age_appropriate("9-12", "6-8"));
        assert!(!is_age_appropriate("13+", "3-5"));
    }

    #[test]
    fn test_unknown_ages_are_appropriate() {
        assert!(is_age_appropriate("all", "3-5"));
        assert!(is_age_appropriate("13+", "toddlers"));
        assert!(is_age_appropriate("10-14", "3-5"));
    }

    #[test]
    fn test_context_defaults_and_aliases() {
        let json = r#"{
            "category": "food",
            "name": "Ladoo",
            "related_concepts": ["sweet"],
            "sensitivity_level": "caution"
        }"#;
        let ctx: CulturalContext = serde_json::from_str(json).unwrap();
        assert_eq!(ctx.culture, "indian");
        assert_eq!(ctx.related_terms, vec!["sweet".to_string()]);
        assert_eq!(ctx.sensitivity, Sensitivity::Caution);
        assert_eq!(ctx.age_appropriate, "all");
    }

    #[test]
    fn test_snapshot_filter() {
        let snapshot = KnowledgeSnapshot {
            festivals: vec![],
            contexts: vec![
                CulturalContext {
                    culture: "Indian".into(),
                    category: category::CUSTOM.into(),
                    name: "Namaste".into(),
                    description: None,
                    related_terms: vec![],
                    sensitivity: Sensitivity::Neutral,
                    age_appropriate: "all".into(),
                    examples: vec![],
                    storytelling_notes: None,
                },
                CulturalContext {
                    culture: "japanese".into(),
                    category: category::CUSTOM.into(),
                    name: "Bowing".into(),
                    description: None,
                    related_terms: vec![],
                    sensitivity: Sensitivity::Neutral,
                    age_appropriate: "all".into(),
                    examples: vec![],
                    storytelling_notes: None,
                },
            ],
            mappings: vec![],
        };
        let indian = snapshot.for_culture("indian");
        assert_eq!(indian.contexts.len(), 1);
        assert_eq!(indian.contexts[0].name, "Namaste");
    }
}
