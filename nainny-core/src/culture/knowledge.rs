//! Read-only sources of cultural knowledge.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::{NainnyError, Result};

use super::models::{
    CulturalContext, CulturalMapping, Festival, KnowledgeSnapshot, Sensitivity, UsageExample,
    category, mapping_type,
};

/// Loader for festivals, contexts and mappings.
///
/// Analyzers call [`snapshot`](CulturalKnowledgeSource::snapshot) once and
/// never see later updates.
#[async_trait]
pub trait CulturalKnowledgeSource: Send + Sync {
    async fn festivals(&self, culture: &str) -> Result<Vec<Festival>>;

    async fn contexts(&self, culture: &str) -> Result<Vec<CulturalContext>>;

    /// Mappings whose target culture is `culture`.
    async fn mappings(&self, culture: &str) -> Result<Vec<CulturalMapping>>;

    fn name(&self) -> &str;

    async fn snapshot(&self, culture: &str) -> Result<KnowledgeSnapshot> {
        Ok(KnowledgeSnapshot {
            festivals: self.festivals(culture).await?,
            contexts: self.contexts(culture).await?,
            mappings: self.mappings(culture).await?,
        })
    }
}

/// Knowledge base held in memory.
#[derive(Debug, Clone, Default)]
pub struct EmbeddedKnowledgeBase {
    data: KnowledgeSnapshot,
}

impl EmbeddedKnowledgeBase {
    pub fn new(data: KnowledgeSnapshot) -> Self {
        Self { data }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in Indian festivals, contexts and mappings.
    pub fn seeded() -> Self {
        Self::new(seed_data())
    }

    pub fn data(&self) -> &KnowledgeSnapshot {
        &self.data
    }
}

#[async_trait]
impl CulturalKnowledgeSource for EmbeddedKnowledgeBase {
    async fn festivals(&self, culture: &str) -> Result<Vec<Festival>> {
        Ok(self.data.for_culture(culture).festivals)
    }

    async fn contexts(&self, culture: &str) -> Result<Vec<CulturalContext>> {
        Ok(self.data.for_culture(culture).contexts)
    }

    async fn mappings(&self, culture: &str) -> Result<Vec<CulturalMapping>> {
        Ok(self.data.for_culture(culture).mappings)
    }

    fn name(&self) -> &str {
        "embedded"
    }

    async fn snapshot(&self, culture: &str) -> Result<KnowledgeSnapshot> {
        Ok(self.data.for_culture(culture))
    }
}

/// Knowledge base read from a JSON or YAML file on every snapshot.
#[derive(Debug, Clone)]
pub struct FileKnowledgeBase {
    path: PathBuf,
}

impl FileKnowledgeBase {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<KnowledgeSnapshot> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            NainnyError::KnowledgeBase(format!("failed to read {}: {}", self.path.display(), e))
        })?;

        let extension = self
            .path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        let data: KnowledgeSnapshot = match extension.as_deref() {
            Some("json") => serde_json::from_str(&content)?,
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
            _ => {
                return Err(NainnyError::KnowledgeBase(format!(
                    "unsupported knowledge base format: {}",
                    self.path.display()
                )));
            }
        };
        Ok(data.sanitized())
    }
}

#[async_trait]
impl CulturalKnowledgeSource for FileKnowledgeBase {
    async fn festivals(&self, culture: &str) -> Result<Vec<Festival>> {
        Ok(self.read().await?.for_culture(culture).festivals)
    }

    async fn contexts(&self, culture: &str) -> Result<Vec<CulturalContext>> {
        Ok(self.read().await?.for_culture(culture).contexts)
    }

    async fn mappings(&self, culture: &str) -> Result<Vec<CulturalMapping>> {
        Ok(self.read().await?.for_culture(culture).mappings)
    }

    fn name(&self) -> &str {
        "file"
    }

    async fn snapshot(&self, culture: &str) -> Result<KnowledgeSnapshot> {
        Ok(self.read().await?.for_culture(culture))
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn festival(
    name: &str,
    regional_names: &[&str],
    month: &str,
    season: &str,
    significance: &str,
) -> Festival {
    Festival {
        name: name.to_string(),
        culture: "indian".to_string(),
        regional_names: strings(regional_names),
        month: Some(month.to_string()),
        season: Some(season.to_string()),
        significance: Some(significance.to_string()),
        story_elements: Vec::new(),
        activities: Vec::new(),
        foods: Vec::new(),
        decorations: Vec::new(),
        child_explanation: None,
        story_hooks: Vec::new(),
        age_appropriate: "all".to_string(),
        popularity: 0.5,
    }
}

fn context(
    category: &str,
    name: &str,
    description: &str,
    related: &[&str],
    examples: &[&str],
    notes: &str,
) -> CulturalContext {
    CulturalContext {
        culture: "indian".to_string(),
        category: category.to_string(),
        name: name.to_string(),
        description: Some(description.to_string()),
        related_terms: strings(related),
        sensitivity: Sensitivity::Neutral,
        age_appropriate: "all".to_string(),
        examples: strings(examples),
        storytelling_notes: Some(notes.to_string()),
    }
}

fn mapping(
    source: &str,
    source_context: &str,
    target: &str,
    kind: &str,
    confidence: f64,
    explanation: &str,
    examples: &[(&str, &str)],
) -> CulturalMapping {
    CulturalMapping {
        source_concept: source.to_string(),
        source_context: source_context.to_string(),
        target_concept: target.to_string(),
        target_culture: "indian".to_string(),
        mapping_type: kind.to_string(),
        confidence,
        explanation: Some(explanation.to_string()),
        usage_examples: examples
            .iter()
            .map(|(before, after)| UsageExample {
                before: before.to_string(),
                after: after.to_string(),
            })
            .collect(),
        verified: true,
    }
}

fn seed_data() -> KnowledgeSnapshot {
    let diwali = Festival {
        story_elements: strings(&["Rama returning to Ayodhya", "Lakshmi worship", "lights", "victory"]),
        activities: strings(&["lighting diyas", "bursting crackers", "rangoli", "sweets distribution"]),
        foods: strings(&["ladoo", "jalebi", "barfi", "namak pare"]),
        decorations: strings(&["diyas", "rangoli", "lights", "flowers"]),
        child_explanation: Some(
            "Diwali is when we light up our homes with lamps and celebrate goodness winning!"
                .to_string(),
        ),
        story_hooks: strings(&["hero returns home", "defeating evil", "family celebration"]),
        popularity: 1.0,
        ..festival(
            "Diwali",
            &["Deepavali", "Divali"],
            "October-November",
            "autumn",
            "Festival of lights celebrating victory of light over darkness, good over evil",
        )
    };

    let holi = Festival {
        story_elements: strings(&["Prahlad and Holika", "Krishna and Radha", "colors", "playfulness"]),
        activities: strings(&["playing with colors", "water balloons", "dancing", "singing"]),
        foods: strings(&["gujiya", "thandai", "malpua"]),
        decorations: strings(&["colors", "flowers"]),
        child_explanation: Some(
            "Holi is when we play with colors and celebrate friendship and fun!".to_string(),
        ),
        story_hooks: strings(&["playing together", "friendship", "mischief", "celebration"]),
        popularity: 0.9,
        ..festival(
            "Holi",
            &["Phagwah", "Dol Jatra"],
            "March",
            "spring",
            "Festival of colors celebrating spring, love, and new beginnings",
        )
    };

    let contexts = vec![
        context(
            category::VALUE,
            "Respect for Elders",
            "Deep cultural value of respecting and seeking blessings from elders",
            &[
                "family", "respect", "tradition", "wisdom", "blessing", "grandmother",
                "grandfather",
            ],
            &["touching feet for blessings", "addressing elders with respect"],
            "Show characters respecting elders, seeking advice from grandparents",
        ),
        context(
            category::VALUE,
            "Joint Family",
            "Extended family living together, emphasizing family bonds",
            &["family", "togetherness", "grandparents", "cousins", "unity"],
            &["multiple generations in one house", "cousins playing together"],
            "Include grandparents, uncles, aunts as active characters",
        ),
        context(
            category::FOOD,
            "Ladoo",
            "Sweet round ball, commonly given as prasad or celebration sweet",
            &["sweet", "celebration", "festival", "offering"],
            &["given after prayer", "distributed at celebrations"],
            "Can be used as reward, celebration element, or special treat",
        ),
        context(
            category::CUSTOM,
            "Namaste",
            "Traditional greeting with folded hands",
            &["greeting", "respect", "tradition"],
            &["greeting elders", "respectful greeting"],
            "Use as respectful greeting, especially for elders or teachers",
        ),
        context(
            category::CUSTOM,
            "Rangoli",
            "Colorful floor art made with colored powder or flowers",
            &["art", "decoration", "festival", "creativity", "welcome"],
            &["at entrance", "during festivals"],
            "Can be used as art activity, festival preparation",
        ),
        context(
            category::SYMBOL,
            "Diya",
            "Small oil lamp, symbol of light and knowledge",
            &["light", "knowledge", "hope", "spirituality"],
            &["lit during prayers", "Diwali decoration"],
            "Symbol of hope, knowledge defeating ignorance",
        ),
    ];

    let mappings = vec![
        mapping(
            "Christmas",
            "western",
            "Diwali",
            mapping_type::EQUIVALENT,
            0.8,
            "Both are major festivals with lights, family gatherings, gifts, and sweets",
            &[
                ("decorating Christmas tree", "making rangoli and decorating with diyas"),
                ("Santa bringing gifts", "elders giving gifts and blessings"),
            ],
        ),
        mapping(
            "birthday cake",
            "generic",
            "ladoo or barfi",
            mapping_type::SIMILAR,
            0.7,
            "Traditional Indian sweets often replace cakes in celebrations",
            &[("cutting birthday cake", "distributing ladoos to friends")],
        ),
        mapping(
            "handshake",
            "western",
            "namaste",
            mapping_type::EQUIVALENT,
            0.9,
            "Both are respectful greetings, namaste is traditional Indian way",
            &[("shaking hands", "folding hands and saying namaste")],
        ),
    ];

    KnowledgeSnapshot {
        festivals: vec![diwali, holi],
        contexts,
        mappings,
    }
}
