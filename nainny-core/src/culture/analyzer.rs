use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::concepts::Concept;
use crate::enrichment::ConceptEnricher;
use crate::error::Result;

use super::knowledge::CulturalKnowledgeSource;
use super::markers::{
    CulturalFitReport, CulturalIssue, CulturalMarker, IssueKind, MarkerDetail, MarkerKind,
    Priority, Severity, Suggestion, SuggestionKind, confidence,
};
use super::models::{
    CulturalContext, CulturalMapping, Festival, KnowledgeSnapshot, Sensitivity, UsageExample,
    category, is_age_appropriate, mapping_type,
};

/// Summed marker confidence that maps to a full fit score.
pub const FIT_SCORE_DIVISOR: f64 = 5.0;

/// Fit score reported when no markers are found.
pub const NEUTRAL_FIT_SCORE: f64 = 0.5;

/// Confidence given to mappings suggested by the enrichment gateway.
pub const SUGGESTED_MAPPING_CONFIDENCE: f64 = 0.5;

const MAX_SIMILAR_CONCEPTS: usize = 5;
const ENHANCEMENT_FESTIVALS: usize = 2;

/// A resolved concept mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptMapping {
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub mapping_type: String,
    pub confidence: f64,
    pub explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<UsageExample>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternatives: Vec<String>,
    pub verified: bool,
}

impl From<&CulturalMapping> for ConceptMapping {
    fn from(mapping: &CulturalMapping) -> Self {
        Self {
            source: mapping.source_concept.clone(),
            target: mapping.target_concept.clone(),
            mapping_type: mapping.mapping_type.clone(),
            confidence: mapping.confidence,
            explanation: mapping.explanation.clone(),
            examples: mapping.usage_examples.clone(),
            alternatives: Vec::new(),
            verified: mapping.verified,
        }
    }
}

/// Replacement proposal for one source concept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alternative {
    pub primary: String,
    pub alternatives: Vec<String>,
    pub explanation: String,
}

/// Detects cultural markers in stories and scores cultural fit for one
/// target culture.
///
/// The knowledge base is loaded once in [`load`](Self::load); create a new
/// analyzer to observe updates.
pub struct CulturalAnalyzer {
    culture: String,
    festivals: Vec<Festival>,
    contexts: Vec<CulturalContext>,
    mappings: Vec<CulturalMapping>,
    context_by_name: HashMap<String, usize>,
    enricher: Option<Arc<ConceptEnricher>>,
}

impl CulturalAnalyzer {
    pub async fn load(
        source: &dyn CulturalKnowledgeSource,
        culture: &str,
        enricher: Option<Arc<ConceptEnricher>>,
    ) -> Result<Self> {
        let snapshot = source.snapshot(culture).await?;
        let analyzer = Self::from_snapshot(snapshot, culture, enricher);

        tracing::info!(
            culture = %analyzer.culture,
            source = source.name(),
            festivals = analyzer.festivals.len(),
            contexts = analyzer.contexts.len(),
            mappings = analyzer.mappings.len(),
            "Loaded cultural knowledge base"
        );
        Ok(analyzer)
    }

    pub fn from_snapshot(
        snapshot: KnowledgeSnapshot,
        culture: &str,
        enricher: Option<Arc<ConceptEnricher>>,
    ) -> Self {
        let KnowledgeSnapshot {
            festivals,
            contexts,
            mappings,
        } = snapshot.for_culture(culture);

        let mut context_by_name = HashMap::new();
        for (i, ctx) in contexts.iter().enumerate() {
            context_by_name.entry(ctx.name.to_lowercase()).or_insert(i);
        }

        Self {
            culture: culture.to_lowercase(),
            festivals,
            contexts,
            mappings,
            context_by_name,
            enricher,
        }
    }

    pub fn culture(&self) -> &str {
        &self.culture
    }

    /// Culture name for human-readable text ("indian" → "Indian").
    pub fn culture_display(&self) -> String {
        title_case(&self.culture)
    }

    pub fn festivals(&self) -> &[Festival] {
        &self.festivals
    }

    pub fn contexts(&self) -> &[CulturalContext] {
        &self.contexts
    }

    /// Find festivals, cultural elements and concept matches in `text`.
    ///
    /// At most one marker is returned per (name, category); the first match
    /// wins.
    pub fn detect_cultural_markers(
        &self,
        text: &str,
        concepts: Option<&[Concept]>,
    ) -> Vec<CulturalMarker> {
        let text_lower = text.to_lowercase();
        let mut markers = Vec::new();

        for festival in &self.festivals {
            if mentions(&text_lower, &festival.name) {
                markers.push(self.festival_marker(festival, confidence::FESTIVAL_NAME, None));
            }
            for regional in &festival.regional_names {
                if mentions(&text_lower, regional) {
                    markers.push(self.festival_marker(
                        festival,
                        confidence::REGIONAL_NAME,
                        Some(regional.clone()),
                    ));
                }
            }
        }

        for ctx in &self.contexts {
            if mentions(&text_lower, &ctx.name) {
                markers.push(context_marker(
                    ctx,
                    MarkerKind::CulturalElement,
                    confidence::CONTEXT_NAME,
                    MarkerDetail::Element {
                        description: ctx.description.clone(),
                        matched_via: None,
                    },
                ));
            }
            for related in &ctx.related_terms {
                if mentions(&text_lower, related) {
                    markers.push(context_marker(
                        ctx,
                        MarkerKind::CulturalElement,
                        confidence::RELATED_TERM,
                        MarkerDetail::Element {
                            description: None,
                            matched_via: Some(related.clone()),
                        },
                    ));
                }
            }
        }

        for concept in concepts.unwrap_or_default() {
            if let Some(&i) = self.context_by_name.get(&concept.text.to_lowercase()) {
                markers.push(context_marker(
                    &self.contexts[i],
                    MarkerKind::ConceptMatch,
                    confidence::CONCEPT_MATCH,
                    MarkerDetail::Concept {
                        importance: concept.importance,
                    },
                ));
            }
        }

        deduplicate(markers)
    }

    fn festival_marker(
        &self,
        festival: &Festival,
        confidence: f64,
        regional_variant: Option<String>,
    ) -> CulturalMarker {
        let by_name = regional_variant.is_none();
        CulturalMarker {
            kind: MarkerKind::Festival,
            name: festival.name.clone(),
            category: category::FESTIVAL.to_string(),
            confidence,
            sensitivity: Sensitivity::Neutral,
            age_appropriate: festival.age_appropriate.clone(),
            detail: MarkerDetail::Festival {
                significance: festival.significance.clone().filter(|_| by_name),
                child_explanation: festival.child_explanation.clone().filter(|_| by_name),
                regional_variant,
            },
        }
    }

    /// Score the story's fit with this culture and propose adaptations.
    pub fn analyze_cultural_fit(
        &self,
        text: &str,
        concepts: &[Concept],
        target_age: Option<&str>,
    ) -> CulturalFitReport {
        let markers = self.detect_cultural_markers(text, Some(concepts));
        let score = fit_score(&markers);
        let strengths = self.strengths(&markers);
        let issues = identify_issues(&markers, target_age);
        let suggestions = self.suggestions(&markers, &issues);

        tracing::debug!(
            culture = %self.culture,
            score,
            markers = markers.len(),
            issues = issues.len(),
            "Analyzed cultural fit"
        );

        CulturalFitReport {
            score,
            markers_found: markers.len(),
            overall_assessment: self.assessment(score),
            markers,
            strengths,
            issues,
            suggestions,
        }
    }

    fn strengths(&self, markers: &[CulturalMarker]) -> Vec<String> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for marker in markers {
            *counts.entry(marker.category.as_str()).or_default() += 1;
        }

        let culture = self.culture_display();
        let mut strengths = Vec::new();
        if let Some(n) = counts.get(category::FESTIVAL) {
            strengths.push(format!("Story includes {} {} festival(s)", n, culture));
        }
        if let Some(n) = counts.get(category::VALUE) {
            strengths.push(format!("Story embodies {} {} cultural value(s)", n, culture));
        }
        if counts.contains_key(category::FOOD) {
            strengths.push(format!("Story references {} cuisine and food culture", culture));
        }
        if counts.contains_key(category::CUSTOM) {
            strengths.push(format!("Story demonstrates {} customs and traditions", culture));
        }
        strengths
    }

    fn suggestions(&self, markers: &[CulturalMarker], issues: &[CulturalIssue]) -> Vec<Suggestion> {
        let culture = self.culture_display();
        let article = indefinite_article(&culture);
        let mut suggestions = Vec::new();

        if markers.len() < 2 {
            suggestions.push(Suggestion {
                kind: SuggestionKind::AddCulturalElements,
                priority: Priority::High,
                text: format!("Add more {} cultural elements to increase relevance", culture),
                examples: vec![
                    format!("Include {} {} festival as backdrop", article, culture),
                    format!("Add {} food references", culture),
                    format!("Use {} names for characters", culture),
                ],
                element: None,
                action: None,
            });
        }

        for issue in issues.iter().filter(|i| i.severity == Severity::High) {
            suggestions.push(Suggestion {
                kind: SuggestionKind::FixIssue,
                priority: Priority::High,
                text: format!("Address: {}", issue.reason),
                examples: Vec::new(),
                element: Some(issue.element.clone()),
                action: Some("modify or remove".to_string()),
            });
        }

        if !markers.iter().any(|m| m.category == category::FESTIVAL) {
            suggestions.push(Suggestion {
                kind: SuggestionKind::Enhancement,
                priority: Priority::Medium,
                text: format!("Consider setting story during {} {} festival", article, culture),
                examples: self.popular_festivals(ENHANCEMENT_FESTIVALS),
                element: None,
                action: None,
            });
        }

        suggestions
    }

    fn popular_festivals(&self, n: usize) -> Vec<String> {
        let mut festivals: Vec<&Festival> = self.festivals.iter().collect();
        festivals.sort_by(|a, b| {
            b.popularity
                .partial_cmp(&a.popularity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        festivals.into_iter().take(n).map(|f| f.name.clone()).collect()
    }

    fn assessment(&self, score: f64) -> String {
        let culture = self.culture_display();
        if score >= 0.8 {
            format!("Excellent cultural fit with strong {} context", culture)
        } else if score >= 0.6 {
            format!("Good cultural fit with some {} elements", culture)
        } else if score >= 0.4 {
            "Moderate cultural relevance, could be enhanced".to_string()
        } else if score >= 0.2 {
            "Limited cultural context, significant adaptation needed".to_string()
        } else {
            format!("Minimal {} cultural context", culture)
        }
    }

    /// Map a concept from another culture into this one.
    ///
    /// Known mappings are searched first (case-insensitive substring of the
    /// source concept, preferring the same source context); otherwise the
    /// enrichment gateway is asked for related terms. Returns `None` when
    /// neither finds anything.
    pub async fn find_concept_mapping(
        &self,
        source_concept: &str,
        source_context: &str,
    ) -> Option<ConceptMapping> {
        let needle = source_concept.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }

        let candidates: Vec<&CulturalMapping> = self
            .mappings
            .iter()
            .filter(|m| m.source_concept.to_lowercase().contains(&needle))
            .collect();
        let known = candidates
            .iter()
            .find(|m| m.source_context.eq_ignore_ascii_case(source_context))
            .or_else(|| candidates.first());
        if let Some(mapping) = known {
            return Some(ConceptMapping::from(*mapping));
        }

        let enricher = self.enricher.as_ref()?;
        let mut suggested = enricher
            .suggest_equivalents(source_concept, &self.culture)
            .await
            .into_iter();
        let target = suggested.next()?;

        tracing::debug!(source = source_concept, %target, "Using suggested mapping");
        Some(ConceptMapping {
            source: source_concept.to_string(),
            target,
            mapping_type: mapping_type::CONCEPTNET_SUGGESTED.to_string(),
            confidence: SUGGESTED_MAPPING_CONFIDENCE,
            explanation: Some("Suggested via ConceptNet semantic relations".to_string()),
            examples: Vec::new(),
            alternatives: suggested.collect(),
            verified: false,
        })
    }

    /// First festival whose name contains `name` (case-insensitive).
    pub fn get_festival_context(&self, name: &str) -> Option<&Festival> {
        let needle = name.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        self.festivals
            .iter()
            .find(|f| f.name.to_lowercase().contains(&needle))
    }

    /// Alternatives for each concept: a mapping when one exists, otherwise
    /// similar cultural concepts. Concepts with neither are omitted.
    pub async fn suggest_alternatives(&self, concepts: &[&str]) -> BTreeMap<String, Alternative> {
        let mut alternatives = BTreeMap::new();
        for &concept in concepts {
            if let Some(mapping) = self.find_concept_mapping(concept, "generic").await {
                alternatives.insert(
                    concept.to_string(),
                    Alternative {
                        primary: mapping.target,
                        alternatives: mapping.alternatives,
                        explanation: mapping.explanation.unwrap_or_default(),
                    },
                );
                continue;
            }

            let mut similar = self.find_similar_cultural_concepts(concept).into_iter();
            if let Some(primary) = similar.next() {
                alternatives.insert(
                    concept.to_string(),
                    Alternative {
                        primary,
                        alternatives: similar.collect(),
                        explanation: format!(
                            "Similar concepts from {} culture",
                            self.culture_display()
                        ),
                    },
                );
            }
        }
        alternatives
    }

    /// Contexts with a related term that contains, or is contained in,
    /// `concept`.
    pub fn find_similar_cultural_concepts(&self, concept: &str) -> Vec<String> {
        let concept_lower = concept.trim().to_lowercase();
        if concept_lower.is_empty() {
            return Vec::new();
        }

        self.contexts
            .iter()
            .filter(|ctx| {
                ctx.related_terms.iter().any(|related| {
                    let related = related.to_lowercase();
                    related.contains(&concept_lower) || concept_lower.contains(&related)
                })
            })
            .map(|ctx| ctx.name.clone())
            .take(MAX_SIMILAR_CONCEPTS)
            .collect()
    }
}

fn context_marker(
    ctx: &CulturalContext,
    kind: MarkerKind,
    confidence: f64,
    detail: MarkerDetail,
) -> CulturalMarker {
    CulturalMarker {
        kind,
        name: ctx.name.clone(),
        category: ctx.category.clone(),
        confidence,
        sensitivity: ctx.sensitivity,
        age_appropriate: ctx.age_appropriate.clone(),
        detail,
    }
}

fn deduplicate(markers: Vec<CulturalMarker>) -> Vec<CulturalMarker> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    markers
        .into_iter()
        .filter(|m| seen.insert((m.name.clone(), m.category.clone())))
        .collect()
}

/// min(Σ confidence / 5, 1) rounded to 2 decimals; neutral when empty.
/// Blank terms never match.
fn mentions(text_lower: &str, term: &str) -> bool {
    let term = term.trim();
    !term.is_empty() && text_lower.contains(&term.to_lowercase())
}

pub fn fit_score(markers: &[CulturalMarker]) -> f64 {
    if markers.is_empty() {
        return NEUTRAL_FIT_SCORE;
    }
    let total: f64 = markers.iter().map(|m| m.confidence).sum();
    ((total / FIT_SCORE_DIVISOR).min(1.0) * 100.0).round() / 100.0
}

fn identify_issues(markers: &[CulturalMarker], target_age: Option<&str>) -> Vec<CulturalIssue> {
    let mut issues = Vec::new();

    for marker in markers {
        let (reason, severity) = match marker.sensitivity {
            Sensitivity::Neutral => continue,
            Sensitivity::Caution => ("This element requires careful handling", Severity::Medium),
            Sensitivity::Avoid => (
                "This element should be avoided or recontextualized",
                Severity::High,
            ),
        };
        issues.push(CulturalIssue {
            kind: IssueKind::Sensitivity,
            element: marker.name.clone(),
            reason: reason.to_string(),
            severity,
        });
    }

    if let Some(target) = target_age {
        for marker in markers {
            if !is_age_appropriate(&marker.age_appropriate, target) {
                issues.push(CulturalIssue {
                    kind: IssueKind::AgeInappropriate,
                    element: marker.name.clone(),
                    reason: format!("Not suitable for age group {}", target),
                    severity: Severity::High,
                });
            }
        }
    }

    issues
}

fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn indefinite_article(word: &str) -> &'static str {
    match word.chars().next().map(|c| c.to_ascii_lowercase()) {
        Some('a' | 'e' | 'i' | 'o' | 'u') => "an",
        _ => "a",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::concepts::{ConceptType, Relations};
    use crate::config::EnrichmentConfig;
    use crate::culture::EmbeddedKnowledgeBase;
    use crate::enrichment::{InMemoryRelationStore, RelationStore};

    const STORY: &str = "Diwali is a festival. Ramesh and his grandmother lit many small lamps \
                         together in the evening courtyard.";

    fn ctx(category: &str, name: &str, related: &[&str]) -> CulturalContext {
        CulturalContext {
            culture: "indian".into(),
            category: category.into(),
            name: name.into(),
            description: Some(format!("{} description", name)),
            related_terms: related.iter().map(|s| s.to_string()).collect(),
            sensitivity: Sensitivity::Neutral,
            age_appropriate: "all".into(),
            examples: vec![],
            storytelling_notes: None,
        }
    }

    fn seeded_analyzer() -> CulturalAnalyzer {
        CulturalAnalyzer::from_snapshot(
            EmbeddedKnowledgeBase::seeded().data().clone(),
            "indian",
            None,
        )
    }

    #[test]
    fn test_festival_and_related_term_markers() {
        let analyzer = seeded_analyzer();
        let markers = analyzer.detect_cultural_markers(STORY, None);

        let festival = markers.iter().find(|m| m.kind == MarkerKind::Festival).unwrap();
        assert_eq!(festival.name, "Diwali");
        assert_eq!(festival.confidence, 1.0);

        let elders = markers
            .iter()
            .find(|m| m.name == "Respect for Elders")
            .unwrap();
        assert_eq!(elders.kind, MarkerKind::CulturalElement);
        assert_eq!(elders.confidence, 0.7);
        assert_eq!(
            elders.detail,
            MarkerDetail::Element {
                description: None,
                matched_via: Some("grandmother".into())
            }
        );

        // Diwali, Respect for Elders, and Ladoo and Rangoli via "festival"
        let report = analyzer.analyze_cultural_fit(STORY, &[], None);
        assert_eq!(report.markers_found, 4);
        assert_eq!(report.score, 0.62);
        assert!(report.score > 0.5);
        assert_eq!(report.overall_assessment, "Good cultural fit with some Indian elements");
    }

    #[test]
    fn test_regional_names_and_dedup() {
        let analyzer = seeded_analyzer();
        let text = "At Deepavali, also called Diwali or Divali, we made rangoli.";
        let markers = analyzer.detect_cultural_markers(text, None);

        let festivals: Vec<_> = markers.iter().filter(|m| m.name == "Diwali").collect();
        assert_eq!(festivals.len(), 1);
        assert_eq!(festivals[0].confidence, 1.0);

        let mut keys: Vec<_> = markers.iter().map(|m| m.key()).collect();
        let total = keys.len();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), total);

        assert_eq!(markers, analyzer.detect_cultural_markers(text, None));
    }

    #[test]
    fn test_regional_name_only() {
        let analyzer = seeded_analyzer();
        let markers = analyzer.detect_cultural_markers("We played during Phagwah.", None);
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].name, "Holi");
        assert_eq!(markers[0].confidence, 0.9);
        assert!(matches!(
            &markers[0].detail,
            MarkerDetail::Festival { regional_variant: Some(v), .. } if v == "Phagwah"
        ));
    }

    #[test]
    fn test_concept_match_marker() {
        let analyzer = CulturalAnalyzer::from_snapshot(
            KnowledgeSnapshot {
                contexts: vec![ctx(category::SYMBOL, "Diya", &[])],
                ..Default::default()
            },
            "indian",
            None,
        );
        let concepts = vec![Concept::new("diya", ConceptType::Object, "PRODUCT", 0.42)];

        // the name is in the text too, so the context-name marker wins
        let markers = analyzer.detect_cultural_markers("A diya glowed.", Some(&concepts));
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].kind, MarkerKind::CulturalElement);

        let markers = analyzer.detect_cultural_markers("A lamp glowed.", Some(&concepts));
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].kind, MarkerKind::ConceptMatch);
        assert_eq!(markers[0].confidence, 0.8);
        assert_eq!(markers[0].detail, MarkerDetail::Concept { importance: 0.42 });
    }

    #[test]
    fn test_blank_terms_never_match() {
        let analyzer = CulturalAnalyzer::from_snapshot(
            KnowledgeSnapshot {
                contexts: vec![ctx(category::SYMBOL, "Diya", &["", "  "])],
                ..Default::default()
            },
            "indian",
            None,
        );

        let report = analyzer.analyze_cultural_fit("The robot counted gears.", &[], None);
        assert_eq!(report.markers_found, 0);
        assert_eq!(report.score, 0.5);
    }

    #[test]
    fn test_no_markers_is_neutral() {
        let analyzer = seeded_analyzer();
        let report = analyzer.analyze_cultural_fit("The cat sat on a mat.", &[], Some("3-5"));

        assert_eq!(report.score, 0.5);
        assert_eq!(report.markers_found, 0);
        assert!(report.strengths.is_empty());
        assert_eq!(report.overall_assessment, "Moderate cultural relevance, could be enhanced");

        let kinds: Vec<_> = report.suggestions.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![SuggestionKind::AddCulturalElements, SuggestionKind::Enhancement]
        );
        assert_eq!(
            report.suggestions[0].examples[0],
            "Include an Indian festival as backdrop"
        );
        assert_eq!(report.suggestions[1].examples, vec!["Diwali", "Holi"]);
        assert_eq!(
            report.suggestions[1].text,
            "Consider setting story during an Indian festival"
        );
    }

    #[test]
    fn test_strengths_and_full_score() {
        let analyzer = seeded_analyzer();
        let text = "On Diwali and Holi the joint family ate ladoo, said namaste and drew rangoli \
                    to show respect for elders.";
        let report = analyzer.analyze_cultural_fit(text, &[], None);

        assert_eq!(report.score, 1.0);
        assert_eq!(
            report.overall_assessment,
            "Excellent cultural fit with strong Indian context"
        );
        assert!(report.strengths.contains(&"Story includes 2 Indian festival(s)".to_string()));
        assert!(report.strengths.contains(&"Story embodies 2 Indian cultural value(s)".to_string()));
        assert!(report
            .strengths
            .contains(&"Story references Indian cuisine and food culture".to_string()));
        assert!(report
            .strengths
            .contains(&"Story demonstrates Indian customs and traditions".to_string()));
        assert!(report.suggestions.is_empty());
    }

    #[test]
    fn test_sensitivity_and_age_issues() {
        let mut caution = ctx(category::CUSTOM, "Fasting", &[]);
        caution.sensitivity = Sensitivity::Caution;
        let mut avoid = ctx(category::CUSTOM, "Sacrifice", &[]);
        avoid.sensitivity = Sensitivity::Avoid;
        let mut older = ctx(category::VALUE, "Duty", &[]);
        older.age_appropriate = "9-12".into();

        let analyzer = CulturalAnalyzer::from_snapshot(
            KnowledgeSnapshot {
                contexts: vec![caution, avoid, older],
                ..Default::default()
            },
            "indian",
            None,
        );
        let text = "A story of fasting, sacrifice and duty.";

        let report = analyzer.analyze_cultural_fit(text, &[], Some("6-8"));
        let issues: Vec<_> = report
            .issues
            .iter()
            .map(|i| (i.kind, i.element.as_str(), i.severity))
            .collect();
        assert_eq!(
            issues,
            vec![
                (IssueKind::Sensitivity, "Fasting", Severity::Medium),
                (IssueKind::Sensitivity, "Sacrifice", Severity::High),
                (IssueKind::AgeInappropriate, "Duty", Severity::High),
            ]
        );
        assert_eq!(report.issues[2].reason, "Not suitable for age group 6-8");

        let fixes: Vec<_> = report
            .suggestions
            .iter()
            .filter(|s| s.kind == SuggestionKind::FixIssue)
            .collect();
        assert_eq!(fixes.len(), 2);
        assert_eq!(
            fixes[0].text,
            "Address: This element should be avoided or recontextualized"
        );
        assert_eq!(fixes[0].action.as_deref(), Some("modify or remove"));

        let older_reader = analyzer.analyze_cultural_fit(text, &[], Some("13+"));
        assert!(older_reader
            .issues
            .iter()
            .all(|i| i.kind == IssueKind::Sensitivity));
    }

    #[test]
    fn test_fit_score_bounds() {
        let analyzer = seeded_analyzer();
        let report = analyzer.analyze_cultural_fit("A festival day.", &[], None);
        assert!((0.0..=1.0).contains(&report.score));
        // Ladoo and Rangoli via "festival"
        assert_eq!(report.score, 0.28);
        assert_eq!(
            report.overall_assessment,
            "Limited cultural context, significant adaptation needed"
        );
    }

    #[tokio::test]
    async fn test_find_known_mapping() {
        let analyzer = seeded_analyzer();

        let mapping = analyzer.find_concept_mapping("christmas", "western").await.unwrap();
        assert_eq!(mapping.target, "Diwali");
        assert_eq!(mapping.confidence, 0.8);
        assert!(mapping.verified);
        assert_eq!(mapping.examples.len(), 2);

        let cake = analyzer.find_concept_mapping("cake", "generic").await.unwrap();
        assert_eq!(cake.target, "ladoo or barfi");

        assert!(analyzer.find_concept_mapping("snowman", "western").await.is_none());
    }

    #[tokio::test]
    async fn test_mapping_falls_back_to_gateway() {
        let store = Arc::new(InMemoryRelationStore::new());
        let rel = |targets: &[&str]| -> Relations {
            [("RelatedTo".to_string(), targets.iter().map(|s| s.to_string()).collect())]
                .into_iter()
                .collect()
        };
        store.put("snowman", rel(&["winter", "festival", "fun"])).await.unwrap();
        store.put("indian", rel(&["festival", "fun", "curry"])).await.unwrap();

        let enricher = Arc::new(ConceptEnricher::new(store, None, &EnrichmentConfig::default()));
        let analyzer = CulturalAnalyzer::from_snapshot(
            EmbeddedKnowledgeBase::seeded().data().clone(),
            "indian",
            Some(enricher),
        );

        let mapping = analyzer.find_concept_mapping("snowman", "western").await.unwrap();
        assert_eq!(mapping.target, "festival");
        assert_eq!(mapping.alternatives, vec!["fun".to_string()]);
        assert_eq!(mapping.mapping_type, mapping_type::CONCEPTNET_SUGGESTED);
        assert_eq!(mapping.confidence, 0.5);
        assert!(!mapping.verified);

        assert!(analyzer.find_concept_mapping("robot", "western").await.is_none());
    }

    #[test]
    fn test_festival_context() {
        let analyzer = seeded_analyzer();
        let holi = analyzer.get_festival_context("hol").unwrap();
        assert_eq!(holi.name, "Holi");
        assert_eq!(holi.foods, vec!["gujiya", "thandai", "malpua"]);
        assert!(analyzer.get_festival_context("Eid").is_none());
    }

    #[tokio::test]
    async fn test_suggest_alternatives() {
        let analyzer = seeded_analyzer();
        let alternatives = analyzer
            .suggest_alternatives(&["handshake", "greeting", "spaceship"])
            .await;

        assert_eq!(alternatives["handshake"].primary, "namaste");
        assert_eq!(alternatives["greeting"].primary, "Namaste");
        assert_eq!(
            alternatives["greeting"].explanation,
            "Similar concepts from Indian culture"
        );
        assert!(!alternatives.contains_key("spaceship"));
    }

    #[test]
    fn test_similar_concepts() {
        let analyzer = seeded_analyzer();
        assert_eq!(
            analyzer.find_similar_cultural_concepts("family"),
            vec!["Respect for Elders", "Joint Family"]
        );
        assert_eq!(
            analyzer.find_similar_cultural_concepts("festival"),
            vec!["Ladoo", "Rangoli"]
        );
        assert!(analyzer.find_similar_cultural_concepts("").is_empty());
    }
}
