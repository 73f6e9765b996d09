//! Detected cultural markers and the fit report built from them.

use serde::{Deserialize, Serialize};

use super::models::Sensitivity;

/// How a marker was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    Festival,
    CulturalElement,
    ConceptMatch,
}

/// Confidence for each way a marker can be matched.
pub mod confidence {
    pub const FESTIVAL_NAME: f64 = 1.0;
    pub const REGIONAL_NAME: f64 = 0.9;
    pub const CONTEXT_NAME: f64 = 1.0;
    pub const RELATED_TERM: f64 = 0.7;
    pub const CONCEPT_MATCH: f64 = 0.8;
}

/// Extra information that depends on the marker kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerDetail {
    Festival {
        #[serde(skip_serializing_if = "Option::is_none")]
        significance: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        child_explanation: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        regional_variant: Option<String>,
    },
    Element {
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        matched_via: Option<String>,
    },
    Concept {
        importance: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CulturalMarker {
    #[serde(rename = "type")]
    pub kind: MarkerKind,
    pub name: String,
    pub category: String,
    pub confidence: f64,
    pub sensitivity: Sensitivity,
    pub age_appropriate: String,
    pub detail: MarkerDetail,
}

impl CulturalMarker {
    /// Deduplication key.
    pub fn key(&self) -> (&str, &str) {
        (&self.name, &self.category)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    Sensitivity,
    AgeInappropriate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CulturalIssue {
    #[serde(rename = "type")]
    pub kind: IssueKind,
    pub element: String,
    pub reason: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    AddCulturalElements,
    FixIssue,
    Enhancement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    pub priority: Priority,
    #[serde(rename = "suggestion")]
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

/// Result of [`CulturalAnalyzer::analyze_cultural_fit`](super::CulturalAnalyzer::analyze_cultural_fit).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CulturalFitReport {
    pub score: f64,
    pub markers_found: usize,
    pub markers: Vec<CulturalMarker>,
    pub strengths: Vec<String>,
    pub issues: Vec<CulturalIssue>,
    pub suggestions: Vec<Suggestion>,
    pub overall_assessment: String,
}
