//! External semantic relation sources.

use std::collections::HashSet;

use async_trait::async_trait;
use serde::Deserialize;

use crate::concepts::Relations;
use crate::config::EnrichmentConfig;
use crate::error::Result;

/// Where uncached relations come from.
#[async_trait]
pub trait RelationSource: Send + Sync {
    /// Relations for a lowercase term. An empty map means the source knows
    /// the term but has nothing to say about it.
    async fn fetch(&self, term: &str) -> Result<Relations>;

    fn name(&self) -> &str;
}

/// ConceptNet 5 REST client.
pub struct ConceptNetClient {
    client: reqwest::Client,
    api_base: String,
    limit: usize,
}

/// Related terms kept per relation kind.
const MAX_TERMS_PER_RELATION: usize = 10;

impl ConceptNetClient {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            limit: 50,
        }
    }

    pub fn from_config(config: &EnrichmentConfig) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            ..Self::new(config.api_base.clone())
        })
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.max(1);
        self
    }

    /// `/c/en/<term>` with spaces as underscores.
    pub fn concept_url(&self, term: &str) -> String {
        let node = term.trim().to_lowercase().replace(' ', "_");
        format!(
            "{}/c/en/{}?limit={}",
            self.api_base,
            urlencoding::encode(&node),
            self.limit
        )
    }
}

#[derive(Debug, Deserialize)]
struct ConceptNetResponse {
    #[serde(default)]
    edges: Vec<ConceptNetEdge>,
}

#[derive(Debug, Deserialize)]
struct ConceptNetEdge {
    rel: ConceptNetRel,
    start: ConceptNetNode,
    end: ConceptNetNode,
}

#[derive(Debug, Deserialize)]
struct ConceptNetRel {
    label: String,
}

#[derive(Debug, Deserialize)]
struct ConceptNetNode {
    label: String,
    #[serde(default)]
    language: Option<String>,
}

impl ConceptNetNode {
    fn is_english(&self) -> bool {
        self.language.as_deref().is_none_or(|l| l == "en")
    }
}

/// Group edge targets by relation label, from the point of view of `term`.
fn group_edges(term: &str, edges: Vec<ConceptNetEdge>) -> Relations {
    let term = term.to_lowercase();
    let mut relations = Relations::new();
    let mut seen: HashSet<(String, String)> = HashSet::new();

    for edge in edges {
        if !edge.start.is_english() || !edge.end.is_english() {
            continue;
        }
        let other = if edge.end.label.to_lowercase() == term {
            edge.start.label
        } else {
            edge.end.label
        };
        let other = other.to_lowercase();
        if other == term || !seen.insert((edge.rel.label.clone(), other.clone())) {
            continue;
        }

        let targets = relations.entry(edge.rel.label).or_default();
        if targets.len() < MAX_TERMS_PER_RELATION {
            targets.push(other);
        }
    }
    relations
}

#[async_trait]
impl RelationSource for ConceptNetClient {
    async fn fetch(&self, term: &str) -> Result<Relations> {
        let url = self.concept_url(term);
        tracing::debug!(term, %url, "Fetching relations");

        let response = self.client.get(&url).send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(Relations::new());
        }

        let body: ConceptNetResponse = response.error_for_status()?.json().await?;
        Ok(group_edges(term, body.edges))
    }

    fn name(&self) -> &str {
        "conceptnet"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concept_url() {
        let client = ConceptNetClient::new("http://api.conceptnet.io/").with_limit(20);
        assert_eq!(
            client.concept_url("Birthday Cake"),
            "http://api.conceptnet.io/c/en/birthday_cake?limit=20"
        );
    }

    #[test]
    fn test_group_edges() {
        let body = r#"{
            "edges": [
                {"rel": {"label": "IsA"}, "start": {"label": "apple", "language": "en"}, "end": {"label": "fruit", "language": "en"}},
                {"rel": {"label": "IsA"}, "start": {"label": "apple", "language": "en"}, "end": {"label": "Fruit", "language": "en"}},
                {"rel": {"label": "AtLocation"}, "start": {"label": "an apple", "language": "en"}, "end": {"label": "tree", "language": "en"}},
                {"rel": {"label": "RelatedTo"}, "start": {"label": "pomme", "language": "fr"}, "end": {"label": "apple", "language": "en"}},
                {"rel": {"label": "PartOf"}, "start": {"label": "core", "language": "en"}, "end": {"label": "apple", "language": "en"}}
            ]
        }"#;
        let response: ConceptNetResponse = serde_json::from_str(body).unwrap();
        let relations = group_edges("apple", response.edges);

        assert_eq!(relations["IsA"], vec!["fruit".to_string()]);
        assert_eq!(relations["AtLocation"], vec!["tree".to_string()]);
        assert_eq!(relations["PartOf"], vec!["core".to_string()]);
        assert!(!relations.contains_key("RelatedTo"));
    }
}
