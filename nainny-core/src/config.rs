//! Configuration types for Nainny

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{NainnyError, Result};

/// Age bands supported by the pipeline, youngest first.
pub const AGE_RANGES: [&str; 4] = ["3-5", "6-8", "9-12", "13+"];

/// Main configuration for Nainny
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NainnyConfig {
    /// Story validation settings
    #[serde(default)]
    pub story: StoryConfig,

    /// Target culture settings
    #[serde(default)]
    pub culture: CultureConfig,

    /// Concept enrichment settings
    #[serde(default)]
    pub enrichment: EnrichmentConfig,

    /// Cultural knowledge base location (optional, embedded data otherwise)
    #[serde(default)]
    pub knowledge_base: KnowledgeBaseConfig,

    /// LLM provider configuration (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm: Option<LLMProviderConfig>,

    /// Embeddings provider configuration (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embeddings: Option<EmbeddingsConfig>,
}

/// Story validation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryConfig {
    /// Minimum story length in characters (after trimming)
    pub min_story_length: usize,

    /// Maximum story length in words (informational)
    pub max_story_length: usize,

    /// Complexity assumed before a story is analysed (1-10)
    pub default_complexity: u8,
}

impl Default for StoryConfig {
    fn default() -> Self {
        Self {
            min_story_length: 50,
            max_story_length: 5000,
            default_complexity: 5,
        }
    }
}

/// Target culture configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CultureConfig {
    /// Culture whose knowledge base is loaded
    pub default_culture: String,

    /// Plain terms spotted during story parsing
    #[serde(default = "default_marker_terms")]
    pub marker_terms: Vec<String>,
}

fn default_marker_terms() -> Vec<String> {
    [
        "diwali", "holi", "diya", "rangoli", "namaste", "ladoo", "barfi", "paneer", "curry",
        "naan", "sari", "kurta", "dhoti", "ram", "krishna", "ganesh", "lakshmi", "guru",
        "ashram", "temple", "mandir", "hindi", "sanskrit", "tamil", "bengali",
    ]
    .iter()
    .map(|t| t.to_string())
    .collect()
}

impl Default for CultureConfig {
    fn default() -> Self {
        Self {
            default_culture: "indian".to_string(),
            marker_terms: default_marker_terms(),
        }
    }
}

/// Concept enrichment configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentConfig {
    /// Base URL of the semantic relation service
    pub api_base: String,

    /// Per-request timeout
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,

    /// Total attempts per lookup (at least 1)
    pub retry_count: usize,

    /// Age after which cached relations are refetched
    #[serde(with = "humantime_serde")]
    pub cache_expiry: Duration,

    /// Skip all external calls
    pub offline: bool,

    /// Minimum concept importance for enrichment
    pub importance_threshold: f64,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            api_base: "http://api.conceptnet.io".to_string(),
            timeout: Duration::from_secs(10),
            retry_count: 3,
            cache_expiry: Duration::from_secs(30 * 24 * 60 * 60),
            offline: false,
            importance_threshold: 0.3,
        }
    }
}

/// Knowledge base location
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct KnowledgeBaseConfig {
    /// JSON or YAML file with festivals, contexts and mappings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMProviderConfig {
    /// Provider type
    pub provider: LLMProvider,

    /// Model name
    pub model: String,

    /// Base URL (for custom endpoints, e.g., Ollama)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Token cap for adapted stories
    #[serde(default = "default_max_new_tokens")]
    pub max_new_tokens: usize,
}

fn default_max_new_tokens() -> usize {
    256
}

/// LLM provider type
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LLMProvider {
    Ollama,
}

/// Embeddings configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingsConfig {
    /// Provider type
    pub provider: EmbeddingProvider,

    /// Model name
    pub model: String,
}

/// Embedding provider type
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProvider {
    Local,
}

impl NainnyConfig {
    /// Load configuration from file and environment variables.
    ///
    /// Loads in this order:
    /// 1. Default configuration
    /// 2. Configuration file (nainny.toml)
    /// 3. Environment variable overrides (`NAINNY_ENRICHMENT__OFFLINE=true`)
    /// 4. File at NAINNY_CONFIG_PATH, if set
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration source is invalid.
    pub fn load() -> Result<Self> {
        use figment::{
            Figment,
            providers::{Env, Format, Serialized, Toml},
        };

        let mut figment = Figment::from(Serialized::defaults(NainnyConfig::default()))
            .merge(Toml::file("nainny.toml"))
            .merge(Env::prefixed("NAINNY_").split("__"));

        if let Ok(path) = std::env::var("NAINNY_CONFIG_PATH") {
            figment = figment.merge(Toml::file(path));
        }

        let config: NainnyConfig = figment.extract().map_err(|e| {
            NainnyError::Configuration(format!("Failed to load configuration: {}", e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        use figment::{
            Figment,
            providers::{Format, Serialized, Toml},
        };

        let config: NainnyConfig = Figment::from(Serialized::defaults(NainnyConfig::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(|e| {
                NainnyError::Configuration(format!("Failed to load configuration file: {}", e))
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<()> {
        if !(1..=10).contains(&self.story.default_complexity) {
            return Err(NainnyError::Configuration(format!(
                "default_complexity must be between 1 and 10, got {}",
                self.story.default_complexity
            )));
        }
        if self.story.min_story_length == 0 {
            return Err(NainnyError::Configuration(
                "min_story_length must be positive".to_string(),
            ));
        }
        if self.enrichment.retry_count == 0 {
            return Err(NainnyError::Configuration(
                "enrichment.retry_count must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.enrichment.importance_threshold) {
            return Err(NainnyError::Configuration(
                "enrichment.importance_threshold must lie in [0, 1]".to_string(),
            ));
        }
        if self.culture.default_culture.trim().is_empty() {
            return Err(NainnyError::Configuration(
                "culture.default_culture must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Whether `age_range` is one of the supported bands.
pub fn is_valid_age_range(age_range: &str) -> bool {
    AGE_RANGES.contains(&age_range)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = NainnyConfig::default();
        assert_eq!(config.story.min_story_length, 50);
        assert_eq!(config.story.default_complexity, 5);
        assert_eq!(config.enrichment.retry_count, 3);
        assert_eq!(config.enrichment.cache_expiry, Duration::from_secs(2_592_000));
        assert!(!config.enrichment.offline);
        assert_eq!(config.culture.default_culture, "indian");
        assert!(config.culture.marker_terms.contains(&"rangoli".to_string()));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file_overrides() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[story]
min_story_length = 20
max_story_length = 1000
default_complexity = 4

[enrichment]
api_base = "http://localhost:8084"
timeout = "2s"
retry_count = 1
cache_expiry = "7days"
offline = true
importance_threshold = 0.3
"#
        )
        .unwrap();

        let config = NainnyConfig::from_file(file.path()).unwrap();
        assert_eq!(config.story.min_story_length, 20);
        assert!(config.enrichment.offline);
        assert_eq!(config.enrichment.timeout, Duration::from_secs(2));
        assert_eq!(config.culture.default_culture, "indian");
    }

    #[test]
    fn test_validation_rejects_bad_complexity() {
        let mut config = NainnyConfig::default();
        config.story.default_complexity = 11;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_age_ranges() {
        assert!(is_valid_age_range("6-8"));
        assert!(is_valid_age_range("13+"));
        assert!(!is_valid_age_range("child"));
    }
}
