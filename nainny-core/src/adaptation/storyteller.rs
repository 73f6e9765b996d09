use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::llm::{LLMConfig, LLMProvider};

/// Token cap for generated stories.
pub const DEFAULT_MAX_NEW_TOKENS: usize = 256;

/// Hint keys included in a generation prompt.
pub const MAX_HINT_KEYS: usize = 6;

/// Sentences longer than this are shortened for young audiences.
const LONG_SENTENCE_WORDS: usize = 20;

/// Words kept from a shortened sentence.
const SHORTENED_SENTENCE_WORDS: usize = 18;

const GENERATION_TEMPERATURE: f32 = 0.7;

/// Term replacements keyed by source term, in insertion order.
///
/// A value is either a replacement string or a list whose first string is
/// used. Other shapes are ignored by the rule-based strategy.
pub type AdaptationHints = serde_json::Map<String, Value>;

/// How a story was adapted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AdaptationStrategy {
    Generative { model: String },
    RuleBased,
}

/// One rule-based edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AdaptationChange {
    SentenceShortened { sentence: usize, original_words: usize },
    TermReplaced { from: String, to: String, occurrences: usize },
}

/// Result of adapting a story.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdaptedStory {
    pub text: String,
    pub target_culture: String,
    pub target_age: String,
    pub strategy: AdaptationStrategy,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub changes: Vec<AdaptationChange>,
}

/// True for age labels that call for shortened sentences.
pub fn is_young_audience(target_age: &str) -> bool {
    let age = target_age.to_lowercase();
    ["child", "3-5", "6-8"].iter().any(|marker| age.contains(marker))
}

/// Rewrites stories for a culture and age group.
pub struct AdaptiveStoryteller {
    generator: Option<Arc<dyn LLMProvider>>,
    max_new_tokens: usize,
}

impl AdaptiveStoryteller {
    pub fn new(generator: Option<Arc<dyn LLMProvider>>) -> Self {
        Self {
            generator,
            max_new_tokens: DEFAULT_MAX_NEW_TOKENS,
        }
    }

    /// Rule-based only.
    pub fn rule_based() -> Self {
        Self::new(None)
    }

    pub fn with_max_new_tokens(mut self, tokens: usize) -> Self {
        self.max_new_tokens = tokens.max(1);
        self
    }

    pub fn has_generator(&self) -> bool {
        self.generator.is_some()
    }

    /// Adapt `text` for `target_culture` and `target_age`.
    ///
    /// Generation failures are logged and the rule-based strategy is used
    /// instead, so this never fails.
    pub async fn adapt(
        &self,
        text: &str,
        target_culture: &str,
        target_age: &str,
        hints: Option<&AdaptationHints>,
    ) -> AdaptedStory {
        if let Some(generator) = &self.generator {
            let prompt = build_prompt(text, target_culture, target_age, hints);
            let config = LLMConfig::new()
                .with_temperature(GENERATION_TEMPERATURE)
                .with_max_tokens(self.max_new_tokens);

            match generator.generate(&prompt, &config).await {
                Ok(generated) => {
                    let model = generator.model_info().model_name;
                    tracing::debug!(%model, culture = target_culture, age = target_age, "Generated adaptation");
                    return AdaptedStory {
                        text: generated,
                        target_culture: target_culture.to_string(),
                        target_age: target_age.to_string(),
                        strategy: AdaptationStrategy::Generative { model },
                        changes: Vec::new(),
                    };
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Generation failed, using rule-based adaptation");
                }
            }
        }

        adapt_with_rules(text, target_culture, target_age, hints)
    }
}

impl Default for AdaptiveStoryteller {
    fn default() -> Self {
        Self::rule_based()
    }
}

fn build_prompt(
    text: &str,
    target_culture: &str,
    target_age: &str,
    hints: Option<&AdaptationHints>,
) -> String {
    let concept_summary = match hints {
        Some(hints) if !hints.is_empty() => {
            let keys: Vec<&str> = hints.keys().take(MAX_HINT_KEYS).map(String::as_str).collect();
            format!("Key concepts: {}.\n", keys.join(", "))
        }
        _ => String::new(),
    };

    format!(
        "Rewrite the following story for a {} audience in the {} culture. {}Story:\n{}",
        target_age, target_culture, concept_summary, text
    )
}

fn adapt_with_rules(
    text: &str,
    target_culture: &str,
    target_age: &str,
    hints: Option<&AdaptationHints>,
) -> AdaptedStory {
    let mut changes = Vec::new();
    let mut adapted = text.trim().to_string();

    if is_young_audience(target_age) {
        let shortened: Vec<String> = split_sentences(&adapted)
            .into_iter()
            .enumerate()
            .map(|(index, sentence)| {
                let words: Vec<&str> = sentence.split_whitespace().collect();
                if words.len() > LONG_SENTENCE_WORDS {
                    changes.push(AdaptationChange::SentenceShortened {
                        sentence: index,
                        original_words: words.len(),
                    });
                    format!("{}...", words[..SHORTENED_SENTENCE_WORDS].join(" "))
                } else {
                    sentence.to_string()
                }
            })
            .collect();
        adapted = shortened.join(" ");
    }

    for (from, value) in hints.into_iter().flatten() {
        let to = match value {
            Value::String(s) => s.as_str(),
            Value::Array(items) => match items.first() {
                Some(Value::String(s)) => s.as_str(),
                _ => continue,
            },
            _ => continue,
        };
        if from.is_empty() {
            continue;
        }

        let occurrences = adapted.matches(from.as_str()).count();
        if occurrences > 0 {
            adapted = adapted.replace(from.as_str(), to);
            changes.push(AdaptationChange::TermReplaced {
                from: from.clone(),
                to: to.to_string(),
                occurrences,
            });
        }
    }

    AdaptedStory {
        text: format!("(Adapted for {} / {})\n{}", target_culture, target_age, adapted),
        target_culture: target_culture.to_string(),
        target_age: target_age.to_string(),
        strategy: AdaptationStrategy::RuleBased,
        changes,
    }
}

/// Split after `.`, `!` or `?` when followed by one or more spaces.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?') || chars.peek().is_none_or(|&(_, next)| next != ' ') {
            continue;
        }
        let end = i + c.len_utf8();
        sentences.push(&text[start..end]);

        let mut resume = end;
        while let Some(&(j, ' ')) = chars.peek() {
            resume = j + 1;
            chars.next();
        }
        start = resume;
    }

    sentences.push(&text[start..]);
    sentences
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{NainnyError, Result};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    struct RecordingProvider {
        prompts: Mutex<Vec<(String, usize)>>,
    }

    #[async_trait]
    impl LLMProvider for RecordingProvider {
        async fn generate(&self, prompt: &str, config: &LLMConfig) -> Result<String> {
            self.prompts
                .lock()
                .unwrap()
                .push((prompt.to_string(), config.max_tokens));
            Ok("Once upon a time in Jaipur.".to_string())
        }
    }

    struct BrokenProvider;

    #[async_trait]
    impl LLMProvider for BrokenProvider {
        async fn generate(&self, _prompt: &str, _config: &LLMConfig) -> Result<String> {
            Err(NainnyError::Generation("model crashed".into()))
        }
    }

    fn hints(value: Value) -> AdaptationHints {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_young_audience_labels() {
        assert!(is_young_audience("3-5"));
        assert!(is_young_audience("6-8 years"));
        assert!(is_young_audience("Young Children"));
        assert!(!is_young_audience("9-12"));
        assert!(!is_young_audience("13+"));
    }

    #[test]
    fn test_split_sentences() {
        assert_eq!(
            split_sentences("One. Two!  Three? Four"),
            vec!["One.", "Two!", "Three?", "Four"]
        );
        assert_eq!(split_sentences("No break.Here."), vec!["No break.Here."]);
        assert_eq!(split_sentences(""), vec![""]);
    }

    #[tokio::test]
    async fn test_long_sentence_shortened_for_young_readers() {
        let long = (1..=25).map(|i| format!("w{}", i)).collect::<Vec<_>>().join(" ");
        let text = format!("{}. The end.", long);

        let story = AdaptiveStoryteller::rule_based()
            .adapt(&text, "Indian", "3-5", None)
            .await;

        let expected_first = (1..=18).map(|i| format!("w{}", i)).collect::<Vec<_>>().join(" ");
        assert_eq!(
            story.text,
            format!("(Adapted for Indian / 3-5)\n{}... The end.", expected_first)
        );
        assert_eq!(story.strategy, AdaptationStrategy::RuleBased);
        assert_eq!(
            story.changes,
            vec![AdaptationChange::SentenceShortened {
                sentence: 0,
                original_words: 25
            }]
        );
    }

    #[tokio::test]
    async fn test_older_audience_keeps_long_sentences() {
        let long = vec!["word"; 25].join(" ");
        let story = AdaptiveStoryteller::default()
            .adapt(&long, "Indian", "9-12", None)
            .await;
        assert!(story.text.ends_with(&long));
        assert!(story.changes.is_empty());
    }

    #[tokio::test]
    async fn test_hint_replacements() {
        let hints = hints(json!({
            "Christmas": ["Diwali", "Deepavali"],
            "cake": "ladoo",
            "tree": {"not": "used"},
            "snow": [],
        }));

        let story = AdaptiveStoryteller::default()
            .adapt(
                "On Christmas we ate cake near the tree. Snow fell.",
                "Indian",
                "9-12",
                Some(&hints),
            )
            .await;

        assert_eq!(
            story.text,
            "(Adapted for Indian / 9-12)\nOn Diwali we ate ladoo near the tree. Snow fell."
        );
        assert_eq!(story.changes.len(), 2);
    }

    #[tokio::test]
    async fn test_generator_used_with_prompt() {
        let provider = Arc::new(RecordingProvider {
            prompts: Mutex::new(Vec::new()),
        });
        let generator: Arc<dyn LLMProvider> = provider.clone();
        let storyteller = AdaptiveStoryteller::new(Some(generator)).with_max_new_tokens(128);

        let hints = hints(json!({
            "a": "1", "b": "2", "c": "3", "d": "4", "e": "5", "f": "6", "g": "7"
        }));
        let story = storyteller
            .adapt("A story.", "Indian", "6-8", Some(&hints))
            .await;

        assert_eq!(story.text, "Once upon a time in Jaipur.");
        assert!(matches!(story.strategy, AdaptationStrategy::Generative { .. }));

        let prompts = provider.prompts.lock().unwrap();
        let (prompt, tokens) = &prompts[0];
        assert_eq!(*tokens, 128);
        assert_eq!(
            prompt,
            "Rewrite the following story for a 6-8 audience in the Indian culture. \
             Key concepts: a, b, c, d, e, f.\nStory:\nA story."
        );
    }

    #[tokio::test]
    async fn test_generation_failure_falls_back() {
        let generator: Arc<dyn LLMProvider> = Arc::new(BrokenProvider);
        let story = AdaptiveStoryteller::new(Some(generator))
            .adapt("A small tale.", "Indian", "3-5", None)
            .await;

        assert_eq!(story.strategy, AdaptationStrategy::RuleBased);
        assert_eq!(story.text, "(Adapted for Indian / 3-5)\nA small tale.");
    }
}
