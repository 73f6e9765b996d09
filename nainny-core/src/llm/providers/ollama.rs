//! Ollama LLM provider implementation

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{NainnyError, Result};
use crate::llm::{LLMProvider, LLMRequest, LLMResponse, MessageRole, ModelInfo, TokenUsage};

/// Ollama LLM provider (local model server).
pub struct OllamaProvider {
    client: reqwest::Client,
    model: String,
    base_url: String,
}

impl OllamaProvider {
    pub const DEFAULT_MODEL: &'static str = "llama3.2";
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:11434";

    /// Create a new Ollama provider.
    ///
    /// # Arguments
    ///
    /// * `model` - Model name (e.g., "llama3.2")
    /// * `base_url` - Base URL for Ollama API (defaults to "http://localhost:11434")
    pub fn new(model: impl Into<String>, base_url: Option<impl Into<String>>) -> Self {
        Self {
            client: reqwest::Client::new(),
            model: model.into(),
            base_url: base_url
                .map(|u| u.into())
                .unwrap_or_else(|| Self::DEFAULT_BASE_URL.to_string()),
        }
    }

    /// Create from environment variables.
    ///
    /// Reads `OLLAMA_MODEL` (overridden by `model`) and `OLLAMA_BASE_URL`.
    pub fn from_env(model: Option<impl Into<String>>) -> Self {
        let model = model
            .map(|m| m.into())
            .or_else(|| std::env::var("OLLAMA_MODEL").ok())
            .unwrap_or_else(|| Self::DEFAULT_MODEL.to_string());

        let base_url = std::env::var("OLLAMA_BASE_URL").ok();

        Self::new(model, base_url)
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    messages: Vec<OllamaMessage<'a>>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: Option<f32>,
    num_predict: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<Vec<String>>,
}

#[derive(Deserialize)]
struct OllamaResponse {
    message: OllamaMessageResponse,
    #[serde(default)]
    prompt_eval_count: Option<usize>,
    #[serde(default)]
    eval_count: Option<usize>,
}

#[derive(Deserialize)]
struct OllamaMessageResponse {
    content: String,
    #[serde(default)]
    thinking: Option<String>,
}

fn role_name(role: MessageRole) -> &'static str {
    match role {
        MessageRole::System => "system",
        MessageRole::User => "user",
        MessageRole::Assistant => "assistant",
    }
}

#[async_trait]
impl LLMProvider for OllamaProvider {
    async fn generate_request(&self, request: &LLMRequest) -> Result<LLMResponse> {
        let body = OllamaRequest {
            model: &self.model,
            messages: request
                .messages
                .iter()
                .map(|m| OllamaMessage {
                    role: role_name(m.role),
                    content: &m.content,
                })
                .collect(),
            stream: false,
            options: OllamaOptions {
                temperature: request.temperature,
                num_predict: request.max_tokens,
                stop: (!request.stop_sequences.is_empty()).then(|| request.stop_sequences.clone()),
            },
        };

        let url = format!("{}/api/chat", self.base_url.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                NainnyError::Generation(format!(
                    "Failed to send request to Ollama: {}. Make sure Ollama is running.",
                    e
                ))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(NainnyError::Generation(format!(
                "Ollama API error ({}): {}",
                status, text
            )));
        }

        let parsed: OllamaResponse = response.json().await.map_err(|e| {
            NainnyError::Generation(format!("Failed to parse Ollama response: {}", e))
        })?;

        let mut content = parsed.message.content.trim().to_string();
        if content.is_empty()
            && let Some(thinking) = parsed.message.thinking
        {
            content = thinking.trim().to_string();
        }

        let usage = match (parsed.prompt_eval_count, parsed.eval_count) {
            (Some(prompt_tokens), Some(completion_tokens)) => Some(TokenUsage {
                prompt_tokens,
                completion_tokens,
                total_tokens: prompt_tokens + completion_tokens,
            }),
            _ => None,
        };

        Ok(LLMResponse { content, usage })
    }

    fn model_info(&self) -> ModelInfo {
        ModelInfo {
            provider: "ollama".to_string(),
            model_name: self.model.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ollama_provider_creation() {
        let provider = OllamaProvider::new("llama3.2", None::<String>);
        assert_eq!(provider.model(), "llama3.2");
        assert_eq!(provider.base_url, OllamaProvider::DEFAULT_BASE_URL);
    }

    #[test]
    fn test_explicit_model_wins_over_env() {
        let provider = OllamaProvider::from_env(Some("story-model"));
        assert_eq!(provider.model(), "story-model");
        assert_eq!(provider.model_info().provider, "ollama");
    }

    #[test]
    fn test_role_names() {
        assert_eq!(role_name(MessageRole::System), "system");
        assert_eq!(role_name(MessageRole::Assistant), "assistant");
    }
}
