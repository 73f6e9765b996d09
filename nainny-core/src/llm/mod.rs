//! Generative text model interface used by the adaptive rewriter.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Sampling options for a single generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMConfig {
    /// Temperature for generation (0.0-2.0). Zero keeps output repeatable.
    pub temperature: f32,

    /// Maximum tokens to generate
    pub max_tokens: usize,

    pub system_prompt: Option<String>,
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            temperature: 0.0,
            max_tokens: 256,
            system_prompt: None,
        }
    }
}

impl LLMConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature.clamp(0.0, 2.0);
        self
    }

    pub fn with_max_tokens(mut self, tokens: usize) -> Self {
        self.max_tokens = tokens;
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }
}

/// Message role in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

/// Request to an LLM provider
#[derive(Debug, Clone)]
pub struct LLMRequest {
    pub messages: Vec<Message>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<usize>,
    pub stop_sequences: Vec<String>,
}

impl LLMRequest {
    /// A single user message with the given sampling options.
    pub fn from_prompt(prompt: impl Into<String>, config: &LLMConfig) -> Self {
        let mut messages = Vec::new();
        if let Some(system) = &config.system_prompt {
            messages.push(Message {
                role: MessageRole::System,
                content: system.clone(),
            });
        }
        messages.push(Message {
            role: MessageRole::User,
            content: prompt.into(),
        });

        Self {
            messages,
            temperature: Some(config.temperature),
            max_tokens: Some(config.max_tokens),
            stop_sequences: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LLMResponse {
    pub content: String,
    pub usage: Option<TokenUsage>,
}

#[derive(Debug, Clone)]
pub struct TokenUsage {
    pub prompt_tokens: usize,
    pub completion_tokens: usize,
    pub total_tokens: usize,
}

/// A generative text model.
///
/// Implementors provide at least one of `generate` or `generate_request`;
/// each default delegates to the other.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Generate text for a prompt, bounded by `config.max_tokens`.
    async fn generate(&self, prompt: &str, config: &LLMConfig) -> Result<String> {
        let response = self
            .generate_request(&LLMRequest::from_prompt(prompt, config))
            .await?;
        Ok(response.content)
    }

    async fn generate_request(&self, request: &LLMRequest) -> Result<LLMResponse> {
        let prompt = request
            .messages
            .iter()
            .filter(|m| m.role != MessageRole::System)
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        let config = LLMConfig {
            temperature: request.temperature.unwrap_or(0.0),
            max_tokens: request.max_tokens.unwrap_or(256),
            system_prompt: request
                .messages
                .iter()
                .find(|m| m.role == MessageRole::System)
                .map(|m| m.content.clone()),
        };

        let content = self.generate(&prompt, &config).await?;
        Ok(LLMResponse {
            content,
            usage: None,
        })
    }

    fn model_info(&self) -> ModelInfo {
        ModelInfo {
            provider: "unknown".to_string(),
            model_name: "unknown".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ModelInfo {
    pub provider: String,
    pub model_name: String,
}

pub mod factory;
pub mod providers;

pub use factory::LLMProviderFactory;
