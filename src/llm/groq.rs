use crate::config::ModelConfig;
use crate::error::{AppError, Result};
use crate::llm::{CompletionRequest, LanguageModel};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Chat-completions client for Groq's OpenAI-compatible API
#[derive(Clone, Debug)]
pub struct GroqClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: String,
}

impl GroqClient {
    /// Create a model client with an explicit API key
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self> {
        let base_url = base_url.into();
        let api_key = api_key.into();
        let model = model.into();

        if base_url.is_empty() {
            return Err(AppError::Configuration(
                "model.base_url is not set".to_string(),
            ));
        }
        if api_key.is_empty() {
            return Err(AppError::Configuration("model API key is empty".to_string()));
        }
        if model.is_empty() {
            return Err(AppError::Configuration("model.model is not set".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model,
        })
    }

    /// Create a model client from configuration, resolving the API key
    /// from the environment variable the config names
    pub fn from_config(config: &ModelConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env).map_err(|_| {
            AppError::Configuration(format!(
                "Environment variable {} is not set",
                config.api_key_env
            ))
        })?;

        Self::new(
            config.base_url.clone(),
            api_key,
            config.model.clone(),
            config.request_timeout_secs,
        )
    }
}

#[async_trait]
impl LanguageModel for GroqClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let payload = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        debug!(model = %self.model, user_chars = request.user.len(), "Model request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await.unwrap_or_else(|_| String::new());

        if !status.is_success() {
            return Err(AppError::Upstream {
                source_name: "model".to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatCompletionResponse = serde_json::from_str(&body)?;
        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| AppError::Internal("Model response contained no choices".to_string()))
    }
}
