pub mod groq;

pub use groq::GroqClient;

use crate::error::Result;
use async_trait::async_trait;

/// A single chat completion request: system framing plus user content
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Trait for language-model providers
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Run a completion and return the assistant's text
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;
}
