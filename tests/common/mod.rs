//! Common test utilities for the enrichment pipeline tests.
//!
//! Provides incident fixtures and a scripted language model so the full
//! pipeline can run against the in-memory store without any network.

use async_trait::async_trait;
use incident_intel::error::{AppError, Result};
use incident_intel::llm::{CompletionRequest, LanguageModel};
use incident_intel::models::{Incident, IncidentState};
use std::sync::Mutex;

/// Build a resolved historical incident with close notes
pub fn resolved_incident(
    number: &str,
    short_description: &str,
    category: &str,
    close_notes: &str,
) -> Incident {
    let mut incident = Incident::new(number, short_description, "", category);
    incident.state = IncidentState::Resolved;
    incident.close_notes = close_notes.to_string();
    incident
}

/// Language model stub that records every prompt it receives
pub struct ScriptedModel {
    reply: Option<String>,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    /// Answer every completion with the given text
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Fail every completion with an upstream error
    pub fn failing() -> Self {
        Self {
            reply: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn recorded_prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        self.prompts.lock().unwrap().push(request.user.clone());
        match &self.reply {
            Some(reply) => Ok(reply.clone()),
            None => Err(AppError::Upstream {
                source_name: "model".to_string(),
                status: 503,
                body: "model offline".to_string(),
            }),
        }
    }
}
