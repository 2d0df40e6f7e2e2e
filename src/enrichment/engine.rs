//! Enrichment orchestration.
//!
//! Ties the pipeline together: fetch the incident, find similar
//! historical incidents, mine their resolutions, ask the model for a
//! narrative, and write the composed note back to the record. The whole
//! run is bounded by a single wall-clock deadline.

use crate::config::Config;
use crate::enrichment::compose::compose_work_note;
use crate::enrichment::prompt::{build_analysis_prompt, SYSTEM_PROMPT};
use crate::enrichment::resolutions::{extract_resolutions, ResolutionRecord};
use crate::enrichment::search::SimilarIncidentSearch;
use crate::error::{AppError, Result};
use crate::llm::{CompletionRequest, LanguageModel};
use crate::models::Incident;
use crate::store::IncidentStore;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Tunables for one engine instance
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Wall-clock budget for a full enrichment run
    pub deadline: Duration,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            deadline: Duration::from_secs(60),
            temperature: 0.5,
            max_tokens: 2000,
        }
    }
}

impl EngineOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            deadline: Duration::from_secs(config.enrichment.deadline_secs),
            temperature: config.model.temperature,
            max_tokens: config.model.max_tokens,
        }
    }
}

/// Summary of one completed enrichment run
#[derive(Debug, Clone, Serialize)]
pub struct EnrichmentOutcome {
    pub incident_number: String,
    pub similar_found: usize,
    pub resolutions_extracted: usize,
    pub enriched_at: DateTime<Utc>,
    /// The full note that was appended, for callers that display it
    #[serde(skip)]
    pub work_note: String,
}

/// Runs the full enrichment pipeline against a store and a model
pub struct EnrichmentEngine {
    store: Arc<dyn IncidentStore>,
    model: Arc<dyn LanguageModel>,
    search: SimilarIncidentSearch,
    options: EngineOptions,
}

impl EnrichmentEngine {
    pub fn new(
        store: Arc<dyn IncidentStore>,
        model: Arc<dyn LanguageModel>,
        options: EngineOptions,
    ) -> Self {
        let search = SimilarIncidentSearch::new(Arc::clone(&store));
        Self {
            store,
            model,
            search,
            options,
        }
    }

    /// Enrich the incident with the given sys_id
    pub async fn enrich_by_sys_id(&self, sys_id: &str) -> Result<EnrichmentOutcome> {
        let sys_id = sys_id.trim();
        if sys_id.is_empty() {
            return Err(AppError::Validation(
                "incident sys_id must not be empty".to_string(),
            ));
        }

        self.with_deadline(async {
            let incident = self.store.get_incident(sys_id).await?;
            self.run(incident).await
        })
        .await
    }

    /// Enrich the incident with the given number, e.g. INC0012345
    pub async fn enrich_by_number(&self, number: &str) -> Result<EnrichmentOutcome> {
        let number = number.trim();
        if number.is_empty() {
            return Err(AppError::Validation(
                "incident number must not be empty".to_string(),
            ));
        }

        self.with_deadline(async {
            let incident = self
                .store
                .find_by_number(number)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Incident {} not found", number)))?;
            self.run(incident).await
        })
        .await
    }

    async fn with_deadline<F>(&self, work: F) -> Result<EnrichmentOutcome>
    where
        F: Future<Output = Result<EnrichmentOutcome>>,
    {
        match tokio::time::timeout(self.options.deadline, work).await {
            Ok(outcome) => outcome,
            Err(_) => Err(AppError::Timeout(format!(
                "enrichment did not finish within {}s",
                self.options.deadline.as_secs()
            ))),
        }
    }

    async fn run(&self, incident: Incident) -> Result<EnrichmentOutcome> {
        info!(number = %incident.number, "Starting enrichment");

        let similar = self.search.find_similar(&incident).await;
        let resolutions = extract_resolutions(&similar);
        info!(
            number = %incident.number,
            similar = similar.len(),
            resolutions = resolutions.len(),
            "Collected intelligence sources"
        );

        let analysis = self.analyze(&incident, &similar, &resolutions).await;

        let enriched_at = Utc::now();
        let work_note = compose_work_note(&analysis, &similar, &resolutions, enriched_at);
        self.store
            .append_work_notes(&incident.sys_id, &work_note)
            .await?;

        info!(number = %incident.number, "Enrichment written back");
        Ok(EnrichmentOutcome {
            incident_number: incident.number,
            similar_found: similar.len(),
            resolutions_extracted: resolutions.len(),
            enriched_at,
            work_note,
        })
    }

    /// Ask the model for a narrative. A model failure degrades to a
    /// placeholder so the mined evidence still reaches the ticket.
    async fn analyze(
        &self,
        incident: &Incident,
        similar: &[Incident],
        resolutions: &[ResolutionRecord],
    ) -> String {
        let request = CompletionRequest {
            system: SYSTEM_PROMPT.to_string(),
            user: build_analysis_prompt(incident, similar, resolutions),
            temperature: self.options.temperature,
            max_tokens: self.options.max_tokens,
        };

        match self.model.complete(&request).await {
            Ok(analysis) => analysis,
            Err(error) => {
                warn!(number = %incident.number, %error, "Model analysis failed, continuing without it");
                format!(
                    "AI analysis unavailable: {}\n\nPlease review the similar incidents listed below manually.",
                    error
                )
            }
        }
    }
}
