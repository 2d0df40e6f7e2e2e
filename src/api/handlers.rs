use crate::api::AppState;
use crate::error::Result;
use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Health check endpoint
pub async fn health_check() -> Result<Json<HealthResponse>> {
    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// Run the enrichment pipeline for one incident
pub async fn enrich_incident(
    State(state): State<AppState>,
    Json(request): Json<EnrichRequest>,
) -> Result<Json<EnrichResponse>> {
    request.validate()?;

    let outcome = state
        .engine
        .enrich_by_sys_id(&request.incident_sys_id)
        .await?;

    Ok(Json(EnrichResponse {
        status: "success".to_string(),
        incident_number: outcome.incident_number,
        similar_found: outcome.similar_found,
        resolutions_extracted: outcome.resolutions_extracted,
        enriched_at: outcome.enriched_at,
    }))
}

#[derive(Debug, Deserialize, Validate)]
pub struct EnrichRequest {
    #[validate(length(min = 1))]
    pub incident_sys_id: String,
}

#[derive(Debug, Serialize)]
pub struct EnrichResponse {
    pub status: String,
    pub incident_number: String,
    pub similar_found: usize,
    pub resolutions_extracted: usize,
    pub enriched_at: DateTime<Utc>,
}
