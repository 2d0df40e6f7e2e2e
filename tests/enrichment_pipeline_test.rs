mod common;

use common::{resolved_incident, ScriptedModel};
use incident_intel::enrichment::{extract_resolutions, EngineOptions, EnrichmentEngine};
use incident_intel::models::Incident;
use incident_intel::store::{IncidentStore, InMemoryStore};
use std::sync::Arc;

/// The new incident under investigation
fn probe_incident() -> Incident {
    let mut incident = Incident::new(
        "INC0100",
        "Connection timeout error ERW001",
        "Users cannot reach the payment service",
        "network",
    );
    incident.cmdb_ci = "router-1".to_string();
    incident
}

/// A resolved incident on the same category and configuration item
fn matching_incident() -> Incident {
    let mut incident = resolved_incident(
        "INC0002",
        "Connection timeout on edge router",
        "network",
        "Root cause: faulty cable. Resolution: replaced cable, ticket closed.",
    );
    incident.cmdb_ci = "router-1".to_string();
    incident
}

/// A resolved incident that shares nothing with the probe
fn unrelated_incident() -> Incident {
    let mut incident = resolved_incident(
        "INC0003",
        "Printer toner low",
        "hardware",
        "Resolution: replaced toner cartridge",
    );
    incident.cmdb_ci = "printer-7".to_string();
    incident
}

async fn seeded_store() -> (Arc<InMemoryStore>, Incident) {
    let store = Arc::new(InMemoryStore::new());
    let probe = probe_incident();
    store.insert(probe.clone()).await;
    store.insert(matching_incident()).await;
    store.insert(unrelated_incident()).await;
    (store, probe)
}

/// Full pipeline: search, mining, analysis, and write-back
#[tokio::test]
async fn test_pipeline_enriches_and_writes_back() {
    let (store, probe) = seeded_store().await;
    let model = Arc::new(ScriptedModel::replying("LIKELY CAUSE: faulty cable."));
    let engine = EnrichmentEngine::new(store.clone(), model, EngineOptions::default());

    let outcome = engine.enrich_by_number("INC0100").await.unwrap();

    assert_eq!(outcome.incident_number, "INC0100");
    assert_eq!(outcome.similar_found, 1);
    assert_eq!(outcome.resolutions_extracted, 1);

    let updated = store.get_incident(&probe.sys_id).await.unwrap();
    assert!(updated.work_notes.contains("=== AI INCIDENT INTELLIGENCE ==="));
    assert!(updated.work_notes.contains("LIKELY CAUSE: faulty cable."));
    assert!(updated.work_notes.contains("Similar incidents analyzed: 1"));
    assert!(updated.work_notes.contains("- INC0002:"));
    assert!(!updated.work_notes.contains("INC0003"));
    assert!(updated.work_notes.ends_with("=== END AI INTELLIGENCE ==="));
}

/// The model prompt must carry the mined evidence, not just the incident
#[tokio::test]
async fn test_prompt_carries_mined_evidence() {
    let (store, _probe) = seeded_store().await;
    let model = Arc::new(ScriptedModel::replying("briefing"));
    let engine = EnrichmentEngine::new(store, model.clone(), EngineOptions::default());

    engine.enrich_by_number("INC0100").await.unwrap();

    let prompts = model.recorded_prompts();
    assert_eq!(prompts.len(), 1);
    let prompt = &prompts[0];
    assert!(prompt.contains("Number: INC0100"));
    assert!(prompt.contains("SIMILAR HISTORICAL INCIDENTS (1 found)"));
    assert!(prompt.contains("- INC0002: Connection timeout on edge router"));
    assert!(prompt.contains("faulty cable"));
    assert!(prompt.contains("replaced cable"));
}

/// Resolution mining pulls apart the combined close-note fixture
#[tokio::test]
async fn test_resolution_mining_splits_note_fields() {
    let records = extract_resolutions(&[matching_incident()]);

    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.number, "INC0002");
    assert!(record.root_cause.as_deref().unwrap().contains("faulty cable"));
    assert!(record.resolution.as_deref().unwrap().contains("replaced cable"));
    assert!(record.workaround.is_none());
}

/// A model outage degrades the narrative but the evidence still lands
#[tokio::test]
async fn test_model_failure_still_writes_evidence() {
    let (store, probe) = seeded_store().await;
    let model = Arc::new(ScriptedModel::failing());
    let engine = EnrichmentEngine::new(store.clone(), model, EngineOptions::default());

    let outcome = engine.enrich_by_number("INC0100").await.unwrap();
    assert_eq!(outcome.similar_found, 1);

    let updated = store.get_incident(&probe.sys_id).await.unwrap();
    assert!(updated.work_notes.contains("AI analysis unavailable:"));
    assert!(updated
        .work_notes
        .contains("Please review the similar incidents listed below manually."));
    assert!(updated.work_notes.contains("- INC0002:"));
}

/// Two mined resolutions push the confidence to High
#[tokio::test]
async fn test_confidence_high_with_two_resolutions() {
    let store = Arc::new(InMemoryStore::new());
    let probe = probe_incident();
    store.insert(probe.clone()).await;
    store.insert(matching_incident()).await;
    store
        .insert(resolved_incident(
            "INC0004",
            "Connection drops on edge router",
            "network",
            "Resolution: reseated the line card",
        ))
        .await;

    let model = Arc::new(ScriptedModel::replying("briefing"));
    let engine = EnrichmentEngine::new(store.clone(), model, EngineOptions::default());

    let outcome = engine.enrich_by_number("INC0100").await.unwrap();
    assert_eq!(outcome.similar_found, 2);
    assert_eq!(outcome.resolutions_extracted, 2);

    let updated = store.get_incident(&probe.sys_id).await.unwrap();
    assert!(updated.work_notes.contains("Confidence level: High"));
}

/// With no overlapping history the pipeline still completes cleanly
#[tokio::test]
async fn test_no_similar_history_still_enriches() {
    let store = Arc::new(InMemoryStore::new());
    let probe = probe_incident();
    store.insert(probe.clone()).await;
    store.insert(unrelated_incident()).await;

    let model = Arc::new(ScriptedModel::replying("nothing on file"));
    let engine = EnrichmentEngine::new(store.clone(), model.clone(), EngineOptions::default());

    let outcome = engine.enrich_by_number("INC0100").await.unwrap();
    assert_eq!(outcome.similar_found, 0);
    assert_eq!(outcome.resolutions_extracted, 0);

    let prompts = model.recorded_prompts();
    assert!(prompts[0].contains("No similar historical incidents were found."));

    let updated = store.get_incident(&probe.sys_id).await.unwrap();
    assert!(updated.work_notes.contains("Similar incidents analyzed: 0"));
    assert!(!updated.work_notes.contains("--- SIMILAR INCIDENTS ---"));
}

/// The similar list is capped even when the history is rich
#[tokio::test]
async fn test_similar_capped_at_five() {
    let store = Arc::new(InMemoryStore::new());
    let probe = probe_incident();
    store.insert(probe.clone()).await;
    for index in 0..8 {
        store
            .insert(resolved_incident(
                &format!("INC020{}", index),
                "Router connectivity issue",
                "network",
                "Resolution: rebooted",
            ))
            .await;
    }

    let model = Arc::new(ScriptedModel::replying("briefing"));
    let engine = EnrichmentEngine::new(store.clone(), model, EngineOptions::default());

    let outcome = engine.enrich_by_number("INC0100").await.unwrap();
    assert_eq!(outcome.similar_found, 5);

    let updated = store.get_incident(&probe.sys_id).await.unwrap();
    let bullets = updated.work_notes.matches("- INC020").count();
    assert_eq!(bullets, 5);
}

/// Addressing by sys_id reaches the same pipeline
#[tokio::test]
async fn test_enrich_by_sys_id_path() {
    let (store, probe) = seeded_store().await;
    let model = Arc::new(ScriptedModel::replying("briefing"));
    let engine = EnrichmentEngine::new(store, model, EngineOptions::default());

    let outcome = engine.enrich_by_sys_id(&probe.sys_id).await.unwrap();
    assert_eq!(outcome.incident_number, "INC0100");
    assert!(outcome.work_note.contains("=== AI INCIDENT INTELLIGENCE ==="));
}
