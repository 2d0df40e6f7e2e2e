use crate::error::{AppError, Result};
use crate::models::Incident;
use crate::store::{IncidentStore, Query};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// In-memory incident store for tests and local runs.
///
/// Backed by a DashMap keyed on sys_id, with a separate insertion log so
/// that scans return records in a stable order.
#[derive(Clone)]
pub struct InMemoryStore {
    incidents: Arc<DashMap<String, Incident>>,
    insertion_order: Arc<Mutex<Vec<String>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            incidents: Arc::new(DashMap::new()),
            insertion_order: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Seed a record. Not part of [`IncidentStore`]: the enrichment engine
    /// never creates incidents, but fixtures and local runs need to.
    pub async fn insert(&self, incident: Incident) {
        let sys_id = incident.sys_id.clone();
        if self.incidents.insert(sys_id.clone(), incident).is_none() {
            self.insertion_order.lock().await.push(sys_id);
        }
    }

    pub fn len(&self) -> usize {
        self.incidents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.incidents.is_empty()
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IncidentStore for InMemoryStore {
    async fn get_incident(&self, sys_id: &str) -> Result<Incident> {
        self.incidents
            .get(sys_id)
            .map(|entry| entry.clone())
            .ok_or_else(|| AppError::NotFound(format!("Incident {} not found", sys_id)))
    }

    async fn find_by_number(&self, number: &str) -> Result<Option<Incident>> {
        let order = self.insertion_order.lock().await;
        for sys_id in order.iter() {
            if let Some(entry) = self.incidents.get(sys_id) {
                if entry.number == number {
                    return Ok(Some(entry.clone()));
                }
            }
        }
        Ok(None)
    }

    async fn query(&self, query: &Query, limit: usize) -> Result<Vec<Incident>> {
        let order = self.insertion_order.lock().await;
        let mut matches = Vec::new();

        for sys_id in order.iter() {
            if matches.len() >= limit {
                break;
            }
            if let Some(entry) = self.incidents.get(sys_id) {
                if query.matches(&entry) {
                    matches.push(entry.clone());
                }
            }
        }

        Ok(matches)
    }

    async fn append_work_notes(&self, sys_id: &str, text: &str) -> Result<()> {
        let mut entry = self
            .incidents
            .get_mut(sys_id)
            .ok_or_else(|| AppError::NotFound(format!("Incident {} not found", sys_id)))?;

        if entry.work_notes.is_empty() {
            entry.work_notes = text.to_string();
        } else {
            entry.work_notes.push('\n');
            entry.work_notes.push_str(text);
        }

        Ok(())
    }
}
