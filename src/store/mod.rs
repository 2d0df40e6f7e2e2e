pub mod memory;
pub mod query;
pub mod table_api;

pub use memory::InMemoryStore;
pub use query::{Condition, Field, Query};
pub use table_api::TableApiStore;

use crate::error::Result;
use crate::models::Incident;
use async_trait::async_trait;

/// Trait for incident store operations.
///
/// The enrichment engine only ever reads records and appends work notes;
/// record creation and deletion stay with the upstream system.
#[async_trait]
pub trait IncidentStore: Send + Sync {
    /// Fetch an incident by sys_id
    async fn get_incident(&self, sys_id: &str) -> Result<Incident>;

    /// Look up an incident by its human-readable number
    async fn find_by_number(&self, number: &str) -> Result<Option<Incident>>;

    /// Run a query, returning at most `limit` records
    async fn query(&self, query: &Query, limit: usize) -> Result<Vec<Incident>>;

    /// Append text to an incident's work notes
    async fn append_work_notes(&self, sys_id: &str, text: &str) -> Result<()>;
}
