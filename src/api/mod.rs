pub mod handlers;
pub mod routes;

pub use routes::*;

use crate::enrichment::EnrichmentEngine;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<EnrichmentEngine>,
}

impl AppState {
    pub fn new(engine: Arc<EnrichmentEngine>) -> Self {
        Self { engine }
    }
}
