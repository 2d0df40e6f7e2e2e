//! The enrichment pipeline.
//!
//! Given one incident, the pipeline extracts search keywords, hunts for
//! similar historical incidents, mines their notes for resolutions,
//! asks a language model for a briefing, and appends the composed
//! intelligence to the incident's work notes.

pub mod compose;
pub mod engine;
pub mod keywords;
pub mod prompt;
pub mod ranking;
pub mod resolutions;
pub mod search;
pub mod text;

pub use engine::{EngineOptions, EnrichmentEngine, EnrichmentOutcome};
pub use resolutions::{extract_resolutions, ResolutionRecord};
pub use search::SimilarIncidentSearch;
