//! AI-assisted incident enrichment.
//!
//! Looks up similar historical incidents for a target incident, mines their
//! resolution text, asks a language model for guidance, and writes the
//! composed analysis back to the incident's work notes.

pub mod api;
pub mod config;
pub mod enrichment;
pub mod error;
pub mod llm;
pub mod models;
pub mod store;

pub use error::{AppError, Result};
