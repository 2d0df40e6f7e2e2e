//! Work-note composition.
//!
//! Renders the model narrative plus the mined evidence into the plain
//! text block appended to the incident's work notes.

use crate::enrichment::resolutions::ResolutionRecord;
use crate::enrichment::text::truncate_chars;
use crate::models::Incident;
use chrono::{DateTime, Utc};

const HEADER: &str = "=== AI INCIDENT INTELLIGENCE ===";
const FOOTER: &str = "=== END AI INTELLIGENCE ===";

/// Short-description length used in the similar-incident bullets
const BULLET_CHARS: usize = 70;

/// Confidence is High once at least this many resolution records were mined
const HIGH_CONFIDENCE_RESOLUTIONS: usize = 2;

/// Render the final work note.
pub fn compose_work_note(
    analysis: &str,
    similar: &[Incident],
    resolutions: &[ResolutionRecord],
    enriched_at: DateTime<Utc>,
) -> String {
    let mut note = String::new();

    note.push_str(HEADER);
    note.push('\n');
    note.push_str(&format!(
        "Generated: {} UTC\n\n",
        enriched_at.format("%Y-%m-%d %H:%M:%S")
    ));

    note.push_str(analysis.trim_end());
    note.push_str("\n\n");

    note.push_str("--- INTELLIGENCE SOURCES ---\n");
    note.push_str(&format!("Similar incidents analyzed: {}\n", similar.len()));
    note.push_str(&format!(
        "Resolution records extracted: {}\n",
        resolutions.len()
    ));
    note.push_str(&format!("Confidence level: {}\n", confidence(resolutions)));

    if !similar.is_empty() {
        note.push_str("\n--- SIMILAR INCIDENTS ---\n");
        for candidate in similar {
            note.push_str(&format!(
                "- {}: {}\n",
                candidate.number,
                truncate_chars(&candidate.short_description, BULLET_CHARS)
            ));
        }
    }

    note.push('\n');
    note.push_str(FOOTER);
    note
}

/// High once two or more resolution records were mined, Moderate
/// otherwise. Workaround-only records count; they are still usable
/// intelligence.
fn confidence(resolutions: &[ResolutionRecord]) -> &'static str {
    if resolutions.len() >= HIGH_CONFIDENCE_RESOLUTIONS {
        "High"
    } else {
        "Moderate"
    }
}
