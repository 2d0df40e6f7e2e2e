//! Prompt assembly for the analysis model.

use crate::enrichment::resolutions::ResolutionRecord;
use crate::enrichment::text::truncate_chars;
use crate::models::Incident;

/// Persona and ground rules sent as the system message
pub const SYSTEM_PROMPT: &str = "You are an experienced IT incident analyst. \
You study a new incident together with similar historical incidents and the \
resolutions that closed them, then produce a concise, actionable briefing for \
the engineer picking up the ticket. Ground every statement in the material \
provided. If the historical records do not support a conclusion, say so \
rather than guessing.";

/// Build the user message for one enrichment run.
pub fn build_analysis_prompt(
    incident: &Incident,
    similar: &[Incident],
    resolutions: &[ResolutionRecord],
) -> String {
    let mut prompt = String::new();

    prompt.push_str("NEW INCIDENT\n");
    prompt.push_str(&format!("Number: {}\n", incident.number));
    prompt.push_str(&format!("Short description: {}\n", incident.short_description));
    if !incident.description.is_empty() {
        prompt.push_str(&format!("Description: {}\n", incident.description));
    }
    if !incident.category.is_empty() {
        prompt.push_str(&format!("Category: {}\n", incident.category));
    }
    if !incident.cmdb_ci.is_empty() {
        prompt.push_str(&format!("Configuration item: {}\n", incident.cmdb_ci));
    }

    if similar.is_empty() {
        prompt.push_str("\nNo similar historical incidents were found.\n");
    } else {
        prompt.push_str(&format!(
            "\nSIMILAR HISTORICAL INCIDENTS ({} found)\n",
            similar.len()
        ));
        for candidate in similar {
            prompt.push_str(&format!(
                "- {}: {}\n",
                candidate.number,
                truncate_chars(&candidate.short_description, 80)
            ));
        }
    }

    if !resolutions.is_empty() {
        prompt.push_str("\nRESOLUTIONS THAT CLOSED THEM\n");
        for record in resolutions {
            prompt.push_str(&format!("Incident {}:\n", record.number));
            if let Some(resolution) = &record.resolution {
                prompt.push_str(&format!("  Resolution: {}\n", resolution));
            }
            if let Some(workaround) = &record.workaround {
                prompt.push_str(&format!("  Workaround: {}\n", workaround));
            }
            if let Some(root_cause) = &record.root_cause {
                prompt.push_str(&format!("  Root cause: {}\n", root_cause));
            }
        }
    }

    prompt.push_str(
        "\nProduce a briefing with these sections:\n\
         1. LIKELY CAUSE: the most probable root cause given the history.\n\
         2. RECOMMENDED ACTIONS: concrete steps in the order to try them.\n\
         3. IMMEDIATE WORKAROUND: how to restore service while the fix lands, if the history shows one.\n\
         4. CONFIDENCE: High, Medium, or Low, with one sentence of justification.\n",
    );

    prompt
}
