//! Resolution intelligence mining.
//!
//! Scans the notes of similar incidents for resolution, workaround, and
//! root-cause markers. For each field the FIRST note containing one of
//! its markers wins; within a note, markers are tried in priority order
//! rather than by position. Close notes are consulted before work notes.

use crate::enrichment::text::{find_lowercase, tail_chars, truncate_chars, window_chars};
use crate::models::Incident;
use serde::Serialize;

/// Markers announcing a resolution, in priority order
const RESOLUTION_MARKERS: [&str; 5] = [
    "resolution:",
    "resolved by",
    "fix:",
    "fixed by",
    "solution:",
];

/// Markers announcing a workaround
const WORKAROUND_MARKERS: [&str; 3] = ["workaround:", "temporary fix", "interim solution"];

/// Markers announcing a root cause
const ROOT_CAUSE_MARKERS: [&str; 3] = ["root cause:", "caused by", "issue was"];

/// Span captured from a marker position onward
const SNIPPET_CHARS: usize = 200;

/// When no marker is found, fall back to this much of the work-notes tail
const FALLBACK_TAIL_CHARS: usize = 300;

/// Short-description length kept on each record
const SUMMARY_CHARS: usize = 100;

/// At most this many records are extracted
const MAX_RECORDS: usize = 5;

/// Mined resolution intelligence for one similar incident
#[derive(Debug, Clone, Serialize)]
pub struct ResolutionRecord {
    pub number: String,
    pub short_description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workaround: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_cause: Option<String>,
}

/// Mine resolution intelligence from a list of candidates, preserving
/// their order. Candidates without a resolution or workaround are
/// dropped; at most [`MAX_RECORDS`] records are returned.
pub fn extract_resolutions(candidates: &[Incident]) -> Vec<ResolutionRecord> {
    let mut records = Vec::new();

    for candidate in candidates {
        if records.len() >= MAX_RECORDS {
            break;
        }

        let notes: Vec<&str> = [candidate.close_notes.as_str(), candidate.work_notes.as_str()]
            .into_iter()
            .filter(|note| !note.is_empty())
            .collect();

        let mut resolution = first_marker_snippet(&notes, &RESOLUTION_MARKERS);
        let workaround = first_marker_snippet(&notes, &WORKAROUND_MARKERS);
        let root_cause = first_marker_snippet(&notes, &ROOT_CAUSE_MARKERS);

        // No explicit resolution marker: the tail of the work notes is
        // the best guess at what was finally done
        if resolution.is_none() && !candidate.work_notes.is_empty() {
            let tail = tail_chars(&candidate.work_notes, FALLBACK_TAIL_CHARS).trim();
            if !tail.is_empty() {
                resolution = Some(tail.to_string());
            }
        }

        if resolution.is_some() || workaround.is_some() {
            records.push(ResolutionRecord {
                number: candidate.number.clone(),
                short_description: truncate_chars(&candidate.short_description, SUMMARY_CHARS)
                    .to_string(),
                resolution,
                workaround,
                root_cause,
            });
        }
    }

    records
}

/// First note+marker hit across the note list: notes are scanned in
/// order, and within each note the markers are tried in priority order
fn first_marker_snippet(notes: &[&str], markers: &[&str]) -> Option<String> {
    for note in notes {
        for marker in markers {
            if let Some(position) = find_lowercase(note, marker) {
                let snippet = window_chars(note, position, SNIPPET_CHARS).trim();
                return Some(snippet.to_string());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(number: &str, close_notes: &str, work_notes: &str) -> Incident {
        let mut incident = Incident::new(number, "Historic incident", "", "");
        incident.close_notes = close_notes.to_string();
        incident.work_notes = work_notes.to_string();
        incident
    }

    #[test]
    fn test_marker_priority_within_note() {
        let incidents = vec![candidate(
            "INC1",
            "investigated the bug. resolution: restart service X. fix: also check logs",
            "",
        )];

        let records = extract_resolutions(&incidents);
        assert_eq!(records.len(), 1);
        let resolution = records[0].resolution.as_deref().unwrap();
        assert!(resolution.starts_with("resolution: restart service X"));
    }

    #[test]
    fn test_priority_order_beats_position() {
        // "fix:" appears first in the text, but "resolution:" outranks it
        let incidents = vec![candidate(
            "INC1",
            "fix: restarted. later found resolution: replaced the cable",
            "",
        )];

        let records = extract_resolutions(&incidents);
        let resolution = records[0].resolution.as_deref().unwrap();
        assert!(resolution.starts_with("resolution: replaced the cable"));
    }

    #[test]
    fn test_fields_extract_independently() {
        let incidents = vec![candidate(
            "INC1",
            "Root cause: faulty cable. Workaround: reroute traffic. Resolution: replaced cable.",
            "",
        )];

        let records = extract_resolutions(&incidents);
        let record = &records[0];
        assert!(record.resolution.as_deref().unwrap().starts_with("Resolution: replaced cable"));
        assert!(record.workaround.as_deref().unwrap().starts_with("Workaround: reroute traffic"));
        assert!(record.root_cause.as_deref().unwrap().starts_with("Root cause: faulty cable"));
    }

    #[test]
    fn test_first_note_wins_over_later_notes() {
        let incidents = vec![candidate(
            "INC1",
            "resolution: from close notes",
            "resolution: from work notes",
        )];

        let records = extract_resolutions(&incidents);
        let resolution = records[0].resolution.as_deref().unwrap();
        assert_eq!(resolution, "resolution: from close notes");
    }

    #[test]
    fn test_later_note_fills_missing_field() {
        let incidents = vec![candidate(
            "INC1",
            "resolution: restarted the pool",
            "workaround: use the standby node",
        )];

        let records = extract_resolutions(&incidents);
        let record = &records[0];
        assert_eq!(record.resolution.as_deref(), Some("resolution: restarted the pool"));
        assert_eq!(record.workaround.as_deref(), Some("workaround: use the standby node"));
    }

    #[test]
    fn test_work_notes_tail_fallback() {
        let filler = "x".repeat(400);
        let notes = format!("{} finally rebooted the appliance", filler);
        let incidents = vec![candidate("INC1", "", &notes)];

        let records = extract_resolutions(&incidents);
        let resolution = records[0].resolution.as_deref().unwrap();
        assert_eq!(resolution.chars().count(), FALLBACK_TAIL_CHARS);
        assert!(resolution.ends_with("finally rebooted the appliance"));
    }

    #[test]
    fn test_no_notes_excluded() {
        let incidents = vec![
            candidate("INC1", "", ""),
            candidate("INC2", "resolution: patched", ""),
        ];

        let records = extract_resolutions(&incidents);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].number, "INC2");
    }

    #[test]
    fn test_whitespace_only_work_notes_excluded() {
        let incidents = vec![candidate("INC1", "", "   \n  \t ")];
        assert!(extract_resolutions(&incidents).is_empty());
    }

    #[test]
    fn test_markerless_close_notes_only_excluded() {
        // Close notes without markers and no work notes to fall back on
        let incidents = vec![candidate("INC1", "spoke with the user, all fine now", "")];
        assert!(extract_resolutions(&incidents).is_empty());
    }

    #[test]
    fn test_root_cause_alone_does_not_keep_record() {
        let incidents = vec![candidate("INC1", "root cause: bad firmware", "")];
        assert!(extract_resolutions(&incidents).is_empty());
    }

    #[test]
    fn test_snippet_capped_at_200_chars() {
        let long_tail = "y".repeat(400);
        let note = format!("resolution: {}", long_tail);
        let incidents = vec![candidate("INC1", &note, "")];

        let records = extract_resolutions(&incidents);
        let resolution = records[0].resolution.as_deref().unwrap();
        assert_eq!(resolution.chars().count(), SNIPPET_CHARS);
    }

    #[test]
    fn test_capped_at_five_records() {
        let incidents: Vec<Incident> = (0..8)
            .map(|index| candidate(&format!("INC{}", index), "resolution: done", ""))
            .collect();

        let records = extract_resolutions(&incidents);
        assert_eq!(records.len(), MAX_RECORDS);
        assert_eq!(records[0].number, "INC0");
        assert_eq!(records[4].number, "INC4");
    }

    #[test]
    fn test_multibyte_notes_do_not_panic() {
        let incidents = vec![candidate(
            "INC1",
            "確認済み ✓ Resolution: ケーブルを交換した",
            "",
        )];

        let records = extract_resolutions(&incidents);
        let resolution = records[0].resolution.as_deref().unwrap();
        assert!(resolution.starts_with("Resolution: ケーブル"));
    }

    #[test]
    fn test_short_description_truncated() {
        let mut incident = candidate("INC1", "resolution: done", "");
        incident.short_description = "d".repeat(150);

        let records = extract_resolutions(&[incident]);
        assert_eq!(records[0].short_description.chars().count(), SUMMARY_CHARS);
    }
}
