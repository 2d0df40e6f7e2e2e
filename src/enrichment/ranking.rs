//! Relevance ranking for similar-incident candidates.
//!
//! Scores are word-set Jaccard similarity over the combined description
//! text, with small boosts for a matching category and for candidates
//! that actually carry notes worth mining. Scores are only ever compared
//! against each other, so values above 1.0 are fine.

use crate::models::Incident;
use std::collections::HashSet;

/// Ranking kicks in only when the candidate pool exceeds this size
const RANK_TRIGGER_POOL: usize = 10;

/// How many candidates survive a ranking pass
const RANKED_KEEP: usize = 10;

const CATEGORY_BOOST: f64 = 0.2;
const NOTES_BOOST: f64 = 0.1;

/// Jaccard similarity of the lowercase word sets of two texts.
/// Returns 0.0 when both are empty.
pub fn jaccard_similarity(a: &str, b: &str) -> f64 {
    let a_lower = a.to_lowercase();
    let b_lower = b.to_lowercase();
    let words_a: HashSet<_> = a_lower.split_whitespace().collect();
    let words_b: HashSet<_> = b_lower.split_whitespace().collect();

    let union = words_a.union(&words_b).count();
    if union == 0 {
        return 0.0;
    }

    let intersection = words_a.intersection(&words_b).count();
    intersection as f64 / union as f64
}

/// Relevance of `candidate` with respect to `current`. Category equality
/// is literal, so two empty categories also count as a match.
pub fn relevance_score(current: &Incident, candidate: &Incident) -> f64 {
    let mut score = jaccard_similarity(&current.searchable_text(), &candidate.searchable_text());

    if current.category == candidate.category {
        score += CATEGORY_BOOST;
    }
    if candidate.has_notes() {
        score += NOTES_BOOST;
    }

    score
}

/// Sort candidates by descending relevance. The sort is stable, so
/// equally scored candidates keep their pool order.
pub fn rank_by_relevance(current: &Incident, pool: Vec<Incident>) -> Vec<Incident> {
    let mut scored: Vec<(Incident, f64)> = pool
        .into_iter()
        .map(|candidate| {
            let score = relevance_score(current, &candidate);
            (candidate, score)
        })
        .collect();

    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.into_iter().map(|(candidate, _)| candidate).collect()
}

/// Small pools keep their union order; larger pools are ranked and cut
/// back to the top [`RANKED_KEEP`]
pub fn apply_ranking_policy(current: &Incident, pool: Vec<Incident>) -> Vec<Incident> {
    if pool.len() <= RANK_TRIGGER_POOL {
        return pool;
    }

    let mut ranked = rank_by_relevance(current, pool);
    ranked.truncate(RANKED_KEEP);
    ranked
}
