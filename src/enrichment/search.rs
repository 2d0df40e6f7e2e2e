//! Multi-strategy similar-incident search.
//!
//! Three strategies run in order against the incident store, each gated
//! on the field it needs: same category, keyword match on the short
//! description, and same configuration item. Results are unioned with
//! deduplication by sys_id. A strategy that fails logs a warning and
//! contributes nothing; the others still run.

use crate::enrichment::keywords::extract_keywords;
use crate::enrichment::ranking::apply_ranking_policy;
use crate::models::{Incident, IncidentState};
use crate::store::{Condition, Field, IncidentStore, Query};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

const CATEGORY_LIMIT: usize = 10;
const KEYWORD_LIMIT: usize = 15;
const CONFIGURATION_ITEM_LIMIT: usize = 10;

/// Only the first keywords feed the keyword strategy
const KEYWORD_STRATEGY_TERMS: usize = 3;

/// Final size of the similar-incident set
pub const MAX_SIMILAR: usize = 5;

/// Finds resolved or closed incidents similar to a target incident
pub struct SimilarIncidentSearch {
    store: Arc<dyn IncidentStore>,
}

impl SimilarIncidentSearch {
    pub fn new(store: Arc<dyn IncidentStore>) -> Self {
        Self { store }
    }

    /// Run all applicable strategies and return at most [`MAX_SIMILAR`]
    /// candidates. Infallible: strategy errors are absorbed.
    pub async fn find_similar(&self, incident: &Incident) -> Vec<Incident> {
        let keywords = extract_keywords(&incident.searchable_text());
        debug!(
            incident = %incident.number,
            keywords = ?keywords,
            "Searching for similar incidents"
        );

        let mut pool: Vec<Incident> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        seen.insert(incident.sys_id.clone());

        if !incident.category.is_empty() {
            let query = category_query(incident);
            self.run_strategy("category", &query, CATEGORY_LIMIT, &mut pool, &mut seen)
                .await;
        }

        if !keywords.is_empty() {
            let query = keyword_query(incident, &keywords);
            self.run_strategy("keyword", &query, KEYWORD_LIMIT, &mut pool, &mut seen)
                .await;
        }

        if !incident.cmdb_ci.is_empty() {
            let query = configuration_item_query(incident);
            self.run_strategy(
                "configuration_item",
                &query,
                CONFIGURATION_ITEM_LIMIT,
                &mut pool,
                &mut seen,
            )
            .await;
        }

        debug!(pool_size = pool.len(), "Similar-incident pool assembled");

        let narrowed = apply_ranking_policy(incident, pool);
        narrowed.into_iter().take(MAX_SIMILAR).collect()
    }

    async fn run_strategy(
        &self,
        strategy: &str,
        query: &Query,
        limit: usize,
        pool: &mut Vec<Incident>,
        seen: &mut HashSet<String>,
    ) {
        match self.store.query(query, limit).await {
            Ok(results) => {
                debug!(strategy = strategy, results = results.len(), "Strategy completed");
                for result in results {
                    if seen.insert(result.sys_id.clone()) {
                        pool.push(result);
                    }
                }
            }
            Err(error) => {
                warn!(strategy = strategy, error = %error, "Search strategy failed");
            }
        }
    }
}

fn historical_states() -> Vec<Condition> {
    vec![
        Condition::eq(Field::State, IncidentState::Resolved.code()),
        Condition::eq(Field::State, IncidentState::Closed.code()),
    ]
}

fn category_query(incident: &Incident) -> Query {
    Query::new()
        .and(Condition::eq(Field::Category, incident.category.clone()))
        .and_any(historical_states())
        .and(Condition::ne(Field::SysId, incident.sys_id.clone()))
}

fn keyword_query(incident: &Incident, keywords: &[String]) -> Query {
    let alternatives = keywords
        .iter()
        .take(KEYWORD_STRATEGY_TERMS)
        .map(|keyword| Condition::like(Field::ShortDescription, keyword.clone()))
        .collect();

    Query::new()
        .and_any(alternatives)
        .and_any(historical_states())
        .and(Condition::ne(Field::SysId, incident.sys_id.clone()))
}

fn configuration_item_query(incident: &Incident) -> Query {
    Query::new()
        .and(Condition::eq(Field::CmdbCi, incident.cmdb_ci.clone()))
        .and_any(historical_states())
        .and(Condition::ne(Field::SysId, incident.sys_id.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;

    fn resolved(number: &str, short_description: &str, category: &str) -> Incident {
        let mut incident = Incident::new(number, short_description, "", category);
        incident.state = IncidentState::Resolved;
        incident
    }

    #[tokio::test]
    async fn test_no_strategy_applicable() {
        let store = Arc::new(InMemoryStore::new());
        store.insert(resolved("INC1", "db up ok", "network")).await;

        // No category, no configuration item, and text too plain to
        // yield keywords
        let probe = Incident::new("INC0", "db up", "ok no", "");
        let search = SimilarIncidentSearch::new(store);

        assert!(search.find_similar(&probe).await.is_empty());
    }

    #[tokio::test]
    async fn test_category_strategy_filters_state() {
        let store = Arc::new(InMemoryStore::new());
        store.insert(resolved("INC1", "switch rebooted", "network")).await;
        store
            .insert(Incident::new("INC2", "ongoing outage", "", "network"))
            .await;

        let probe = Incident::new("INC0", "db up", "ok no", "network");
        let search = SimilarIncidentSearch::new(store);

        let similar = search.find_similar(&probe).await;
        assert_eq!(similar.len(), 1);
        assert_eq!(similar[0].number, "INC1");
    }

    #[tokio::test]
    async fn test_keyword_strategy_matches_short_description() {
        let store = Arc::new(InMemoryStore::new());
        store
            .insert(resolved("INC1", "Recurring ERW001 on gateway", "hardware"))
            .await;
        store.insert(resolved("INC2", "Unrelated printer jam", "hardware")).await;

        let probe = Incident::new("INC0", "ERW001", "", "");
        let search = SimilarIncidentSearch::new(store);

        let similar = search.find_similar(&probe).await;
        assert_eq!(similar.len(), 1);
        assert_eq!(similar[0].number, "INC1");
    }

    #[tokio::test]
    async fn test_configuration_item_strategy() {
        let store = Arc::new(InMemoryStore::new());
        let mut historical = resolved("INC1", "disk replaced", "");
        historical.cmdb_ci = "db-cluster-01".to_string();
        store.insert(historical).await;

        let mut probe = Incident::new("INC0", "db up", "ok no", "");
        probe.cmdb_ci = "db-cluster-01".to_string();
        let search = SimilarIncidentSearch::new(store);

        let similar = search.find_similar(&probe).await;
        assert_eq!(similar.len(), 1);
        assert_eq!(similar[0].number, "INC1");
    }

    #[tokio::test]
    async fn test_strategies_deduplicate_by_sys_id() {
        let store = Arc::new(InMemoryStore::new());
        // Reachable via both the category and keyword strategies
        store
            .insert(resolved("INC1", "Recurring ERW001 on gateway", "network"))
            .await;

        let probe = Incident::new("INC0", "ERW001", "", "network");
        let search = SimilarIncidentSearch::new(store);

        let similar = search.find_similar(&probe).await;
        assert_eq!(similar.len(), 1);
    }

    #[tokio::test]
    async fn test_own_record_never_returned() {
        let store = Arc::new(InMemoryStore::new());
        let mut probe = Incident::new("INC0", "network outage", "", "network");
        probe.state = IncidentState::Resolved;
        store.insert(probe.clone()).await;
        store.insert(resolved("INC1", "network flap", "network")).await;

        let search = SimilarIncidentSearch::new(store);
        let similar = search.find_similar(&probe).await;

        assert!(similar.iter().all(|candidate| candidate.sys_id != probe.sys_id));
        assert_eq!(similar.len(), 1);
    }

    #[tokio::test]
    async fn test_final_set_capped_at_five() {
        let store = Arc::new(InMemoryStore::new());
        for index in 0..8 {
            store
                .insert(resolved(&format!("INC{}", index), "unrelated", "network"))
                .await;
        }

        let probe = Incident::new("INC99", "db up", "ok no", "network");
        let search = SimilarIncidentSearch::new(store);

        let similar = search.find_similar(&probe).await;
        assert_eq!(similar.len(), MAX_SIMILAR);
        // Pool of 8 never triggers ranking, so union order survives
        assert_eq!(similar[0].number, "INC0");
    }
}
