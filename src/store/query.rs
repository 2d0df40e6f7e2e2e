//! Structured incident queries.
//!
//! Callers build a [`Query`] as a conjunction of OR-groups over typed
//! fields. The Table API's encoded-query dialect is produced only at the
//! store boundary via [`Query::to_encoded`]; the same predicate can be
//! evaluated in-process against an [`Incident`], which is what the
//! in-memory store does.

use crate::models::Incident;
use strum::Display;

/// Queryable incident fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Field {
    Category,
    ShortDescription,
    CmdbCi,
    State,
    SysId,
    Number,
}

impl Field {
    fn value_of<'a>(&self, incident: &'a Incident) -> &'a str {
        match self {
            Field::Category => &incident.category,
            Field::ShortDescription => &incident.short_description,
            Field::CmdbCi => &incident.cmdb_ci,
            Field::State => incident.state.code(),
            Field::SysId => &incident.sys_id,
            Field::Number => &incident.number,
        }
    }
}

/// A single field comparison
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// Field equals value
    Eq(Field, String),
    /// Field does not equal value
    Ne(Field, String),
    /// Field contains value, case-insensitive
    Like(Field, String),
}

impl Condition {
    pub fn eq(field: Field, value: impl Into<String>) -> Self {
        Condition::Eq(field, value.into())
    }

    pub fn ne(field: Field, value: impl Into<String>) -> Self {
        Condition::Ne(field, value.into())
    }

    pub fn like(field: Field, value: impl Into<String>) -> Self {
        Condition::Like(field, value.into())
    }

    fn encode(&self) -> String {
        match self {
            Condition::Eq(field, value) => format!("{}={}", field, value),
            Condition::Ne(field, value) => format!("{}!={}", field, value),
            Condition::Like(field, value) => format!("{}LIKE{}", field, value),
        }
    }

    fn matches(&self, incident: &Incident) -> bool {
        match self {
            Condition::Eq(field, value) => field.value_of(incident) == value,
            Condition::Ne(field, value) => field.value_of(incident) != value,
            Condition::Like(field, value) => field
                .value_of(incident)
                .to_lowercase()
                .contains(&value.to_lowercase()),
        }
    }
}

/// A conjunction of OR-groups: every group must have at least one
/// satisfied condition
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    groups: Vec<Vec<Condition>>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// AND a single condition
    pub fn and(mut self, condition: Condition) -> Self {
        self.groups.push(vec![condition]);
        self
    }

    /// AND a group of alternatives; empty groups are dropped
    pub fn and_any(mut self, conditions: Vec<Condition>) -> Self {
        if !conditions.is_empty() {
            self.groups.push(conditions);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Render the Table API encoded-query dialect: groups joined with `^`,
    /// alternatives within a group joined with `^OR`
    pub fn to_encoded(&self) -> String {
        let mut encoded = String::new();
        for group in &self.groups {
            for (position, condition) in group.iter().enumerate() {
                if !encoded.is_empty() {
                    encoded.push_str(if position == 0 { "^" } else { "^OR" });
                }
                encoded.push_str(&condition.encode());
            }
        }
        encoded
    }

    /// Evaluate the predicate against an in-process record
    pub fn matches(&self, incident: &Incident) -> bool {
        self.groups
            .iter()
            .all(|group| group.iter().any(|condition| condition.matches(incident)))
    }
}
