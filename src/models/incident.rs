use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum::{Display, EnumString};
use uuid::Uuid;

/// An incident record as stored in the incident table.
///
/// Field values arrive from the Table API as strings ("" when unset), with
/// reference fields sometimes expanded into `{link, value}` objects. The
/// deserializers here normalize all of that so the rest of the crate only
/// sees plain fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Incident {
    /// Opaque unique identifier (32-char hex in real instances)
    #[serde(default)]
    pub sys_id: String,

    /// Human-readable incident number, e.g. INC0012345
    #[serde(default)]
    pub number: String,

    /// One-line summary
    #[serde(default)]
    pub short_description: String,

    /// Detailed description
    #[serde(default)]
    pub description: String,

    /// Category, may be empty
    #[serde(default)]
    pub category: String,

    /// Subcategory, may be empty
    #[serde(default)]
    pub subcategory: String,

    /// Priority (1 = most severe)
    #[serde(default)]
    pub priority: Priority,

    /// Configuration item reference, resolved to its value
    #[serde(default, deserialize_with = "deserialize_reference")]
    pub cmdb_ci: String,

    /// Lifecycle state
    #[serde(default)]
    pub state: IncidentState,

    /// Closure notes written at resolution time
    #[serde(default)]
    pub close_notes: String,

    /// Accumulated work notes
    #[serde(default)]
    pub work_notes: String,

    /// When the incident was opened
    #[serde(default, deserialize_with = "deserialize_glide_datetime")]
    pub opened_at: Option<DateTime<Utc>>,
}

impl Incident {
    /// Create a new incident with a freshly minted sys_id.
    ///
    /// Real records are minted by the incident store; this constructor
    /// exists for the in-memory store and test fixtures.
    pub fn new(
        number: impl Into<String>,
        short_description: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            sys_id: Uuid::new_v4().simple().to_string(),
            number: number.into(),
            short_description: short_description.into(),
            description: description.into(),
            category: category.into(),
            subcategory: String::new(),
            priority: Priority::default(),
            cmdb_ci: String::new(),
            state: IncidentState::New,
            close_notes: String::new(),
            work_notes: String::new(),
            opened_at: Some(Utc::now()),
        }
    }

    /// Combined short description and description, used for keyword
    /// extraction and similarity scoring.
    pub fn searchable_text(&self) -> String {
        format!("{} {}", self.short_description, self.description)
    }

    /// Whether the record carries any resolution-bearing notes
    pub fn has_notes(&self) -> bool {
        !self.close_notes.is_empty() || !self.work_notes.is_empty()
    }

    /// Whether this record can serve as historical reference material
    pub fn is_historical(&self) -> bool {
        matches!(self.state, IncidentState::Resolved | IncidentState::Closed)
    }
}

/// Incident lifecycle state, carried on the wire as a numeric code string.
///
/// Unknown codes are preserved rather than rejected so that records from
/// instances with customized state sets still deserialize.
#[derive(Debug, Clone, PartialEq, Eq, EnumString, Display)]
pub enum IncidentState {
    New,
    InProgress,
    OnHold,
    Resolved,
    Closed,
    Canceled,
    #[strum(default, to_string = "{0}")]
    Other(String),
}

impl IncidentState {
    /// Wire code for this state
    pub fn code(&self) -> &str {
        match self {
            IncidentState::New => "1",
            IncidentState::InProgress => "2",
            IncidentState::OnHold => "3",
            IncidentState::Resolved => "6",
            IncidentState::Closed => "7",
            IncidentState::Canceled => "8",
            IncidentState::Other(code) => code,
        }
    }

    /// Parse a wire code, preserving unknown codes
    pub fn from_code(code: &str) -> Self {
        match code {
            "1" => IncidentState::New,
            "2" => IncidentState::InProgress,
            "3" => IncidentState::OnHold,
            "6" => IncidentState::Resolved,
            "7" => IncidentState::Closed,
            "8" => IncidentState::Canceled,
            other => IncidentState::Other(other.to_string()),
        }
    }
}

impl Default for IncidentState {
    fn default() -> Self {
        IncidentState::New
    }
}

impl Serialize for IncidentState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for IncidentState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = CodeRepr::deserialize(deserializer)?;
        Ok(IncidentState::from_code(&code.into_string()))
    }
}

/// Incident priority, 1 (critical) through 5 (planning)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, EnumString, Display)]
pub enum Priority {
    Critical,
    High,
    Moderate,
    Low,
    Planning,
}

impl Priority {
    /// Wire code for this priority
    pub fn code(&self) -> &str {
        match self {
            Priority::Critical => "1",
            Priority::High => "2",
            Priority::Moderate => "3",
            Priority::Low => "4",
            Priority::Planning => "5",
        }
    }

    /// Parse a wire code; out-of-range codes fall back to Moderate
    pub fn from_code(code: &str) -> Self {
        match code {
            "1" => Priority::Critical,
            "2" => Priority::High,
            "3" => Priority::Moderate,
            "4" => Priority::Low,
            "5" => Priority::Planning,
            _ => Priority::Moderate,
        }
    }

    /// Whether this priority warrants immediate attention
    pub fn is_urgent(&self) -> bool {
        matches!(self, Priority::Critical | Priority::High)
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Moderate
    }
}

impl Serialize for Priority {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = CodeRepr::deserialize(deserializer)?;
        Ok(Priority::from_code(&code.into_string()))
    }
}

/// Wire representation of a coded field: usually a string, occasionally a
/// bare number depending on instance settings
#[derive(Deserialize)]
#[serde(untagged)]
enum CodeRepr {
    Text(String),
    Number(i64),
}

impl CodeRepr {
    fn into_string(self) -> String {
        match self {
            CodeRepr::Text(text) => text,
            CodeRepr::Number(number) => number.to_string(),
        }
    }
}

/// Reference fields come back either as a plain value or as a
/// `{link, value}` object when the API expands them
fn deserialize_reference<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Reference {
        Plain(String),
        Expanded {
            value: String,
        },
    }

    Ok(match Option::<Reference>::deserialize(deserializer)? {
        Some(Reference::Plain(value)) => value,
        Some(Reference::Expanded { value }) => value,
        None => String::new(),
    })
}

/// Datetime fields arrive as "YYYY-MM-DD HH:MM:SS" in UTC; anything that
/// does not parse is treated as absent
fn deserialize_glide_datetime<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .as_deref()
        .filter(|value| !value.is_empty())
        .and_then(parse_glide_datetime))
}

fn parse_glide_datetime(raw: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}
