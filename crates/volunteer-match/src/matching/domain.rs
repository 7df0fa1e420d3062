use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Identifier wrapper for volunteer profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VolunteerId(pub i64);

/// Identifier wrapper for events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub i64);

/// Identifier wrapper for persisted match records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchId(pub i64);

impl fmt::Display for VolunteerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Volunteer profile as seen by the matching engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volunteer {
    pub id: VolunteerId,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub skills: BTreeSet<String>,
    #[serde(default)]
    pub availability: BTreeSet<NaiveDate>,
    /// State or region code, e.g. `TX`.
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub preferences: Vec<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Volunteer {
    /// First and last name, or the e-mail address when both are blank.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let full = full.trim();
        if full.is_empty() {
            self.email.clone()
        } else {
            full.to_string()
        }
    }

    pub fn summary(&self) -> VolunteerSummary {
        VolunteerSummary {
            id: self.id,
            name: self.display_name(),
            skills: self.skills.iter().cloned().collect(),
        }
    }
}

/// Categorical urgency attached to an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Urgency {
    pub fn label(&self) -> &'static str {
        match self {
            Urgency::Low => "low",
            Urgency::Medium => "medium",
            Urgency::High => "high",
            Urgency::Critical => "critical",
        }
    }
}

impl FromStr for Urgency {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            other => Err(format!("unknown urgency '{other}'")),
        }
    }
}

/// Canonical set of skills an event requires.
///
/// Upstream storage hands these over either as a JSON list, as a comma
/// delimited string, or as something else entirely. All three shapes collapse
/// into one set here so scoring never has to branch on representation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RequiredSkills(BTreeSet<String>);

impl RequiredSkills {
    pub fn new<I, S>(skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            skills
                .into_iter()
                .map(|skill| skill.as_ref().trim().to_string())
                .filter(|skill| !skill.is_empty())
                .collect(),
        )
    }

    /// Normalize a raw stored value. Non-string list entries are ignored and
    /// any value that is neither a list nor a string yields an empty set.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Array(items) => Self::new(items.iter().filter_map(Value::as_str)),
            Value::String(raw) => Self::parse_delimited(raw),
            _ => Self::default(),
        }
    }

    pub fn parse_delimited(raw: &str) -> Self {
        Self::new(raw.split(','))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, skill: &str) -> bool {
        self.0.contains(skill)
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }
}

impl<'de> Deserialize<'de> for RequiredSkills {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

/// Live event snapshot used for matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub required_skills: RequiredSkills,
    #[serde(default)]
    pub urgency: Urgency,
    pub event_date: NaiveDate,
    pub max_volunteers: u32,
    #[serde(default)]
    pub current_volunteers: u32,
}

impl Event {
    pub fn is_full(&self) -> bool {
        self.current_volunteers >= self.max_volunteers
    }

    pub fn summary(&self) -> EventSummary {
        EventSummary {
            id: self.id,
            name: self.name.clone(),
            event_date: self.event_date,
            location: self.location.clone(),
        }
    }
}

/// Lifecycle status of an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Pending,
    Assigned,
    Completed,
    Cancelled,
}

impl MatchStatus {
    pub const ALL: [MatchStatus; 4] = [
        MatchStatus::Assigned,
        MatchStatus::Pending,
        MatchStatus::Completed,
        MatchStatus::Cancelled,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MatchStatus::Pending => "pending",
            MatchStatus::Assigned => "assigned",
            MatchStatus::Completed => "completed",
            MatchStatus::Cancelled => "cancelled",
        }
    }

    /// Cancelled matches release the (event, volunteer) pair.
    pub fn is_active(&self) -> bool {
        !matches!(self, MatchStatus::Cancelled)
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for MatchStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        MatchStatus::ALL
            .into_iter()
            .find(|status| status.label() == value)
            .ok_or_else(|| format!("unknown match status '{value}'"))
    }
}

/// Persisted assignment linking one volunteer to one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    pub id: MatchId,
    pub event_id: EventId,
    pub volunteer_id: VolunteerId,
    pub match_score: u8,
    pub status: MatchStatus,
    pub assigned_on: NaiveDate,
    pub notes: String,
}

/// Assignment payload handed to the repository for the conditional insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAssignment {
    pub event_id: EventId,
    pub volunteer_id: VolunteerId,
    pub match_score: u8,
    pub assigned_on: NaiveDate,
    pub notes: String,
}

/// Ranked candidate pairing returned by the matching queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchCandidate {
    pub volunteer: Volunteer,
    pub event: Event,
    pub match_score: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerSummary {
    pub id: VolunteerId,
    pub name: String,
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSummary {
    pub id: EventId,
    pub name: String,
    pub event_date: NaiveDate,
    pub location: String,
}

/// Match record with denormalized summaries. Either summary is `null` when
/// the referenced row can no longer be found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchView {
    #[serde(flatten)]
    pub record: MatchRecord,
    pub volunteer: Option<VolunteerSummary>,
    pub event: Option<EventSummary>,
}

/// History entry for a single volunteer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    #[serde(flatten)]
    pub record: MatchRecord,
    pub event: Option<EventSummary>,
}
