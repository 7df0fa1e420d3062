use std::collections::BTreeSet;
use std::io::Read;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

use super::RosterImportError;
use crate::matching::{Event, EventId, RequiredSkills, Urgency, Volunteer, VolunteerId};

const LIST_SEPARATOR: char = ';';

#[derive(Debug, Deserialize)]
struct VolunteerRow {
    id: i64,
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    skills: String,
    #[serde(default)]
    availability: String,
    #[serde(default)]
    location: String,
    #[serde(default)]
    preferences: String,
    #[serde(default, deserialize_with = "flag")]
    completed: bool,
    #[serde(default = "active_by_default", deserialize_with = "active_flag")]
    active: bool,
}

#[derive(Debug, Deserialize)]
struct EventRow {
    id: i64,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    location: String,
    #[serde(default)]
    required_skills: String,
    #[serde(default)]
    urgency: String,
    event_date: String,
    max_volunteers: u32,
    #[serde(default)]
    current_volunteers: Option<u32>,
}

fn active_by_default() -> bool {
    true
}

fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    parse_flag(deserializer, false)
}

fn active_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    parse_flag(deserializer, true)
}

fn parse_flag<'de, D>(deserializer: D, blank: bool) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "" => Ok(blank),
        "true" | "yes" | "y" | "1" => Ok(true),
        "false" | "no" | "n" | "0" => Ok(false),
        other => Err(serde::de::Error::custom(format!(
            "expected a boolean flag, found '{other}'"
        ))),
    }
}

fn split_list(raw: &str) -> impl Iterator<Item = String> + '_ {
    raw.split(LIST_SEPARATOR)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
}

fn parse_date(raw: &str) -> Result<NaiveDate, RosterImportError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| RosterImportError::InvalidDate {
        value: raw.to_string(),
    })
}

fn reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
}

pub(crate) fn parse_volunteers<R: Read>(input: R) -> Result<Vec<Volunteer>, RosterImportError> {
    let mut csv_reader = reader(input);
    let mut volunteers = Vec::new();

    for row in csv_reader.deserialize::<VolunteerRow>() {
        let row = row?;
        let availability = split_list(&row.availability)
            .map(|value| parse_date(&value))
            .collect::<Result<BTreeSet<_>, _>>()?;

        volunteers.push(Volunteer {
            id: VolunteerId(row.id),
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            skills: split_list(&row.skills).collect(),
            availability,
            location: row.location,
            preferences: split_list(&row.preferences).collect(),
            completed: row.completed,
            active: row.active,
        });
    }

    Ok(volunteers)
}

pub(crate) fn parse_events<R: Read>(input: R) -> Result<Vec<Event>, RosterImportError> {
    let mut csv_reader = reader(input);
    let mut events = Vec::new();

    for row in csv_reader.deserialize::<EventRow>() {
        let row = row?;
        let required_skills =
            RequiredSkills::new(row.required_skills.split([',', LIST_SEPARATOR]));
        let urgency = if row.urgency.trim().is_empty() {
            Urgency::default()
        } else {
            row.urgency
                .parse::<Urgency>()
                .map_err(|_| RosterImportError::InvalidUrgency {
                    value: row.urgency.clone(),
                })?
        };

        events.push(Event {
            id: EventId(row.id),
            name: row.name,
            description: row.description,
            location: row.location,
            required_skills,
            urgency,
            event_date: parse_date(&row.event_date)?,
            max_volunteers: row.max_volunteers,
            current_volunteers: row.current_volunteers.unwrap_or(0),
        });
    }

    Ok(events)
}
