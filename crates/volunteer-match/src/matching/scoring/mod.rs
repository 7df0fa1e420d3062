mod weights;

pub use weights::{ScoreWeights, MATCH_WEIGHTS, MAX_SCORE};

use serde::Serialize;

use super::domain::{Event, Volunteer};

/// Signals contributing to a compatibility score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreFactor {
    Skills,
    Availability,
    Location,
    Preferences,
}

impl ScoreFactor {
    pub fn label(&self) -> &'static str {
        match self {
            ScoreFactor::Skills => "skills",
            ScoreFactor::Availability => "availability",
            ScoreFactor::Location => "location",
            ScoreFactor::Preferences => "preferences",
        }
    }
}

/// Discrete contribution to a score so rankings can be audited.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreComponent {
    pub factor: ScoreFactor,
    pub points: f64,
    pub notes: String,
}

/// Full scoring trail for one (volunteer, event) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub total: u8,
    pub components: Vec<ScoreComponent>,
}

/// Compatibility score in `0..=100` for a volunteer and an event.
pub fn score(volunteer: &Volunteer, event: &Event) -> u8 {
    score_breakdown(volunteer, event).total
}

pub fn score_breakdown(volunteer: &Volunteer, event: &Event) -> ScoreBreakdown {
    let components = vec![
        skill_component(volunteer, event),
        availability_component(volunteer, event),
        location_component(volunteer, event),
        preference_component(volunteer, event),
    ];

    let raw: f64 = components.iter().map(|component| component.points).sum();
    let total = raw.round().clamp(0.0, f64::from(MAX_SCORE)) as u8;

    ScoreBreakdown { total, components }
}

fn skill_component(volunteer: &Volunteer, event: &Event) -> ScoreComponent {
    let required = &event.required_skills;
    if required.is_empty() {
        return ScoreComponent {
            factor: ScoreFactor::Skills,
            points: MATCH_WEIGHTS.skills,
            notes: "no required skills".to_string(),
        };
    }

    let matching = required
        .iter()
        .filter(|skill| volunteer.skills.contains(skill.as_str()))
        .count()
        .min(required.len());

    ScoreComponent {
        factor: ScoreFactor::Skills,
        points: MATCH_WEIGHTS.skills * matching as f64 / required.len() as f64,
        notes: format!("{matching} of {} required skills", required.len()),
    }
}

fn availability_component(volunteer: &Volunteer, event: &Event) -> ScoreComponent {
    let available = volunteer.availability.contains(&event.event_date);
    ScoreComponent {
        factor: ScoreFactor::Availability,
        points: if available {
            MATCH_WEIGHTS.availability
        } else {
            0.0
        },
        notes: if available {
            format!("available on {}", event.event_date)
        } else {
            format!("not available on {}", event.event_date)
        },
    }
}

// The region code must appear verbatim in the event location.
fn location_component(volunteer: &Volunteer, event: &Event) -> ScoreComponent {
    let region = volunteer.location.trim();
    let matched = !region.is_empty() && event.location.contains(region);
    ScoreComponent {
        factor: ScoreFactor::Location,
        points: if matched { MATCH_WEIGHTS.location } else { 0.0 },
        notes: if matched {
            format!("'{region}' found in '{}'", event.location)
        } else {
            "no location match".to_string()
        },
    }
}

fn preference_component(volunteer: &Volunteer, event: &Event) -> ScoreComponent {
    let name = event.name.to_lowercase();
    let description = event.description.to_lowercase();

    let hit = volunteer
        .preferences
        .iter()
        .map(|keyword| keyword.trim().to_lowercase())
        .find(|keyword| {
            !keyword.is_empty() && (name.contains(keyword) || description.contains(keyword))
        });

    match hit {
        Some(keyword) => ScoreComponent {
            factor: ScoreFactor::Preferences,
            points: MATCH_WEIGHTS.preferences,
            notes: format!("preference '{keyword}' mentioned"),
        },
        None => ScoreComponent {
            factor: ScoreFactor::Preferences,
            points: 0.0,
            notes: "no preference overlap".to_string(),
        },
    }
}
