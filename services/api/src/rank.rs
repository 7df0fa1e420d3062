use crate::infra::{load_store, TracingNotifier};
use chrono::{Local, NaiveDate};
use clap::{ArgGroup, Args};
use std::path::PathBuf;
use std::sync::Arc;
use volunteer_match::error::AppError;
use volunteer_match::matching::{
    score_breakdown, EventId, MatchCandidate, MatchingService, VolunteerId, ADMISSION_THRESHOLD,
};

#[derive(Args, Debug)]
#[command(group(
    ArgGroup::new("target")
        .required(true)
        .args(["event_id", "volunteer_id"])
))]
pub(crate) struct RankArgs {
    /// Volunteer CSV export
    #[arg(long)]
    pub(crate) volunteers: PathBuf,
    /// Event CSV export
    #[arg(long)]
    pub(crate) events: PathBuf,
    /// Rank completed volunteers for this event
    #[arg(long, value_parser = clap::value_parser!(i64).range(1..))]
    pub(crate) event_id: Option<i64>,
    /// Rank upcoming events for this volunteer
    #[arg(long, value_parser = clap::value_parser!(i64).range(1..))]
    pub(crate) volunteer_id: Option<i64>,
    /// Reference date for upcoming events (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) fn run_rank(args: RankArgs) -> Result<(), AppError> {
    let RankArgs {
        volunteers,
        events,
        event_id,
        volunteer_id,
        today,
    } = args;

    let store = Arc::new(load_store(Some(volunteers.as_path()), Some(events.as_path()))?);
    let service = MatchingService::new(store, Arc::new(TracingNotifier));

    let (heading, candidates) = match (event_id, volunteer_id) {
        (Some(id), _) => {
            let event_id = EventId(id);
            (
                format!("Volunteers ranked for event {event_id}"),
                service.find_matches_for_event(event_id)?,
            )
        }
        (None, Some(id)) => {
            let volunteer_id = VolunteerId(id);
            let today = today.unwrap_or_else(|| Local::now().date_naive());
            (
                format!("Events ranked for volunteer {volunteer_id} (from {today})"),
                service.find_matches_for_volunteer_as_of(volunteer_id, today)?,
            )
        }
        (None, None) => (String::new(), Vec::new()),
    };

    println!("{heading}");
    for line in ranking_lines(&candidates) {
        println!("{line}");
    }
    Ok(())
}

fn ranking_lines(candidates: &[MatchCandidate]) -> Vec<String> {
    if candidates.is_empty() {
        return vec![format!("  No pairings at or above {ADMISSION_THRESHOLD} points")];
    }

    let mut lines = Vec::new();
    for (position, candidate) in candidates.iter().enumerate() {
        lines.push(format!(
            "{}. {} -> {} ({}) | score {}",
            position + 1,
            candidate.volunteer.display_name(),
            candidate.event.name,
            candidate.event.event_date,
            candidate.match_score
        ));
        let breakdown = score_breakdown(&candidate.volunteer, &candidate.event);
        for component in &breakdown.components {
            lines.push(format!(
                "    - {}: {:.1} ({})",
                component.factor.label(),
                component.points,
                component.notes
            ));
        }
    }
    lines
}
