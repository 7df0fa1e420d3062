use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tracing::{debug, info, warn};

use super::domain::{
    EventId, HistoryEntry, MatchCandidate, MatchId, MatchRecord, MatchStatus, MatchView,
    NewAssignment, VolunteerId,
};
use super::repository::{
    AssignmentNotice, AssignmentNotifier, EventFilter, MatchFilter, MatchingStore,
    RepositoryError, VolunteerFilter,
};
use super::scoring;

/// Minimum score a pairing needs before it is surfaced to callers.
pub const ADMISSION_THRESHOLD: u8 = 50;

/// Service composing the scoring function, the matching store, and the
/// notification hook.
pub struct MatchingService<S, N> {
    store: Arc<S>,
    notifier: Arc<N>,
}

impl<S, N> MatchingService<S, N>
where
    S: MatchingStore + 'static,
    N: AssignmentNotifier + 'static,
{
    pub fn new(store: Arc<S>, notifier: Arc<N>) -> Self {
        Self { store, notifier }
    }

    /// Completed volunteers ranked against one event. Unknown events yield no matches.
    pub fn find_matches_for_event(
        &self,
        event_id: EventId,
    ) -> Result<Vec<MatchCandidate>, MatchingServiceError> {
        let Some(event) = self.store.fetch_event(event_id)? else {
            debug!(%event_id, "event not found, no matches");
            return Ok(Vec::new());
        };

        let volunteers = self.store.list_volunteers(&VolunteerFilter::completed())?;
        let candidates = volunteers
            .into_iter()
            .filter(|volunteer| volunteer.completed)
            .map(|volunteer| {
                let match_score = scoring::score(&volunteer, &event);
                MatchCandidate {
                    volunteer,
                    event: event.clone(),
                    match_score,
                }
            })
            .collect();

        let ranked = rank(candidates);
        debug!(%event_id, matches = ranked.len(), "ranked volunteers for event");
        Ok(ranked)
    }

    /// Upcoming events ranked for one volunteer.
    pub fn find_matches_for_volunteer(
        &self,
        volunteer_id: VolunteerId,
    ) -> Result<Vec<MatchCandidate>, MatchingServiceError> {
        self.find_matches_for_volunteer_as_of(volunteer_id, Local::now().date_naive())
    }

    /// Same as [`Self::find_matches_for_volunteer`], considering events on or after `today`.
    pub fn find_matches_for_volunteer_as_of(
        &self,
        volunteer_id: VolunteerId,
        today: NaiveDate,
    ) -> Result<Vec<MatchCandidate>, MatchingServiceError> {
        let volunteer = match self.store.fetch_volunteer(volunteer_id)? {
            Some(volunteer) if volunteer.completed => volunteer,
            _ => {
                debug!(%volunteer_id, "volunteer missing or incomplete, no matches");
                return Ok(Vec::new());
            }
        };

        let events = self.store.list_events(&EventFilter::upcoming(today))?;
        let candidates = events
            .into_iter()
            .map(|event| {
                let match_score = scoring::score(&volunteer, &event);
                MatchCandidate {
                    volunteer: volunteer.clone(),
                    event,
                    match_score,
                }
            })
            .collect();

        let ranked = rank(candidates);
        debug!(%volunteer_id, matches = ranked.len(), "ranked events for volunteer");
        Ok(ranked)
    }

    /// Create an `assigned` match for the pair, dated today.
    pub fn assign_volunteer_to_event(
        &self,
        volunteer_id: VolunteerId,
        event_id: EventId,
        notes: Option<String>,
    ) -> Result<MatchRecord, MatchingServiceError> {
        self.assign_volunteer_to_event_on(volunteer_id, event_id, notes, Local::now().date_naive())
    }

    pub fn assign_volunteer_to_event_on(
        &self,
        volunteer_id: VolunteerId,
        event_id: EventId,
        notes: Option<String>,
        assigned_on: NaiveDate,
    ) -> Result<MatchRecord, MatchingServiceError> {
        let volunteer = self.store.fetch_volunteer(volunteer_id)?;
        let event = self.store.fetch_event(event_id)?;
        let (Some(volunteer), Some(event)) = (volunteer, event) else {
            warn!(%volunteer_id, %event_id, "assignment rejected: volunteer or event not found");
            return Err(MatchingServiceError::VolunteerOrEventNotFound);
        };

        if event.is_full() {
            warn!(%volunteer_id, %event_id, "assignment rejected: event is full");
            return Err(MatchingServiceError::EventFull);
        }

        let existing = self
            .store
            .list_matches(&MatchFilter::active_pair(event_id, volunteer_id))?;
        if !existing.is_empty() {
            warn!(%volunteer_id, %event_id, "assignment rejected: already assigned");
            return Err(MatchingServiceError::AlreadyAssigned);
        }

        let match_score = scoring::score(&volunteer, &event);
        let record = self
            .store
            .insert_assignment(NewAssignment {
                event_id,
                volunteer_id,
                match_score,
                assigned_on,
                notes: notes.unwrap_or_default(),
            })
            .map_err(|err| match err {
                RepositoryError::NotFound => MatchingServiceError::VolunteerOrEventNotFound,
                RepositoryError::CapacityReached => MatchingServiceError::EventFull,
                RepositoryError::Conflict => MatchingServiceError::AlreadyAssigned,
                other => MatchingServiceError::Repository(other),
            })?;

        info!(
            match_id = %record.id,
            %volunteer_id,
            %event_id,
            score = match_score,
            "volunteer assigned to event"
        );

        let mut details = BTreeMap::new();
        details.insert("event_name".to_string(), event.name.clone());
        details.insert("event_date".to_string(), event.event_date.to_string());
        details.insert("match_score".to_string(), match_score.to_string());
        self.dispatch(&record, "volunteer_assigned", details);

        Ok(record)
    }

    /// Overwrite the status of an existing match.
    pub fn update_match_status(
        &self,
        match_id: MatchId,
        status: MatchStatus,
    ) -> Result<MatchRecord, MatchingServiceError> {
        let record = self
            .store
            .update_match_status(match_id, status)
            .map_err(|err| match err {
                RepositoryError::Conflict => {
                    warn!(%match_id, "status change rejected: pair already has an active match");
                    MatchingServiceError::AlreadyAssigned
                }
                other => MatchingServiceError::Repository(other),
            })?
            .ok_or(MatchingServiceError::MatchNotFound)?;

        info!(%match_id, status = status.label(), "match status updated");

        let mut details = BTreeMap::new();
        details.insert("status".to_string(), status.label().to_string());
        self.dispatch(&record, "match_status_changed", details);

        Ok(record)
    }

    /// Every match, with volunteer and event summaries when still resolvable.
    pub fn get_all_matches(&self) -> Result<Vec<MatchView>, MatchingServiceError> {
        let records = self.store.list_matches(&MatchFilter::default())?;
        records
            .into_iter()
            .map(|record| -> Result<MatchView, MatchingServiceError> {
                let volunteer = self
                    .store
                    .fetch_volunteer(record.volunteer_id)?
                    .map(|volunteer| volunteer.summary());
                let event = self
                    .store
                    .fetch_event(record.event_id)?
                    .map(|event| event.summary());
                Ok(MatchView {
                    record,
                    volunteer,
                    event,
                })
            })
            .collect()
    }

    pub fn get_volunteer_history(
        &self,
        volunteer_id: VolunteerId,
    ) -> Result<Vec<HistoryEntry>, MatchingServiceError> {
        let records = self
            .store
            .list_matches(&MatchFilter::for_volunteer(volunteer_id))?;
        records
            .into_iter()
            .map(|record| -> Result<HistoryEntry, MatchingServiceError> {
                let event = self
                    .store
                    .fetch_event(record.event_id)?
                    .map(|event| event.summary());
                Ok(HistoryEntry { record, event })
            })
            .collect()
    }

    fn dispatch(&self, record: &MatchRecord, template: &str, details: BTreeMap<String, String>) {
        let notice = AssignmentNotice {
            template: template.to_string(),
            match_id: record.id,
            volunteer_id: record.volunteer_id,
            event_id: record.event_id,
            details,
        };
        // The write is already committed; delivery problems are reported, not rolled back.
        if let Err(err) = self.notifier.notify(notice) {
            warn!(match_id = %record.id, template, error = %err, "notification dispatch failed");
        }
    }
}

/// Drop candidates under the admission threshold and order by score, highest first.
pub fn rank(candidates: Vec<MatchCandidate>) -> Vec<MatchCandidate> {
    let mut admitted: Vec<MatchCandidate> = candidates
        .into_iter()
        .filter(|candidate| candidate.match_score >= ADMISSION_THRESHOLD)
        .collect();
    admitted.sort_by(|a, b| b.match_score.cmp(&a.match_score));
    admitted
}

/// Error raised by the matching service.
#[derive(Debug, thiserror::Error)]
pub enum MatchingServiceError {
    #[error("volunteer or event not found")]
    VolunteerOrEventNotFound,
    #[error("event is full")]
    EventFull,
    #[error("volunteer already assigned to this event")]
    AlreadyAssigned,
    #[error("match not found")]
    MatchNotFound,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
