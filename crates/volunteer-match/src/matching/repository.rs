use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{
    Event, EventId, MatchId, MatchRecord, MatchStatus, NewAssignment, Volunteer, VolunteerId,
};

/// Volunteer roster filter. `None` fields do not constrain the query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VolunteerFilter {
    pub completed: Option<bool>,
}

impl VolunteerFilter {
    pub fn completed() -> Self {
        Self {
            completed: Some(true),
        }
    }

    pub fn admits(&self, volunteer: &Volunteer) -> bool {
        self.completed
            .map(|completed| volunteer.completed == completed)
            .unwrap_or(true)
    }
}

/// Event catalog filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventFilter {
    /// Earliest event date to include.
    pub from: Option<NaiveDate>,
}

impl EventFilter {
    pub fn upcoming(today: NaiveDate) -> Self {
        Self { from: Some(today) }
    }

    pub fn admits(&self, event: &Event) -> bool {
        self.from
            .map(|from| event.event_date >= from)
            .unwrap_or(true)
    }
}

/// Match listing filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchFilter {
    pub event_id: Option<EventId>,
    pub volunteer_id: Option<VolunteerId>,
    pub active_only: bool,
}

impl MatchFilter {
    pub fn for_volunteer(volunteer_id: VolunteerId) -> Self {
        Self {
            volunteer_id: Some(volunteer_id),
            ..Self::default()
        }
    }

    pub fn active_pair(event_id: EventId, volunteer_id: VolunteerId) -> Self {
        Self {
            event_id: Some(event_id),
            volunteer_id: Some(volunteer_id),
            active_only: true,
        }
    }

    pub fn admits(&self, record: &MatchRecord) -> bool {
        self.event_id.map_or(true, |id| record.event_id == id)
            && self.volunteer_id.map_or(true, |id| record.volunteer_id == id)
            && (!self.active_only || record.status.is_active())
    }
}

/// Read access to volunteer profiles owned by the profile subsystem.
pub trait VolunteerRepository: Send + Sync {
    fn fetch_volunteer(&self, id: VolunteerId) -> Result<Option<Volunteer>, RepositoryError>;
    fn list_volunteers(&self, filter: &VolunteerFilter) -> Result<Vec<Volunteer>, RepositoryError>;
}

/// Read access to events owned by the event-management subsystem.
pub trait EventRepository: Send + Sync {
    fn fetch_event(&self, id: EventId) -> Result<Option<Event>, RepositoryError>;
    fn list_events(&self, filter: &EventFilter) -> Result<Vec<Event>, RepositoryError>;
}

/// Storage for match records.
pub trait MatchRepository: Send + Sync {
    fn list_matches(&self, filter: &MatchFilter) -> Result<Vec<MatchRecord>, RepositoryError>;
    fn fetch_match(&self, id: MatchId) -> Result<Option<MatchRecord>, RepositoryError>;

    /// Insert an `assigned` match and bump the event's volunteer counter as a
    /// single atomic write. Implementations must reject the write with
    /// [`RepositoryError::NotFound`] when the volunteer or event is missing,
    /// [`RepositoryError::CapacityReached`] when the event is full and
    /// [`RepositoryError::Conflict`] when an active match already links the pair.
    fn insert_assignment(&self, assignment: NewAssignment) -> Result<MatchRecord, RepositoryError>;

    /// Overwrite the status in place, returning `None` for unknown ids.
    /// Reactivating a cancelled match fails with [`RepositoryError::Conflict`]
    /// while another active match links the same pair.
    fn update_match_status(
        &self,
        id: MatchId,
        status: MatchStatus,
    ) -> Result<Option<MatchRecord>, RepositoryError>;
}

/// Everything the matching service needs from storage.
pub trait MatchingStore: VolunteerRepository + EventRepository + MatchRepository {}

impl<T> MatchingStore for T where T: VolunteerRepository + EventRepository + MatchRepository {}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("capacity reached")]
    CapacityReached,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound hook for volunteer notifications (e-mail, in-app inbox, ...).
pub trait AssignmentNotifier: Send + Sync {
    fn notify(&self, notice: AssignmentNotice) -> Result<(), NotifierError>;
}

/// Notification payload emitted after a committed match change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentNotice {
    pub template: String,
    pub match_id: MatchId,
    pub volunteer_id: VolunteerId,
    pub event_id: EventId,
    pub details: BTreeMap<String, String>,
}

/// Notification dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum NotifierError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}
