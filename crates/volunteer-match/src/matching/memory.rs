use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::domain::{
    Event, EventId, MatchId, MatchRecord, MatchStatus, NewAssignment, Volunteer, VolunteerId,
};
use super::repository::{
    EventFilter, EventRepository, MatchFilter, MatchRepository, RepositoryError,
    VolunteerFilter, VolunteerRepository,
};

#[derive(Debug, Default)]
struct StoreState {
    volunteers: BTreeMap<VolunteerId, Volunteer>,
    events: BTreeMap<EventId, Event>,
    matches: BTreeMap<MatchId, MatchRecord>,
    last_match_id: i64,
}

/// Process-local store backing all three repositories behind one lock, so the
/// assignment write is atomic with respect to every other operation.
#[derive(Debug, Default, Clone)]
pub struct InMemoryMatchingStore {
    state: Arc<Mutex<StoreState>>,
}

impl InMemoryMatchingStore {
    pub fn with_roster(volunteers: Vec<Volunteer>, events: Vec<Event>) -> Self {
        let store = Self::default();
        {
            let mut state = store
                .state
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            state.volunteers = volunteers
                .into_iter()
                .map(|volunteer| (volunteer.id, volunteer))
                .collect();
            state.events = events.into_iter().map(|event| (event.id, event)).collect();
        }
        store
    }

    pub fn upsert_volunteer(&self, volunteer: Volunteer) -> Result<(), RepositoryError> {
        self.lock()?.volunteers.insert(volunteer.id, volunteer);
        Ok(())
    }

    pub fn upsert_event(&self, event: Event) -> Result<(), RepositoryError> {
        self.lock()?.events.insert(event.id, event);
        Ok(())
    }

    pub fn remove_volunteer(&self, id: VolunteerId) -> Result<Option<Volunteer>, RepositoryError> {
        Ok(self.lock()?.volunteers.remove(&id))
    }

    pub fn remove_event(&self, id: EventId) -> Result<Option<Event>, RepositoryError> {
        Ok(self.lock()?.events.remove(&id))
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreState>, RepositoryError> {
        self.state
            .lock()
            .map_err(|_| RepositoryError::Unavailable("matching store lock poisoned".to_string()))
    }
}

impl VolunteerRepository for InMemoryMatchingStore {
    fn fetch_volunteer(&self, id: VolunteerId) -> Result<Option<Volunteer>, RepositoryError> {
        Ok(self.lock()?.volunteers.get(&id).cloned())
    }

    fn list_volunteers(&self, filter: &VolunteerFilter) -> Result<Vec<Volunteer>, RepositoryError> {
        Ok(self
            .lock()?
            .volunteers
            .values()
            .filter(|volunteer| filter.admits(volunteer))
            .cloned()
            .collect())
    }
}

impl EventRepository for InMemoryMatchingStore {
    fn fetch_event(&self, id: EventId) -> Result<Option<Event>, RepositoryError> {
        Ok(self.lock()?.events.get(&id).cloned())
    }

    fn list_events(&self, filter: &EventFilter) -> Result<Vec<Event>, RepositoryError> {
        Ok(self
            .lock()?
            .events
            .values()
            .filter(|event| filter.admits(event))
            .cloned()
            .collect())
    }
}

impl MatchRepository for InMemoryMatchingStore {
    fn list_matches(&self, filter: &MatchFilter) -> Result<Vec<MatchRecord>, RepositoryError> {
        Ok(self
            .lock()?
            .matches
            .values()
            .filter(|record| filter.admits(record))
            .cloned()
            .collect())
    }

    fn fetch_match(&self, id: MatchId) -> Result<Option<MatchRecord>, RepositoryError> {
        Ok(self.lock()?.matches.get(&id).cloned())
    }

    fn insert_assignment(&self, assignment: NewAssignment) -> Result<MatchRecord, RepositoryError> {
        let mut guard = self.lock()?;
        let state = &mut *guard;

        if !state.volunteers.contains_key(&assignment.volunteer_id) {
            return Err(RepositoryError::NotFound);
        }
        let event = state
            .events
            .get_mut(&assignment.event_id)
            .ok_or(RepositoryError::NotFound)?;
        if event.is_full() {
            return Err(RepositoryError::CapacityReached);
        }

        let pair = MatchFilter::active_pair(assignment.event_id, assignment.volunteer_id);
        if state.matches.values().any(|record| pair.admits(record)) {
            return Err(RepositoryError::Conflict);
        }

        state.last_match_id += 1;
        let record = MatchRecord {
            id: MatchId(state.last_match_id),
            event_id: assignment.event_id,
            volunteer_id: assignment.volunteer_id,
            match_score: assignment.match_score,
            status: MatchStatus::Assigned,
            assigned_on: assignment.assigned_on,
            notes: assignment.notes,
        };

        event.current_volunteers += 1;
        state.matches.insert(record.id, record.clone());
        Ok(record)
    }

    fn update_match_status(
        &self,
        id: MatchId,
        status: MatchStatus,
    ) -> Result<Option<MatchRecord>, RepositoryError> {
        let mut state = self.lock()?;
        let Some(current) = state.matches.get(&id) else {
            return Ok(None);
        };

        if status.is_active() && !current.status.is_active() {
            let pair = MatchFilter::active_pair(current.event_id, current.volunteer_id);
            if state
                .matches
                .values()
                .any(|record| record.id != id && pair.admits(record))
            {
                return Err(RepositoryError::Conflict);
            }
        }

        Ok(state.matches.get_mut(&id).map(|record| {
            record.status = status;
            record.clone()
        }))
    }
}
