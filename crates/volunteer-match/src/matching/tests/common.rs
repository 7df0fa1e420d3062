use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::matching::domain::{
    Event, EventId, MatchId, MatchRecord, MatchStatus, NewAssignment, RequiredSkills, Urgency,
    Volunteer, VolunteerId,
};
use crate::matching::memory::InMemoryMatchingStore;
use crate::matching::repository::{
    AssignmentNotice, AssignmentNotifier, EventFilter, EventRepository, MatchFilter,
    MatchRepository, NotifierError, RepositoryError, VolunteerFilter, VolunteerRepository,
};
use crate::matching::{matching_router, MatchingService};

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn event_day() -> NaiveDate {
    date(2025, 11, 10)
}

/// Texas volunteer with first aid and teamwork, free on the event day.
pub(super) fn volunteer() -> Volunteer {
    Volunteer {
        id: VolunteerId(1),
        first_name: "Dana".to_string(),
        last_name: "Reyes".to_string(),
        email: "dana@example.org".to_string(),
        skills: ["First Aid", "Teamwork"]
            .into_iter()
            .map(str::to_string)
            .collect(),
        availability: [event_day(), date(2025, 11, 22)].into_iter().collect(),
        location: "TX".to_string(),
        preferences: vec!["shelter".to_string()],
        completed: true,
        active: true,
    }
}

pub(super) fn volunteer_with(id: i64, skills: &[&str]) -> Volunteer {
    Volunteer {
        id: VolunteerId(id),
        first_name: format!("Volunteer {id}"),
        skills: skills.iter().map(|skill| skill.to_string()).collect(),
        ..volunteer()
    }
}

/// Houston event requiring exactly the skills of [`volunteer`].
pub(super) fn event() -> Event {
    Event {
        id: EventId(10),
        name: "Flood Relief Shelter".to_string(),
        description: "Staff the overnight shelter and first aid tent".to_string(),
        location: "Houston, TX".to_string(),
        required_skills: RequiredSkills::new(["First Aid", "Teamwork"]),
        urgency: Urgency::High,
        event_date: event_day(),
        max_volunteers: 5,
        current_volunteers: 0,
    }
}

/// Event the default volunteer covers two of three skills for, on another day,
/// elsewhere, and with nothing matching their preferences.
pub(super) fn partial_event() -> Event {
    Event {
        id: EventId(11),
        name: "Marathon Medical Tent".to_string(),
        description: "Course-side support".to_string(),
        location: "Denver, CO".to_string(),
        required_skills: RequiredSkills::new(["First Aid", "Teamwork", "CPR"]),
        urgency: Urgency::Medium,
        event_date: date(2025, 12, 1),
        max_volunteers: 10,
        current_volunteers: 0,
    }
}

pub(super) fn build_service() -> (
    MatchingService<InMemoryMatchingStore, MemoryNotifier>,
    Arc<InMemoryMatchingStore>,
    Arc<MemoryNotifier>,
) {
    build_service_with(vec![volunteer()], vec![event(), partial_event()])
}

pub(super) fn build_service_with(
    volunteers: Vec<Volunteer>,
    events: Vec<Event>,
) -> (
    MatchingService<InMemoryMatchingStore, MemoryNotifier>,
    Arc<InMemoryMatchingStore>,
    Arc<MemoryNotifier>,
) {
    let store = Arc::new(InMemoryMatchingStore::with_roster(volunteers, events));
    let notifier = Arc::new(MemoryNotifier::default());
    let service = MatchingService::new(store.clone(), notifier.clone());
    (service, store, notifier)
}

pub(super) fn router_with_service(
    service: MatchingService<InMemoryMatchingStore, MemoryNotifier>,
) -> axum::Router {
    matching_router(Arc::new(service))
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotifier {
    notices: Arc<Mutex<Vec<AssignmentNotice>>>,
}

impl MemoryNotifier {
    pub(super) fn notices(&self) -> Vec<AssignmentNotice> {
        self.notices.lock().expect("notifier mutex poisoned").clone()
    }
}

impl AssignmentNotifier for MemoryNotifier {
    fn notify(&self, notice: AssignmentNotice) -> Result<(), NotifierError> {
        self.notices
            .lock()
            .expect("notifier mutex poisoned")
            .push(notice);
        Ok(())
    }
}

pub(super) struct OfflineNotifier;

impl AssignmentNotifier for OfflineNotifier {
    fn notify(&self, _notice: AssignmentNotice) -> Result<(), NotifierError> {
        Err(NotifierError::Transport("smtp offline".to_string()))
    }
}

pub(super) struct UnavailableStore;

impl VolunteerRepository for UnavailableStore {
    fn fetch_volunteer(&self, _id: VolunteerId) -> Result<Option<Volunteer>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list_volunteers(&self, _filter: &VolunteerFilter) -> Result<Vec<Volunteer>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

impl EventRepository for UnavailableStore {
    fn fetch_event(&self, _id: EventId) -> Result<Option<Event>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list_events(&self, _filter: &EventFilter) -> Result<Vec<Event>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

impl MatchRepository for UnavailableStore {
    fn list_matches(&self, _filter: &MatchFilter) -> Result<Vec<MatchRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch_match(&self, _id: MatchId) -> Result<Option<MatchRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert_assignment(
        &self,
        _assignment: NewAssignment,
    ) -> Result<MatchRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update_match_status(
        &self,
        _id: MatchId,
        _status: MatchStatus,
    ) -> Result<Option<MatchRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
