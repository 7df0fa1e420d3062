//! Volunteer-to-event matching: compatibility scoring, ranking, and the
//! assignment lifecycle.
//!
//! Scoring is a pure function over a volunteer and an event. The service layer
//! ranks candidates against the admission threshold and owns match records,
//! reaching storage only through the repository traits so any backing store
//! can be plugged in.

pub mod domain;
pub mod memory;
pub mod repository;
pub mod request;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Event, EventId, EventSummary, HistoryEntry, MatchCandidate, MatchId, MatchRecord, MatchStatus,
    MatchView, NewAssignment, RequiredSkills, Urgency, Volunteer, VolunteerId, VolunteerSummary,
};
pub use memory::InMemoryMatchingStore;
pub use repository::{
    AssignmentNotice, AssignmentNotifier, EventFilter, EventRepository, MatchFilter,
    MatchRepository, MatchingStore, NotifierError, RepositoryError, VolunteerFilter,
    VolunteerRepository,
};
pub use request::{AssignmentPayload, AssignmentRequest, RequestValidationError, StatusPayload};
pub use router::matching_router;
pub use scoring::{score, score_breakdown, ScoreBreakdown, ScoreComponent, ScoreFactor};
pub use service::{rank, MatchingService, MatchingServiceError, ADMISSION_THRESHOLD};
