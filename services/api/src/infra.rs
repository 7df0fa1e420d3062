use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;
use volunteer_match::error::AppError;
use volunteer_match::matching::{
    AssignmentNotice, AssignmentNotifier, InMemoryMatchingStore, NotifierError,
};
use volunteer_match::roster::RosterImporter;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Notifier that records notices in the service log until a delivery channel is wired.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct TracingNotifier;

impl AssignmentNotifier for TracingNotifier {
    fn notify(&self, notice: AssignmentNotice) -> Result<(), NotifierError> {
        info!(
            template = %notice.template,
            match_id = %notice.match_id,
            volunteer_id = %notice.volunteer_id,
            event_id = %notice.event_id,
            details = ?notice.details,
            "volunteer notification queued"
        );
        Ok(())
    }
}

/// Builds the in-memory store from optional CSV exports. Missing paths leave that side empty.
pub(crate) fn load_store(
    volunteers: Option<&Path>,
    events: Option<&Path>,
) -> Result<InMemoryMatchingStore, AppError> {
    let volunteers = match volunteers {
        Some(path) => RosterImporter::volunteers_from_path(path)?,
        None => Vec::new(),
    };
    let events = match events {
        Some(path) => RosterImporter::events_from_path(path)?,
        None => Vec::new(),
    };

    info!(
        volunteers = volunteers.len(),
        events = events.len(),
        "matching store seeded"
    );
    Ok(InMemoryMatchingStore::with_roster(volunteers, events))
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
