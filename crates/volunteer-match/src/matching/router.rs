use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch},
    Json, Router,
};
use serde_json::json;

use super::repository::{AssignmentNotifier, MatchingStore};
use super::request::{
    parse_event_id, parse_match_id, parse_volunteer_id, AssignmentPayload, RequestValidationError,
    StatusPayload,
};
use super::service::{MatchingService, MatchingServiceError};

/// Router builder exposing the matching endpoints.
pub fn matching_router<S, N>(service: Arc<MatchingService<S, N>>) -> Router
where
    S: MatchingStore + 'static,
    N: AssignmentNotifier + 'static,
{
    Router::new()
        .route(
            "/api/v1/events/:event_id/matches",
            get(event_matches_handler::<S, N>),
        )
        .route(
            "/api/v1/volunteers/:volunteer_id/matches",
            get(volunteer_matches_handler::<S, N>),
        )
        .route(
            "/api/v1/volunteers/:volunteer_id/history",
            get(history_handler::<S, N>),
        )
        .route(
            "/api/v1/matches",
            get(list_matches_handler::<S, N>).post(assign_handler::<S, N>),
        )
        .route(
            "/api/v1/matches/:match_id/status",
            patch(update_status_handler::<S, N>),
        )
        .with_state(service)
}

pub(crate) async fn event_matches_handler<S, N>(
    State(service): State<Arc<MatchingService<S, N>>>,
    Path(event_id): Path<String>,
) -> Response
where
    S: MatchingStore + 'static,
    N: AssignmentNotifier + 'static,
{
    let event_id = match parse_event_id(&event_id) {
        Ok(id) => id,
        Err(error) => return validation_response(error),
    };

    match service.find_matches_for_event(event_id) {
        Ok(matches) => (StatusCode::OK, Json(matches)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn volunteer_matches_handler<S, N>(
    State(service): State<Arc<MatchingService<S, N>>>,
    Path(volunteer_id): Path<String>,
) -> Response
where
    S: MatchingStore + 'static,
    N: AssignmentNotifier + 'static,
{
    let volunteer_id = match parse_volunteer_id(&volunteer_id) {
        Ok(id) => id,
        Err(error) => return validation_response(error),
    };

    match service.find_matches_for_volunteer(volunteer_id) {
        Ok(matches) => (StatusCode::OK, Json(matches)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn history_handler<S, N>(
    State(service): State<Arc<MatchingService<S, N>>>,
    Path(volunteer_id): Path<String>,
) -> Response
where
    S: MatchingStore + 'static,
    N: AssignmentNotifier + 'static,
{
    let volunteer_id = match parse_volunteer_id(&volunteer_id) {
        Ok(id) => id,
        Err(error) => return validation_response(error),
    };

    match service.get_volunteer_history(volunteer_id) {
        Ok(history) => (StatusCode::OK, Json(history)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn list_matches_handler<S, N>(
    State(service): State<Arc<MatchingService<S, N>>>,
) -> Response
where
    S: MatchingStore + 'static,
    N: AssignmentNotifier + 'static,
{
    match service.get_all_matches() {
        Ok(matches) => (StatusCode::OK, Json(matches)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn assign_handler<S, N>(
    State(service): State<Arc<MatchingService<S, N>>>,
    payload: Result<Json<AssignmentPayload>, JsonRejection>,
) -> Response
where
    S: MatchingStore + 'static,
    N: AssignmentNotifier + 'static,
{
    let request = match payload
        .map_err(|rejection| RequestValidationError::MalformedBody(rejection.body_text()))
        .and_then(|Json(payload)| payload.validate())
    {
        Ok(request) => request,
        Err(error) => return validation_response(error),
    };

    match service.assign_volunteer_to_event(request.volunteer_id, request.event_id, request.notes)
    {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn update_status_handler<S, N>(
    State(service): State<Arc<MatchingService<S, N>>>,
    Path(match_id): Path<String>,
    payload: Result<Json<StatusPayload>, JsonRejection>,
) -> Response
where
    S: MatchingStore + 'static,
    N: AssignmentNotifier + 'static,
{
    let match_id = match parse_match_id(&match_id) {
        Ok(id) => id,
        Err(error) => return validation_response(error),
    };
    let status = match payload
        .map_err(|rejection| RequestValidationError::MalformedBody(rejection.body_text()))
        .and_then(|Json(payload)| payload.validate())
    {
        Ok(status) => status,
        Err(error) => return validation_response(error),
    };

    match service.update_match_status(match_id, status) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(error) => service_error_response(error),
    }
}

fn validation_response(error: RequestValidationError) -> Response {
    let payload = json!({ "error": error.to_string() });
    (StatusCode::BAD_REQUEST, Json(payload)).into_response()
}

pub(crate) fn service_error_status(error: &MatchingServiceError) -> StatusCode {
    match error {
        MatchingServiceError::VolunteerOrEventNotFound | MatchingServiceError::MatchNotFound => {
            StatusCode::NOT_FOUND
        }
        MatchingServiceError::EventFull | MatchingServiceError::AlreadyAssigned => {
            StatusCode::CONFLICT
        }
        MatchingServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn service_error_response(error: MatchingServiceError) -> Response {
    let status = service_error_status(&error);
    let payload = json!({ "error": error.to_string() });
    (status, Json(payload)).into_response()
}
