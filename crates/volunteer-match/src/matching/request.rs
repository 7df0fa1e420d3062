use serde::Deserialize;
use serde_json::Value;

use super::domain::{EventId, MatchId, MatchStatus, VolunteerId};

/// Client-side errors detected before any data access.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestValidationError {
    #[error("{field} is required")]
    Missing { field: &'static str },
    #[error("{field} must be a positive integer")]
    InvalidId { field: &'static str },
    #[error("notes must be a string")]
    InvalidNotes,
    #[error("status must be one of assigned, pending, completed, cancelled")]
    InvalidStatus,
    #[error("malformed request body: {0}")]
    MalformedBody(String),
}

/// Raw assignment body. Fields stay untyped so each one can be rejected with
/// its own message instead of a generic decode failure.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentPayload {
    #[serde(default)]
    pub volunteer_id: Option<Value>,
    #[serde(default)]
    pub event_id: Option<Value>,
    #[serde(default)]
    pub notes: Option<Value>,
}

/// Validated assignment request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentRequest {
    pub volunteer_id: VolunteerId,
    pub event_id: EventId,
    pub notes: Option<String>,
}

impl AssignmentPayload {
    pub fn validate(self) -> Result<AssignmentRequest, RequestValidationError> {
        let volunteer_id = positive_id(self.volunteer_id.as_ref(), "volunteerId")?;
        let event_id = positive_id(self.event_id.as_ref(), "eventId")?;
        let notes = match self.notes {
            None | Some(Value::Null) => None,
            Some(Value::String(notes)) => Some(notes),
            Some(_) => return Err(RequestValidationError::InvalidNotes),
        };

        Ok(AssignmentRequest {
            volunteer_id: VolunteerId(volunteer_id),
            event_id: EventId(event_id),
            notes,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct StatusPayload {
    #[serde(default)]
    pub status: Option<Value>,
}

impl StatusPayload {
    pub fn validate(self) -> Result<MatchStatus, RequestValidationError> {
        match self.status {
            None | Some(Value::Null) => Err(RequestValidationError::Missing { field: "status" }),
            Some(Value::String(raw)) => raw
                .parse::<MatchStatus>()
                .map_err(|_| RequestValidationError::InvalidStatus),
            Some(_) => Err(RequestValidationError::InvalidStatus),
        }
    }
}

fn positive_id(value: Option<&Value>, field: &'static str) -> Result<i64, RequestValidationError> {
    match value {
        None | Some(Value::Null) => Err(RequestValidationError::Missing { field }),
        Some(value) => value
            .as_i64()
            .filter(|id| *id > 0)
            .ok_or(RequestValidationError::InvalidId { field }),
    }
}

fn parse_path_id(raw: &str, field: &'static str) -> Result<i64, RequestValidationError> {
    raw.parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or(RequestValidationError::InvalidId { field })
}

pub fn parse_event_id(raw: &str) -> Result<EventId, RequestValidationError> {
    parse_path_id(raw, "eventId").map(EventId)
}

pub fn parse_volunteer_id(raw: &str) -> Result<VolunteerId, RequestValidationError> {
    parse_path_id(raw, "volunteerId").map(VolunteerId)
}

pub fn parse_match_id(raw: &str) -> Result<MatchId, RequestValidationError> {
    parse_path_id(raw, "matchId").map(MatchId)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> AssignmentPayload {
        serde_json::from_value(value).expect("payload decodes")
    }

    #[test]
    fn assignment_payload_accepts_integer_ids_and_optional_notes() {
        let request = payload(json!({ "volunteerId": 3, "eventId": 7 }))
            .validate()
            .expect("valid request");
        assert_eq!(request.volunteer_id, VolunteerId(3));
        assert_eq!(request.event_id, EventId(7));
        assert_eq!(request.notes, None);

        let request = payload(json!({ "volunteerId": 3, "eventId": 7, "notes": "bring gloves" }))
            .validate()
            .expect("valid request");
        assert_eq!(request.notes.as_deref(), Some("bring gloves"));
    }

    #[test]
    fn assignment_payload_rejects_coercible_values() {
        let err = payload(json!({ "volunteerId": "3", "eventId": 7 }))
            .validate()
            .unwrap_err();
        assert_eq!(
            err,
            RequestValidationError::InvalidId {
                field: "volunteerId"
            }
        );

        let err = payload(json!({ "volunteerId": 3, "eventId": 1.5 }))
            .validate()
            .unwrap_err();
        assert_eq!(err, RequestValidationError::InvalidId { field: "eventId" });

        let err = payload(json!({ "volunteerId": 3, "eventId": 7, "notes": 12 }))
            .validate()
            .unwrap_err();
        assert_eq!(err, RequestValidationError::InvalidNotes);
    }

    #[test]
    fn assignment_payload_reports_missing_and_non_positive_ids() {
        let err = payload(json!({ "eventId": 7 })).validate().unwrap_err();
        assert_eq!(
            err,
            RequestValidationError::Missing {
                field: "volunteerId"
            }
        );

        let err = payload(json!({ "volunteerId": 0, "eventId": 7 }))
            .validate()
            .unwrap_err();
        assert_eq!(
            err,
            RequestValidationError::InvalidId {
                field: "volunteerId"
            }
        );
    }

    #[test]
    fn status_payload_only_accepts_known_statuses() {
        let status: StatusPayload =
            serde_json::from_value(json!({ "status": "completed" })).expect("decodes");
        assert_eq!(status.validate(), Ok(MatchStatus::Completed));

        for raw in [json!({ "status": "done" }), json!({ "status": "Completed" }), json!({ "status": 1 })] {
            let status: StatusPayload = serde_json::from_value(raw).expect("decodes");
            assert_eq!(status.validate(), Err(RequestValidationError::InvalidStatus));
        }

        let status: StatusPayload = serde_json::from_value(json!({})).expect("decodes");
        assert_eq!(
            status.validate(),
            Err(RequestValidationError::Missing { field: "status" })
        );
    }

    #[test]
    fn path_ids_must_be_positive_integers() {
        assert_eq!(parse_event_id("12"), Ok(EventId(12)));
        assert!(parse_event_id("-1").is_err());
        assert!(parse_volunteer_id("abc").is_err());
        assert!(parse_match_id("0").is_err());
    }
}
