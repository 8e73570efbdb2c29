pub mod appointments;
pub mod catalog;
pub mod clients;
pub mod reminders;
pub mod templates;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::booking::BookingError;
use crate::db::DatabaseError;

/// Structured failure returned over IPC: a stable machine-readable code plus
/// a message safe to display.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
}

impl ErrorPayload {
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            code: "validation_error".into(),
            message: message.into(),
        }
    }

    pub fn not_found(entity: &str, id: &str) -> Self {
        Self {
            code: "not_found".into(),
            message: format!("{entity} not found: {id}"),
        }
    }

    pub fn business_rule(message: impl Into<String>) -> Self {
        Self {
            code: "business_logic_error".into(),
            message: message.into(),
        }
    }
}

impl From<BookingError> for ErrorPayload {
    fn from(err: BookingError) -> Self {
        Self {
            code: err.code().into(),
            message: err.to_string(),
        }
    }
}

impl From<DatabaseError> for ErrorPayload {
    fn from(err: DatabaseError) -> Self {
        let code = match &err {
            DatabaseError::NotFound { .. } => "not_found",
            DatabaseError::InvalidEnum { .. } => "validation_error",
            _ => "external_service_error",
        };
        Self {
            code: code.into(),
            message: err.to_string(),
        }
    }
}

/// Parses an id argument coming from the frontend.
pub(crate) fn parse_id_arg(raw: &str) -> Result<Uuid, ErrorPayload> {
    Uuid::parse_str(raw).map_err(|_| ErrorPayload::validation(format!("invalid id: {raw}")))
}

/// Parses an ISO-8601 instant argument coming from the frontend.
pub(crate) fn parse_instant_arg(raw: &str) -> Result<DateTime<Utc>, ErrorPayload> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| ErrorPayload::validation(format!("invalid timestamp: {raw}")))
}

/// Health check IPC command — verifies backend is running
#[tauri::command]
pub fn health_check() -> String {
    tracing::debug!("Health check called");
    "ok".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_check_returns_ok() {
        assert_eq!(health_check(), "ok");
    }

    #[test]
    fn error_payload_serializes_code_and_message() {
        let payload = ErrorPayload::validation("at least one sub-service required");
        let json = serde_json::to_string(&payload).unwrap();
        assert!(json.contains("\"code\":\"validation_error\""));
        assert!(json.contains("at least one sub-service required"));
    }

    #[test]
    fn booking_error_maps_to_its_code() {
        let payload: ErrorPayload = BookingError::BusinessRule("no contact".into()).into();
        assert_eq!(payload.code, "business_logic_error");
        assert_eq!(payload.message, "no contact");
    }

    #[test]
    fn database_not_found_maps_to_not_found() {
        let payload: ErrorPayload = DatabaseError::NotFound {
            entity_type: "client".into(),
            id: "abc".into(),
        }
        .into();
        assert_eq!(payload.code, "not_found");
    }

    #[test]
    fn other_database_errors_are_external() {
        let payload: ErrorPayload =
            DatabaseError::ConstraintViolation("boom".into()).into();
        assert_eq!(payload.code, "external_service_error");
    }

    #[test]
    fn id_arg_rejects_garbage() {
        assert!(parse_id_arg("not-a-uuid").is_err());
        assert!(parse_id_arg(&Uuid::new_v4().to_string()).is_ok());
    }
}
