//! Appointment booking — the one write path that touches several tables.
//!
//! Creating or editing an appointment has to keep three things consistent:
//! the appointment row, its line items (each snapshotting a sub-service
//! price), and the optional scheduled reminder. All validation happens up
//! front, before any write; the writes themselves run inside a single SQLite
//! transaction, so a mid-sequence failure leaves no partial appointment
//! behind.
//!
//! Line items are always replaced wholesale — never diffed field by field —
//! and the denormalized `total_amount` is recomputed from the new set in the
//! same transaction.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::DEFAULT_REMINDER_LEAD_MINUTES;
use crate::db::{repository, DatabaseError};
use crate::models::{Appointment, AppointmentDetail, AppointmentItem, Client, SubService};
use crate::reminders;

// ─── Errors ───────────────────────────────────────────────────────────────────

/// Classified failure surfaced at the booking boundary. Lower-layer errors
/// never escape untyped.
#[derive(Debug, Error)]
pub enum BookingError {
    /// Malformed or missing input; the message is safe to show verbatim.
    #[error("{0}")]
    Validation(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// State-dependent rule violation, e.g. a reminder requested for a
    /// client without a contact channel.
    #[error("{0}")]
    BusinessRule(String),

    /// Backing store failure.
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl BookingError {
    /// Stable machine-readable code, serialized next to the message.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::NotFound { .. } => "not_found",
            Self::BusinessRule(_) => "business_logic_error",
            Self::Database(_) => "external_service_error",
        }
    }
}

// ─── Requests ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAppointmentRequest {
    pub client_id: String,
    /// ISO-8601 instant. Past values are accepted on purpose — the business
    /// records historical appointments after the fact.
    pub scheduled_at: String,
    pub sub_service_ids: Vec<String>,
    pub notes: Option<String>,
    #[serde(default)]
    pub send_reminder: bool,
    /// Minutes before `scheduled_at` the reminder should go out.
    /// Defaults to [`DEFAULT_REMINDER_LEAD_MINUTES`].
    pub reminder_lead_minutes: Option<i64>,
}

/// Partial edit. Absent fields are left untouched; a present
/// `sub_service_ids` replaces the whole selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAppointmentRequest {
    pub client_id: Option<String>,
    pub scheduled_at: Option<String>,
    pub sub_service_ids: Option<Vec<String>>,
    pub notes: Option<String>,
    pub cancelled: Option<bool>,
}

// ─── Operations ───────────────────────────────────────────────────────────────

/// Books an appointment: validates every referenced entity, computes the
/// total from authoritative catalog prices, then writes the appointment, its
/// line items and the optional reminder in one transaction.
pub fn create(
    conn: &mut Connection,
    request: &CreateAppointmentRequest,
) -> Result<AppointmentDetail, BookingError> {
    // Validation, in order, before any write.
    let client = resolve_client(conn, &request.client_id)?;
    let selection = resolve_selection(conn, &request.sub_service_ids)?;
    let scheduled_at = parse_instant(&request.scheduled_at)?;

    if request.send_reminder && !client_has_contact(&client) {
        return Err(BookingError::BusinessRule(format!(
            "reminder requested but client {} has no contact channel",
            client.id
        )));
    }

    let total: i64 = selection.iter().map(|s| s.price).sum();
    let now = Utc::now();
    let appointment = Appointment {
        id: Uuid::new_v4(),
        client_id: client.id,
        scheduled_at,
        total_amount: total,
        cancelled: false,
        notes: request.notes.clone(),
        reminder_requested: request.send_reminder,
        created_at: now,
        updated_at: now,
    };
    let items = snapshot_items(&appointment.id, &selection);

    let tx = conn.transaction().map_err(DatabaseError::from)?;
    repository::insert_appointment(&tx, &appointment)?;
    for item in &items {
        repository::insert_appointment_item(&tx, item)?;
    }
    if request.send_reminder {
        let lead = request
            .reminder_lead_minutes
            .unwrap_or(DEFAULT_REMINDER_LEAD_MINUTES);
        reminders::schedule_for_appointment(&tx, &client, &appointment, lead)?;
    }
    tx.commit().map_err(DatabaseError::from)?;

    tracing::info!(
        appointment_id = %appointment.id,
        client_id = %client.id,
        total,
        items = items.len(),
        "Appointment booked"
    );

    get(conn, &appointment.id)
}

/// Applies a partial edit. A present sub-service list fully replaces the
/// existing line items and recomputes the total inside the same transaction;
/// an absent list patches scalars only and leaves the total untouched.
pub fn update(
    conn: &mut Connection,
    id: &Uuid,
    request: &UpdateAppointmentRequest,
) -> Result<AppointmentDetail, BookingError> {
    let existing = repository::get_appointment(conn, id)?.ok_or_else(|| BookingError::NotFound {
        entity: "appointment",
        id: id.to_string(),
    })?;

    // Re-validate whatever was provided, exactly as on create.
    let client_id = match &request.client_id {
        Some(raw) => resolve_client(conn, raw)?.id,
        None => existing.client_id,
    };
    let scheduled_at = match &request.scheduled_at {
        Some(raw) => parse_instant(raw)?,
        None => existing.scheduled_at,
    };
    let selection = match &request.sub_service_ids {
        Some(ids) => Some(resolve_selection(conn, ids)?),
        None => None,
    };

    let updated = Appointment {
        id: existing.id,
        client_id,
        scheduled_at,
        total_amount: match &selection {
            Some(subs) => subs.iter().map(|s| s.price).sum(),
            None => existing.total_amount,
        },
        cancelled: request.cancelled.unwrap_or(existing.cancelled),
        notes: request.notes.clone().or(existing.notes),
        reminder_requested: existing.reminder_requested,
        created_at: existing.created_at,
        updated_at: existing.updated_at,
    };

    let tx = conn.transaction().map_err(DatabaseError::from)?;
    repository::update_appointment(&tx, &updated)?;
    if let Some(subs) = &selection {
        let items = snapshot_items(&updated.id, subs);
        repository::replace_line_items(&tx, &updated.id, &items)?;
    }
    tx.commit().map_err(DatabaseError::from)?;

    tracing::info!(
        appointment_id = %updated.id,
        replaced_selection = selection.is_some(),
        "Appointment updated"
    );

    get(conn, id)
}

/// Marks the appointment cancelled. Idempotent; line items and reminders are
/// untouched so the history stays reportable.
pub fn cancel(conn: &Connection, id: &Uuid) -> Result<AppointmentDetail, BookingError> {
    set_cancelled_flag(conn, id, true)
}

/// Clears the cancelled flag, returning the appointment to its pre-cancel
/// state.
pub fn restore(conn: &Connection, id: &Uuid) -> Result<AppointmentDetail, BookingError> {
    set_cancelled_flag(conn, id, false)
}

/// The appointment joined with line items and reminder — the shape every
/// booking operation returns.
pub fn get(conn: &Connection, id: &Uuid) -> Result<AppointmentDetail, BookingError> {
    let appointment = repository::get_appointment(conn, id)?.ok_or_else(|| BookingError::NotFound {
        entity: "appointment",
        id: id.to_string(),
    })?;
    let items = repository::get_appointment_items(conn, id)?;
    let reminder = repository::get_reminder_by_appointment(conn, id)?;

    Ok(AppointmentDetail {
        appointment,
        items,
        reminder,
    })
}

// ─── Internal helpers ─────────────────────────────────────────────────────────

fn set_cancelled_flag(
    conn: &Connection,
    id: &Uuid,
    cancelled: bool,
) -> Result<AppointmentDetail, BookingError> {
    if repository::get_appointment(conn, id)?.is_none() {
        return Err(BookingError::NotFound {
            entity: "appointment",
            id: id.to_string(),
        });
    }
    repository::set_cancelled(conn, id, cancelled)?;
    get(conn, id)
}

fn resolve_client(conn: &Connection, raw_id: &str) -> Result<Client, BookingError> {
    let id = parse_id(raw_id, "client")?;
    let client = repository::get_client(conn, &id)?.ok_or_else(|| BookingError::NotFound {
        entity: "client",
        id: id.to_string(),
    })?;
    if client.deleted_at.is_some() {
        return Err(BookingError::NotFound {
            entity: "client",
            id: id.to_string(),
        });
    }
    Ok(client)
}

/// Parses, de-duplicates (request order preserved) and batch-resolves the
/// selection. A partial match is an error naming every missing id — ids are
/// never silently dropped.
fn resolve_selection(
    conn: &Connection,
    raw_ids: &[String],
) -> Result<Vec<SubService>, BookingError> {
    if raw_ids.is_empty() {
        return Err(BookingError::Validation(
            "at least one sub-service required".into(),
        ));
    }

    let mut unique_ids: Vec<Uuid> = Vec::new();
    for raw in raw_ids {
        let id = parse_id(raw, "sub-service")?;
        if !unique_ids.contains(&id) {
            unique_ids.push(id);
        }
    }

    let resolved = repository::get_sub_services_by_ids(conn, &unique_ids)?;
    if resolved.len() != unique_ids.len() {
        let found: HashSet<Uuid> = resolved.iter().map(|s| s.id).collect();
        let missing: Vec<String> = unique_ids
            .iter()
            .filter(|id| !found.contains(id))
            .map(|id| id.to_string())
            .collect();
        return Err(BookingError::Validation(format!(
            "unknown sub-services: {}",
            missing.join(", ")
        )));
    }

    // Back into request order — IN (…) returns rows in storage order.
    let ordered = unique_ids
        .iter()
        .map(|id| {
            resolved
                .iter()
                .find(|s| s.id == *id)
                .expect("resolved set was just checked against unique_ids")
                .clone()
        })
        .collect();
    Ok(ordered)
}

fn snapshot_items(appointment_id: &Uuid, selection: &[SubService]) -> Vec<AppointmentItem> {
    selection
        .iter()
        .map(|sub| AppointmentItem {
            id: Uuid::new_v4(),
            appointment_id: *appointment_id,
            sub_service_id: sub.id,
            sub_service_name: None,
            price: sub.price,
        })
        .collect()
}

fn client_has_contact(client: &Client) -> bool {
    client
        .phone
        .as_deref()
        .is_some_and(|p| !p.trim().is_empty())
}

fn parse_id(raw: &str, entity: &str) -> Result<Uuid, BookingError> {
    Uuid::parse_str(raw)
        .map_err(|_| BookingError::Validation(format!("invalid {entity} id: {raw}")))
}

fn parse_instant(raw: &str) -> Result<DateTime<Utc>, BookingError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| BookingError::Validation(format!("invalid timestamp: {raw}")))
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use super::*;
    use crate::db::sqlite::open_memory_database;
    use crate::models::enums::ReminderStatus;
    use crate::models::Service;

    fn test_db() -> Connection {
        open_memory_database().unwrap()
    }

    fn seed_client(conn: &Connection, phone: Option<&str>) -> Client {
        let now = Utc::now();
        let client = Client {
            id: Uuid::new_v4(),
            display_name: "Ana Benítez".into(),
            phone: phone.map(|p| p.to_string()),
            email: None,
            is_minor: false,
            guardian_name: None,
            sex: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        repository::insert_client(conn, &client).unwrap();
        client
    }

    fn seed_sub_service(conn: &Connection, name: &str, price: i64) -> SubService {
        let now = Utc::now();
        let service = Service {
            id: Uuid::new_v4(),
            name: "Peluquería".into(),
            created_at: now,
            deleted_at: None,
        };
        repository::insert_service(conn, &service).unwrap();

        let sub = SubService {
            id: Uuid::new_v4(),
            service_id: service.id,
            name: name.into(),
            price,
            created_at: now,
            deleted_at: None,
        };
        repository::insert_sub_service(conn, &sub).unwrap();
        sub
    }

    fn create_request(client: &Client, subs: &[&SubService]) -> CreateAppointmentRequest {
        CreateAppointmentRequest {
            client_id: client.id.to_string(),
            scheduled_at: "2025-03-01T10:00:00Z".into(),
            sub_service_ids: subs.iter().map(|s| s.id.to_string()).collect(),
            notes: None,
            send_reminder: false,
            reminder_lead_minutes: None,
        }
    }

    fn count(conn: &Connection, table: &str) -> i64 {
        conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))
            .unwrap()
    }

    #[test]
    fn create_totals_snapshot_prices() {
        let mut conn = test_db();
        let client = seed_client(&conn, None);
        let s1 = seed_sub_service(&conn, "Corte", 50000);
        let s2 = seed_sub_service(&conn, "Tinte", 30000);

        let detail = create(&mut conn, &create_request(&client, &[&s1, &s2])).unwrap();

        assert_eq!(detail.appointment.total_amount, 80000);
        assert_eq!(detail.items.len(), 2);
        assert!(!detail.appointment.cancelled);
        assert!(detail.reminder.is_none());
    }

    #[test]
    fn duplicate_selection_counts_once() {
        let mut conn = test_db();
        let client = seed_client(&conn, None);
        let s1 = seed_sub_service(&conn, "Corte", 50000);

        let detail = create(&mut conn, &create_request(&client, &[&s1, &s1])).unwrap();

        assert_eq!(detail.appointment.total_amount, 50000);
        assert_eq!(detail.items.len(), 1);
    }

    #[test]
    fn reminder_scheduled_with_lead_time() {
        let mut conn = test_db();
        let client = seed_client(&conn, Some("+595981111111"));
        let s1 = seed_sub_service(&conn, "Corte", 50000);

        let mut request = create_request(&client, &[&s1]);
        request.send_reminder = true;
        request.reminder_lead_minutes = Some(30);

        let detail = create(&mut conn, &request).unwrap();
        let reminder = detail.reminder.expect("reminder should be scheduled");

        assert_eq!(reminder.status, ReminderStatus::Pending);
        assert_eq!(reminder.recipient, "+595981111111");
        assert_eq!(reminder.appointment_id, Some(detail.appointment.id));
        assert_eq!(
            reminder.send_at,
            detail.appointment.scheduled_at - chrono::Duration::minutes(30)
        );
    }

    #[test]
    fn reminder_lead_defaults_to_one_hour() {
        let mut conn = test_db();
        let client = seed_client(&conn, Some("+595981111111"));
        let s1 = seed_sub_service(&conn, "Corte", 50000);

        let mut request = create_request(&client, &[&s1]);
        request.send_reminder = true;

        let detail = create(&mut conn, &request).unwrap();
        let reminder = detail.reminder.unwrap();
        assert_eq!(
            reminder.send_at,
            detail.appointment.scheduled_at - chrono::Duration::minutes(60)
        );
    }

    #[test]
    fn reminder_without_contact_is_business_rule_and_writes_nothing() {
        let mut conn = test_db();
        let client = seed_client(&conn, None);
        let s1 = seed_sub_service(&conn, "Corte", 50000);

        let mut request = create_request(&client, &[&s1]);
        request.send_reminder = true;

        let err = create(&mut conn, &request).unwrap_err();
        assert!(matches!(err, BookingError::BusinessRule(_)));
        assert_eq!(err.code(), "business_logic_error");
        assert_eq!(count(&conn, "appointments"), 0);
        assert_eq!(count(&conn, "reminders"), 0);
    }

    #[test]
    fn empty_selection_is_validation_and_writes_nothing() {
        let mut conn = test_db();
        let client = seed_client(&conn, None);

        let request = create_request(&client, &[]);
        let err = create(&mut conn, &request).unwrap_err();

        assert!(matches!(err, BookingError::Validation(_)));
        assert_eq!(err.to_string(), "at least one sub-service required");
        assert_eq!(count(&conn, "appointments"), 0);
    }

    #[test]
    fn partial_resolution_names_missing_ids_and_writes_nothing() {
        let mut conn = test_db();
        let client = seed_client(&conn, None);
        let s1 = seed_sub_service(&conn, "Corte", 50000);
        let ghost = Uuid::new_v4();

        let mut request = create_request(&client, &[&s1]);
        request.sub_service_ids.push(ghost.to_string());

        let err = create(&mut conn, &request).unwrap_err();
        assert!(matches!(err, BookingError::Validation(_)));
        assert!(err.to_string().contains(&ghost.to_string()));
        assert_eq!(count(&conn, "appointments"), 0);
        assert_eq!(count(&conn, "appointment_items"), 0);
    }

    #[test]
    fn unknown_client_is_not_found() {
        let mut conn = test_db();
        let s1 = seed_sub_service(&conn, "Corte", 50000);

        let request = CreateAppointmentRequest {
            client_id: Uuid::new_v4().to_string(),
            scheduled_at: "2025-03-01T10:00:00Z".into(),
            sub_service_ids: vec![s1.id.to_string()],
            notes: None,
            send_reminder: false,
            reminder_lead_minutes: None,
        };

        let err = create(&mut conn, &request).unwrap_err();
        assert!(matches!(err, BookingError::NotFound { entity: "client", .. }));
        assert_eq!(err.code(), "not_found");
    }

    #[test]
    fn soft_deleted_client_is_not_found() {
        let mut conn = test_db();
        let client = seed_client(&conn, None);
        let s1 = seed_sub_service(&conn, "Corte", 50000);
        repository::soft_delete_client(&conn, &client.id).unwrap();

        let err = create(&mut conn, &create_request(&client, &[&s1])).unwrap_err();
        assert!(matches!(err, BookingError::NotFound { .. }));
    }

    #[test]
    fn malformed_timestamp_is_validation() {
        let mut conn = test_db();
        let client = seed_client(&conn, None);
        let s1 = seed_sub_service(&conn, "Corte", 50000);

        let mut request = create_request(&client, &[&s1]);
        request.scheduled_at = "01/03/2025 10:00".into();

        let err = create(&mut conn, &request).unwrap_err();
        assert!(matches!(err, BookingError::Validation(_)));
    }

    #[test]
    fn past_timestamp_is_accepted() {
        let mut conn = test_db();
        let client = seed_client(&conn, None);
        let s1 = seed_sub_service(&conn, "Corte", 50000);

        let mut request = create_request(&client, &[&s1]);
        request.scheduled_at = "2019-06-15T14:00:00Z".into();

        let detail = create(&mut conn, &request).unwrap();
        assert_eq!(
            detail.appointment.scheduled_at,
            DateTime::parse_from_rfc3339("2019-06-15T14:00:00Z").unwrap()
        );
    }

    #[test]
    fn update_replaces_selection_wholesale() {
        let mut conn = test_db();
        let client = seed_client(&conn, None);
        let s1 = seed_sub_service(&conn, "Corte", 50000);
        let s2 = seed_sub_service(&conn, "Tinte", 30000);

        let created = create(&mut conn, &create_request(&client, &[&s1, &s2])).unwrap();

        let request = UpdateAppointmentRequest {
            sub_service_ids: Some(vec![s2.id.to_string()]),
            ..Default::default()
        };
        let updated = update(&mut conn, &created.appointment.id, &request).unwrap();

        assert_eq!(updated.appointment.total_amount, 30000);
        assert_eq!(updated.items.len(), 1);
        assert_eq!(updated.items[0].sub_service_id, s2.id);
    }

    #[test]
    fn update_resnapshots_current_prices() {
        let mut conn = test_db();
        let client = seed_client(&conn, None);
        let mut s1 = seed_sub_service(&conn, "Corte", 50000);

        let created = create(&mut conn, &create_request(&client, &[&s1])).unwrap();

        s1.price = 60000;
        repository::update_sub_service(&conn, &s1).unwrap();

        let request = UpdateAppointmentRequest {
            sub_service_ids: Some(vec![s1.id.to_string()]),
            ..Default::default()
        };
        let updated = update(&mut conn, &created.appointment.id, &request).unwrap();

        assert_eq!(updated.appointment.total_amount, 60000);
        assert_eq!(updated.items[0].price, 60000);
    }

    #[test]
    fn update_without_selection_leaves_total_untouched() {
        let mut conn = test_db();
        let client = seed_client(&conn, None);
        let s1 = seed_sub_service(&conn, "Corte", 50000);

        let created = create(&mut conn, &create_request(&client, &[&s1])).unwrap();

        let request = UpdateAppointmentRequest {
            notes: Some("llega 10 min tarde".into()),
            ..Default::default()
        };
        let updated = update(&mut conn, &created.appointment.id, &request).unwrap();

        assert_eq!(updated.appointment.total_amount, 50000);
        assert_eq!(updated.items.len(), 1);
        assert_eq!(updated.appointment.notes.as_deref(), Some("llega 10 min tarde"));
    }

    #[test]
    fn update_validates_provided_client() {
        let mut conn = test_db();
        let client = seed_client(&conn, None);
        let s1 = seed_sub_service(&conn, "Corte", 50000);

        let created = create(&mut conn, &create_request(&client, &[&s1])).unwrap();

        let request = UpdateAppointmentRequest {
            client_id: Some(Uuid::new_v4().to_string()),
            ..Default::default()
        };
        let err = update(&mut conn, &created.appointment.id, &request).unwrap_err();
        assert!(matches!(err, BookingError::NotFound { entity: "client", .. }));
    }

    #[test]
    fn update_with_empty_selection_is_validation() {
        let mut conn = test_db();
        let client = seed_client(&conn, None);
        let s1 = seed_sub_service(&conn, "Corte", 50000);

        let created = create(&mut conn, &create_request(&client, &[&s1])).unwrap();

        let request = UpdateAppointmentRequest {
            sub_service_ids: Some(vec![]),
            ..Default::default()
        };
        let err = update(&mut conn, &created.appointment.id, &request).unwrap_err();
        assert!(matches!(err, BookingError::Validation(_)));

        // Prior selection untouched
        let detail = get(&conn, &created.appointment.id).unwrap();
        assert_eq!(detail.items.len(), 1);
    }

    #[test]
    fn update_missing_appointment_is_not_found() {
        let mut conn = test_db();
        let err = update(&mut conn, &Uuid::new_v4(), &UpdateAppointmentRequest::default())
            .unwrap_err();
        assert!(matches!(err, BookingError::NotFound { entity: "appointment", .. }));
    }

    #[test]
    fn cancel_then_restore_preserves_everything_else() {
        let mut conn = test_db();
        let client = seed_client(&conn, None);
        let s1 = seed_sub_service(&conn, "Corte", 50000);
        let s2 = seed_sub_service(&conn, "Tinte", 30000);

        let created = create(&mut conn, &create_request(&client, &[&s1, &s2])).unwrap();
        let id = created.appointment.id;

        let cancelled = cancel(&conn, &id).unwrap();
        assert!(cancelled.appointment.cancelled);
        assert_eq!(cancelled.appointment.total_amount, 80000);
        assert_eq!(cancelled.items.len(), 2);

        // Idempotent: cancelling again is a no-op
        cancel(&conn, &id).unwrap();

        let restored = restore(&conn, &id).unwrap();
        assert!(!restored.appointment.cancelled);
        assert_eq!(restored.appointment.total_amount, 80000);
        assert_eq!(restored.appointment.scheduled_at, created.appointment.scheduled_at);
        assert_eq!(restored.items.len(), 2);
    }

    #[test]
    fn cancel_missing_appointment_is_not_found() {
        let conn = test_db();
        let err = cancel(&conn, &Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, BookingError::NotFound { .. }));
    }

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(BookingError::Validation("x".into()).code(), "validation_error");
        assert_eq!(
            BookingError::NotFound { entity: "client", id: "y".into() }.code(),
            "not_found"
        );
        assert_eq!(BookingError::BusinessRule("z".into()).code(), "business_logic_error");
        assert_eq!(
            BookingError::Database(DatabaseError::ConstraintViolation("w".into())).code(),
            "external_service_error"
        );
    }
}
