use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub client_id: Uuid,
    pub scheduled_at: DateTime<Utc>,
    /// Derived: always the sum of the current line items' snapshot prices.
    pub total_amount: i64,
    /// Business state, not a deletion — a cancelled appointment keeps its
    /// full line-item history.
    pub cancelled: bool,
    pub notes: Option<String>,
    pub reminder_requested: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Line item: one selected sub-service with its price frozen at booking time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentItem {
    pub id: Uuid,
    pub appointment_id: Uuid,
    pub sub_service_id: Uuid,
    /// Joined from sub_services for display; not persisted on the item row.
    pub sub_service_name: Option<String>,
    pub price: i64,
}

/// Appointment joined with its line items (and reminder, if one was
/// scheduled at booking time) — the shape returned to callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentDetail {
    pub appointment: Appointment,
    pub items: Vec<AppointmentItem>,
    pub reminder: Option<super::Reminder>,
}
