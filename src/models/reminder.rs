use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::ReminderStatus;

/// A scheduled outbound message. Delivery itself is performed by an external
/// messaging integration; this record only tracks what should be sent, when,
/// and what the integration reported back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reminder {
    pub id: Uuid,
    pub client_id: Uuid,
    /// Contact string the message is addressed to (client phone at
    /// scheduling time).
    pub recipient: String,
    pub send_at: DateTime<Utc>,
    pub status: ReminderStatus,
    /// Originating appointment, when scheduled from a booking.
    pub appointment_id: Option<Uuid>,
    /// Opaque payloads exchanged with the messaging integration.
    pub request_payload: Option<String>,
    pub response_payload: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
