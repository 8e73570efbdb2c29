use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::Sex;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: Uuid,
    pub display_name: String,
    /// Contact channel used for reminders (phone number, typically WhatsApp).
    pub phone: Option<String>,
    pub email: Option<String>,
    pub is_minor: bool,
    /// Required whenever `is_minor` is set.
    pub guardian_name: Option<String>,
    pub sex: Option<Sex>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}
