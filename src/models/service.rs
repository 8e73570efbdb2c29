use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Service category (e.g. "Peluquería", "Manicura").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// A priced, bookable unit of work belonging to a Service category.
///
/// The price here is authoritative only at booking time; appointment line
/// items snapshot it and never re-read it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubService {
    pub id: Uuid,
    pub service_id: Uuid,
    pub name: String,
    /// Smallest currency unit (whole guaraníes), never negative.
    pub price: i64,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}
