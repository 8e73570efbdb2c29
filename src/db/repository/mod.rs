//! Repository layer — entity-scoped database operations.
//!
//! One sub-module per entity family. No business rules live here: booking
//! validation belongs to the `booking` module, and these functions assume
//! their inputs were already checked.

mod appointment;
mod catalog;
mod client;
mod reminder;
mod template;

pub use appointment::*;
pub use catalog::*;
pub use client::*;
pub use reminder::*;
pub use template::*;

use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;

/// Canonical column format for instants: RFC 3339 UTC with a `Z` suffix and
/// second precision. One format everywhere keeps string comparison in SQL
/// consistent with chronological order.
pub(crate) fn format_instant(t: &DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub(crate) fn parse_instant(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or(DateTime::UNIX_EPOCH)
}

pub(crate) fn parse_instant_opt(s: Option<String>) -> Option<DateTime<Utc>> {
    s.and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
        .map(|t| t.with_timezone(&Utc))
}

pub(crate) fn parse_uuid(s: &str) -> Uuid {
    Uuid::parse_str(s).unwrap_or_default()
}
