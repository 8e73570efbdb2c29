use chrono::Utc;
use rusqlite::{params, Connection};
use uuid::Uuid;

use super::{format_instant, parse_instant, parse_instant_opt, parse_uuid};
use crate::db::DatabaseError;
use crate::models::{Service, SubService};

// ─── Services ─────────────────────────────────────────────────────────────────

pub fn insert_service(conn: &Connection, service: &Service) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO services (id, name, created_at, deleted_at) VALUES (?1, ?2, ?3, ?4)",
        params![
            service.id.to_string(),
            service.name,
            format_instant(&service.created_at),
            service.deleted_at.map(|t| format_instant(&t)),
        ],
    )?;
    Ok(())
}

pub fn get_service(conn: &Connection, id: &Uuid) -> Result<Option<Service>, DatabaseError> {
    let result = conn
        .prepare("SELECT id, name, created_at, deleted_at FROM services WHERE id = ?1")?
        .query_row(params![id.to_string()], service_from_row);

    match result {
        Ok(service) => Ok(Some(service)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_all_services(conn: &Connection) -> Result<Vec<Service>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, created_at, deleted_at FROM services
         WHERE deleted_at IS NULL
         ORDER BY name COLLATE NOCASE",
    )?;

    let rows = stmt.query_map([], service_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn rename_service(conn: &Connection, id: &Uuid, name: &str) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE services SET name = ?2 WHERE id = ?1",
        params![id.to_string(), name],
    )?;

    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "service".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

pub fn soft_delete_service(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE services SET deleted_at = ?2 WHERE id = ?1 AND deleted_at IS NULL",
        params![id.to_string(), format_instant(&Utc::now())],
    )?;

    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "service".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

fn service_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Service> {
    Ok(Service {
        id: parse_uuid(&row.get::<_, String>(0)?),
        name: row.get(1)?,
        created_at: parse_instant(&row.get::<_, String>(2)?),
        deleted_at: parse_instant_opt(row.get::<_, Option<String>>(3)?),
    })
}

// ─── Sub-services ─────────────────────────────────────────────────────────────

pub fn insert_sub_service(conn: &Connection, sub: &SubService) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO sub_services (id, service_id, name, price, created_at, deleted_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            sub.id.to_string(),
            sub.service_id.to_string(),
            sub.name,
            sub.price,
            format_instant(&sub.created_at),
            sub.deleted_at.map(|t| format_instant(&t)),
        ],
    )?;
    Ok(())
}

pub fn get_sub_service(conn: &Connection, id: &Uuid) -> Result<Option<SubService>, DatabaseError> {
    let result = conn
        .prepare(
            "SELECT id, service_id, name, price, created_at, deleted_at
             FROM sub_services WHERE id = ?1",
        )?
        .query_row(params![id.to_string()], sub_service_from_row);

    match result {
        Ok(sub) => Ok(Some(sub)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Batch lookup used by booking. Returns only the rows that exist — the
/// caller diffs the result against the requested set to detect missing ids.
/// Soft-deleted sub-services still resolve here: they stay valid on existing
/// appointments and are only hidden from new-selection listings.
pub fn get_sub_services_by_ids(
    conn: &Connection,
    ids: &[Uuid],
) -> Result<Vec<SubService>, DatabaseError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = (1..=ids.len())
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!(
        "SELECT id, service_id, name, price, created_at, deleted_at
         FROM sub_services WHERE id IN ({placeholders})"
    );

    let id_strings: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(
        rusqlite::params_from_iter(id_strings.iter()),
        sub_service_from_row,
    )?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

/// Sub-services offered for new bookings: excludes soft-deleted rows.
pub fn get_selectable_sub_services(conn: &Connection) -> Result<Vec<SubService>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, service_id, name, price, created_at, deleted_at
         FROM sub_services
         WHERE deleted_at IS NULL
         ORDER BY name COLLATE NOCASE",
    )?;

    let rows = stmt.query_map([], sub_service_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn get_sub_services_by_service(
    conn: &Connection,
    service_id: &Uuid,
) -> Result<Vec<SubService>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, service_id, name, price, created_at, deleted_at
         FROM sub_services
         WHERE service_id = ?1 AND deleted_at IS NULL
         ORDER BY name COLLATE NOCASE",
    )?;

    let rows = stmt.query_map(params![service_id.to_string()], sub_service_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn update_sub_service(conn: &Connection, sub: &SubService) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE sub_services SET service_id = ?2, name = ?3, price = ?4 WHERE id = ?1",
        params![
            sub.id.to_string(),
            sub.service_id.to_string(),
            sub.name,
            sub.price,
        ],
    )?;

    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "sub_service".into(),
            id: sub.id.to_string(),
        });
    }
    Ok(())
}

pub fn soft_delete_sub_service(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE sub_services SET deleted_at = ?2 WHERE id = ?1 AND deleted_at IS NULL",
        params![id.to_string(), format_instant(&Utc::now())],
    )?;

    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "sub_service".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

fn sub_service_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<SubService> {
    Ok(SubService {
        id: parse_uuid(&row.get::<_, String>(0)?),
        service_id: parse_uuid(&row.get::<_, String>(1)?),
        name: row.get(2)?,
        price: row.get(3)?,
        created_at: parse_instant(&row.get::<_, String>(4)?),
        deleted_at: parse_instant_opt(row.get::<_, Option<String>>(5)?),
    })
}
