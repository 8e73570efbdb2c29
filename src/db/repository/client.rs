use std::str::FromStr;

use chrono::Utc;
use rusqlite::{params, Connection};
use uuid::Uuid;

use super::{format_instant, parse_instant, parse_instant_opt, parse_uuid};
use crate::db::DatabaseError;
use crate::models::enums::Sex;
use crate::models::Client;

const CLIENT_COLUMNS: &str = "id, display_name, phone, email, is_minor, guardian_name, sex,
         created_at, updated_at, deleted_at";

pub fn insert_client(conn: &Connection, client: &Client) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO clients (id, display_name, phone, email, is_minor, guardian_name, sex,
         created_at, updated_at, deleted_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            client.id.to_string(),
            client.display_name,
            client.phone,
            client.email,
            client.is_minor as i32,
            client.guardian_name,
            client.sex.map(|s| s.as_str()),
            format_instant(&client.created_at),
            format_instant(&client.updated_at),
            client.deleted_at.map(|t| format_instant(&t)),
        ],
    )?;
    Ok(())
}

pub fn get_client(conn: &Connection, id: &Uuid) -> Result<Option<Client>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {CLIENT_COLUMNS} FROM clients WHERE id = ?1"
    ))?;

    let result = stmt.query_row(params![id.to_string()], client_from_row);

    match result {
        Ok(client) => Ok(Some(client)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// All clients that have not been soft-deleted, ordered by display name.
pub fn get_all_clients(conn: &Connection) -> Result<Vec<Client>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {CLIENT_COLUMNS} FROM clients
         WHERE deleted_at IS NULL
         ORDER BY display_name COLLATE NOCASE"
    ))?;

    let rows = stmt.query_map([], client_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

/// Patches all mutable fields and touches updated_at.
pub fn update_client(conn: &Connection, client: &Client) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE clients
         SET display_name = ?2, phone = ?3, email = ?4, is_minor = ?5,
             guardian_name = ?6, sex = ?7, updated_at = ?8
         WHERE id = ?1",
        params![
            client.id.to_string(),
            client.display_name,
            client.phone,
            client.email,
            client.is_minor as i32,
            client.guardian_name,
            client.sex.map(|s| s.as_str()),
            format_instant(&Utc::now()),
        ],
    )?;

    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "client".into(),
            id: client.id.to_string(),
        });
    }
    Ok(())
}

/// Soft delete: the row stays (appointments keep their foreign key), it just
/// disappears from listings.
pub fn soft_delete_client(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let now = format_instant(&Utc::now());
    let changed = conn.execute(
        "UPDATE clients SET deleted_at = ?2, updated_at = ?2 WHERE id = ?1 AND deleted_at IS NULL",
        params![id.to_string(), now],
    )?;

    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "client".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

fn client_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Client> {
    Ok(Client {
        id: parse_uuid(&row.get::<_, String>(0)?),
        display_name: row.get(1)?,
        phone: row.get(2)?,
        email: row.get(3)?,
        is_minor: row.get::<_, i32>(4)? != 0,
        guardian_name: row.get(5)?,
        sex: row
            .get::<_, Option<String>>(6)?
            .and_then(|s| Sex::from_str(&s).ok()),
        created_at: parse_instant(&row.get::<_, String>(7)?),
        updated_at: parse_instant(&row.get::<_, String>(8)?),
        deleted_at: parse_instant_opt(row.get::<_, Option<String>>(9)?),
    })
}
