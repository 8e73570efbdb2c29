use chrono::Utc;
use rusqlite::{params, Connection};
use uuid::Uuid;

use super::{format_instant, parse_instant, parse_instant_opt, parse_uuid};
use crate::db::DatabaseError;
use crate::models::MessageTemplate;

pub fn insert_template(conn: &Connection, template: &MessageTemplate) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO message_templates (id, name, body, created_at, updated_at, deleted_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            template.id.to_string(),
            template.name,
            template.body,
            format_instant(&template.created_at),
            format_instant(&template.updated_at),
            template.deleted_at.map(|t| format_instant(&t)),
        ],
    )?;
    Ok(())
}

pub fn get_template(conn: &Connection, id: &Uuid) -> Result<Option<MessageTemplate>, DatabaseError> {
    let result = conn
        .prepare(
            "SELECT id, name, body, created_at, updated_at, deleted_at
             FROM message_templates WHERE id = ?1",
        )?
        .query_row(params![id.to_string()], template_from_row);

    match result {
        Ok(template) => Ok(Some(template)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_all_templates(conn: &Connection) -> Result<Vec<MessageTemplate>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, body, created_at, updated_at, deleted_at
         FROM message_templates
         WHERE deleted_at IS NULL
         ORDER BY name COLLATE NOCASE",
    )?;

    let rows = stmt.query_map([], template_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn update_template(conn: &Connection, template: &MessageTemplate) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE message_templates SET name = ?2, body = ?3, updated_at = ?4 WHERE id = ?1",
        params![
            template.id.to_string(),
            template.name,
            template.body,
            format_instant(&Utc::now()),
        ],
    )?;

    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "message_template".into(),
            id: template.id.to_string(),
        });
    }
    Ok(())
}

pub fn soft_delete_template(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let now = format_instant(&Utc::now());
    let changed = conn.execute(
        "UPDATE message_templates SET deleted_at = ?2, updated_at = ?2
         WHERE id = ?1 AND deleted_at IS NULL",
        params![id.to_string(), now],
    )?;

    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "message_template".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

fn template_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<MessageTemplate> {
    Ok(MessageTemplate {
        id: parse_uuid(&row.get::<_, String>(0)?),
        name: row.get(1)?,
        body: row.get(2)?,
        created_at: parse_instant(&row.get::<_, String>(3)?),
        updated_at: parse_instant(&row.get::<_, String>(4)?),
        deleted_at: parse_instant_opt(row.get::<_, Option<String>>(5)?),
    })
}
