//! Client management IPC commands — CRUD with soft delete.
//!
//! Field validation lives here, mirroring what the edit form enforces;
//! booking re-checks only what it depends on (existence, contact channel).

use std::str::FromStr;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tauri::State;
use uuid::Uuid;

use super::{parse_id_arg, ErrorPayload};
use crate::db::repository;
use crate::models::enums::Sex;
use crate::models::Client;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientInput {
    pub display_name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    #[serde(default)]
    pub is_minor: bool,
    pub guardian_name: Option<String>,
    pub sex: Option<String>,
}

fn validate_input(input: &ClientInput) -> Result<Option<Sex>, ErrorPayload> {
    if input.display_name.trim().is_empty() {
        return Err(ErrorPayload::validation("Client name is required"));
    }
    if input.display_name.len() > 200 {
        return Err(ErrorPayload::validation("Client name too long"));
    }
    if input.is_minor
        && !input
            .guardian_name
            .as_deref()
            .is_some_and(|g| !g.trim().is_empty())
    {
        return Err(ErrorPayload::validation(
            "Guardian name is required for minor clients",
        ));
    }

    match &input.sex {
        Some(raw) => Sex::from_str(raw)
            .map(Some)
            .map_err(|_| ErrorPayload::validation(format!("Invalid sex: {raw}"))),
        None => Ok(None),
    }
}

#[tauri::command]
pub fn list_clients(state: State<'_, AppState>) -> Result<Vec<Client>, ErrorPayload> {
    let conn = state.open_db()?;
    Ok(repository::get_all_clients(&conn)?)
}

#[tauri::command]
pub fn get_client(state: State<'_, AppState>, id: String) -> Result<Client, ErrorPayload> {
    let id = parse_id_arg(&id)?;
    let conn = state.open_db()?;
    repository::get_client(&conn, &id)?
        .ok_or_else(|| ErrorPayload::not_found("client", &id.to_string()))
}

#[tauri::command]
pub fn create_client(
    state: State<'_, AppState>,
    input: ClientInput,
) -> Result<Client, ErrorPayload> {
    let sex = validate_input(&input)?;

    let now = Utc::now();
    let client = Client {
        id: Uuid::new_v4(),
        display_name: input.display_name.trim().to_string(),
        phone: input.phone.filter(|p| !p.trim().is_empty()),
        email: input.email.filter(|e| !e.trim().is_empty()),
        is_minor: input.is_minor,
        guardian_name: input.guardian_name.filter(|g| !g.trim().is_empty()),
        sex,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    };

    let conn = state.open_db()?;
    repository::insert_client(&conn, &client)?;
    tracing::info!(client_id = %client.id, "Client created");
    Ok(client)
}

#[tauri::command]
pub fn update_client(
    state: State<'_, AppState>,
    id: String,
    input: ClientInput,
) -> Result<Client, ErrorPayload> {
    let id = parse_id_arg(&id)?;
    let sex = validate_input(&input)?;

    let conn = state.open_db()?;
    let mut client = repository::get_client(&conn, &id)?
        .ok_or_else(|| ErrorPayload::not_found("client", &id.to_string()))?;

    client.display_name = input.display_name.trim().to_string();
    client.phone = input.phone.filter(|p| !p.trim().is_empty());
    client.email = input.email.filter(|e| !e.trim().is_empty());
    client.is_minor = input.is_minor;
    client.guardian_name = input.guardian_name.filter(|g| !g.trim().is_empty());
    client.sex = sex;

    repository::update_client(&conn, &client)?;
    repository::get_client(&conn, &id)?
        .ok_or_else(|| ErrorPayload::not_found("client", &id.to_string()))
}

#[tauri::command]
pub fn delete_client(state: State<'_, AppState>, id: String) -> Result<(), ErrorPayload> {
    let id = parse_id_arg(&id)?;
    let conn = state.open_db()?;
    repository::soft_delete_client(&conn, &id)?;
    tracing::info!(client_id = %id, "Client soft-deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str) -> ClientInput {
        ClientInput {
            display_name: name.into(),
            phone: None,
            email: None,
            is_minor: false,
            guardian_name: None,
            sex: None,
        }
    }

    #[test]
    fn empty_name_rejected() {
        assert!(validate_input(&input("   ")).is_err());
    }

    #[test]
    fn minor_without_guardian_rejected() {
        let mut i = input("Luis");
        i.is_minor = true;
        let err = validate_input(&i).unwrap_err();
        assert_eq!(err.code, "validation_error");

        i.guardian_name = Some("Rosa Gómez".into());
        assert!(validate_input(&i).is_ok());
    }

    #[test]
    fn blank_guardian_does_not_satisfy_minor_rule() {
        let mut i = input("Luis");
        i.is_minor = true;
        i.guardian_name = Some("  ".into());
        assert!(validate_input(&i).is_err());
    }

    #[test]
    fn sex_is_parsed_when_present() {
        let mut i = input("Ana");
        i.sex = Some("female".into());
        assert_eq!(validate_input(&i).unwrap(), Some(Sex::Female));

        i.sex = Some("unknown".into());
        assert!(validate_input(&i).is_err());
    }
}
