//! Service catalog IPC commands — service categories and priced
//! sub-services.

use chrono::Utc;
use tauri::State;
use uuid::Uuid;

use super::{parse_id_arg, ErrorPayload};
use crate::db::repository;
use crate::models::{Service, SubService};
use crate::state::AppState;

fn validate_name(name: &str) -> Result<String, ErrorPayload> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ErrorPayload::validation("Name is required"));
    }
    if trimmed.len() > 200 {
        return Err(ErrorPayload::validation("Name too long"));
    }
    Ok(trimmed.to_string())
}

// ─── Services ─────────────────────────────────────────────────────────────────

#[tauri::command]
pub fn list_services(state: State<'_, AppState>) -> Result<Vec<Service>, ErrorPayload> {
    let conn = state.open_db()?;
    Ok(repository::get_all_services(&conn)?)
}

#[tauri::command]
pub fn create_service(state: State<'_, AppState>, name: String) -> Result<Service, ErrorPayload> {
    let name = validate_name(&name)?;
    let service = Service {
        id: Uuid::new_v4(),
        name,
        created_at: Utc::now(),
        deleted_at: None,
    };

    let conn = state.open_db()?;
    repository::insert_service(&conn, &service)?;
    Ok(service)
}

#[tauri::command]
pub fn rename_service(
    state: State<'_, AppState>,
    id: String,
    name: String,
) -> Result<Service, ErrorPayload> {
    let id = parse_id_arg(&id)?;
    let name = validate_name(&name)?;

    let conn = state.open_db()?;
    repository::rename_service(&conn, &id, &name)?;
    repository::get_service(&conn, &id)?
        .ok_or_else(|| ErrorPayload::not_found("service", &id.to_string()))
}

#[tauri::command]
pub fn delete_service(state: State<'_, AppState>, id: String) -> Result<(), ErrorPayload> {
    let id = parse_id_arg(&id)?;
    let conn = state.open_db()?;
    repository::soft_delete_service(&conn, &id)?;
    Ok(())
}

// ─── Sub-services ─────────────────────────────────────────────────────────────

/// Sub-services offered for new bookings (soft-deleted ones are hidden).
#[tauri::command]
pub fn list_sub_services(state: State<'_, AppState>) -> Result<Vec<SubService>, ErrorPayload> {
    let conn = state.open_db()?;
    Ok(repository::get_selectable_sub_services(&conn)?)
}

#[tauri::command]
pub fn list_sub_services_for_service(
    state: State<'_, AppState>,
    service_id: String,
) -> Result<Vec<SubService>, ErrorPayload> {
    let service_id = parse_id_arg(&service_id)?;
    let conn = state.open_db()?;
    Ok(repository::get_sub_services_by_service(&conn, &service_id)?)
}

#[tauri::command]
pub fn create_sub_service(
    state: State<'_, AppState>,
    service_id: String,
    name: String,
    price: i64,
) -> Result<SubService, ErrorPayload> {
    let service_id = parse_id_arg(&service_id)?;
    let name = validate_name(&name)?;
    if price < 0 {
        return Err(ErrorPayload::validation("Price cannot be negative"));
    }

    let conn = state.open_db()?;
    if repository::get_service(&conn, &service_id)?.is_none() {
        return Err(ErrorPayload::not_found("service", &service_id.to_string()));
    }

    let sub = SubService {
        id: Uuid::new_v4(),
        service_id,
        name,
        price,
        created_at: Utc::now(),
        deleted_at: None,
    };
    repository::insert_sub_service(&conn, &sub)?;
    Ok(sub)
}

#[tauri::command]
pub fn update_sub_service(
    state: State<'_, AppState>,
    id: String,
    name: String,
    price: i64,
) -> Result<SubService, ErrorPayload> {
    let id = parse_id_arg(&id)?;
    let name = validate_name(&name)?;
    if price < 0 {
        return Err(ErrorPayload::validation("Price cannot be negative"));
    }

    let conn = state.open_db()?;
    let mut sub = repository::get_sub_service(&conn, &id)?
        .ok_or_else(|| ErrorPayload::not_found("sub_service", &id.to_string()))?;
    sub.name = name;
    sub.price = price;

    repository::update_sub_service(&conn, &sub)?;
    Ok(sub)
}

/// Soft delete: existing appointments keep their snapshots; the sub-service
/// just stops being offered for new bookings.
#[tauri::command]
pub fn delete_sub_service(state: State<'_, AppState>, id: String) -> Result<(), ErrorPayload> {
    let id = parse_id_arg(&id)?;
    let conn = state.open_db()?;
    repository::soft_delete_sub_service(&conn, &id)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_is_trimmed() {
        assert_eq!(validate_name("  Corte  ").unwrap(), "Corte");
    }

    #[test]
    fn blank_name_rejected() {
        assert!(validate_name("   ").is_err());
    }

    #[test]
    fn oversized_name_rejected() {
        assert!(validate_name(&"x".repeat(201)).is_err());
    }
}
