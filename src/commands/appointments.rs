//! Appointment IPC commands — thin wrappers over the booking module.
//!
//! Every rule (entity resolution, price snapshots, totals, the reminder
//! contact requirement) lives in `booking`; nothing is re-validated here.

use chrono::NaiveDate;
use tauri::State;

use super::{parse_id_arg, parse_instant_arg, ErrorPayload};
use crate::booking::{self, CreateAppointmentRequest, UpdateAppointmentRequest};
use crate::db::repository;
use crate::models::{Appointment, AppointmentDetail};
use crate::state::AppState;

#[tauri::command]
pub fn create_appointment(
    state: State<'_, AppState>,
    request: CreateAppointmentRequest,
) -> Result<AppointmentDetail, ErrorPayload> {
    let mut conn = state.open_db()?;
    Ok(booking::create(&mut conn, &request)?)
}

#[tauri::command]
pub fn update_appointment(
    state: State<'_, AppState>,
    id: String,
    request: UpdateAppointmentRequest,
) -> Result<AppointmentDetail, ErrorPayload> {
    let id = parse_id_arg(&id)?;
    let mut conn = state.open_db()?;
    Ok(booking::update(&mut conn, &id, &request)?)
}

#[tauri::command]
pub fn cancel_appointment(
    state: State<'_, AppState>,
    id: String,
) -> Result<AppointmentDetail, ErrorPayload> {
    let id = parse_id_arg(&id)?;
    let conn = state.open_db()?;
    Ok(booking::cancel(&conn, &id)?)
}

#[tauri::command]
pub fn restore_appointment(
    state: State<'_, AppState>,
    id: String,
) -> Result<AppointmentDetail, ErrorPayload> {
    let id = parse_id_arg(&id)?;
    let conn = state.open_db()?;
    Ok(booking::restore(&conn, &id)?)
}

#[tauri::command]
pub fn get_appointment(
    state: State<'_, AppState>,
    id: String,
) -> Result<AppointmentDetail, ErrorPayload> {
    let id = parse_id_arg(&id)?;
    let conn = state.open_db()?;
    Ok(booking::get(&conn, &id)?)
}

#[tauri::command]
pub fn list_appointments_by_client(
    state: State<'_, AppState>,
    client_id: String,
) -> Result<Vec<Appointment>, ErrorPayload> {
    let client_id = parse_id_arg(&client_id)?;
    let conn = state.open_db()?;
    Ok(repository::find_by_client(&conn, &client_id)?)
}

/// Appointments with `from <= scheduled_at < to` (ISO-8601 bounds).
#[tauri::command]
pub fn list_appointments_in_range(
    state: State<'_, AppState>,
    from: String,
    to: String,
) -> Result<Vec<Appointment>, ErrorPayload> {
    let from = parse_instant_arg(&from)?;
    let to = parse_instant_arg(&to)?;
    let conn = state.open_db()?;
    Ok(repository::find_by_date_range(&conn, &from, &to)?)
}

/// Non-cancelled appointment count for one calendar day (dashboard tile).
#[tauri::command]
pub fn count_appointments_on(
    state: State<'_, AppState>,
    date: String,
) -> Result<i64, ErrorPayload> {
    let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
        .map_err(|_| ErrorPayload::validation("Invalid date format. Use YYYY-MM-DD"))?;
    let conn = state.open_db()?;
    Ok(repository::count_by_date(&conn, &date)?)
}
