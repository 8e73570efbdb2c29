pub mod booking;
pub mod commands;
pub mod config;
pub mod db;
pub mod models;
pub mod reminders;
pub mod state;
pub mod templates;

use tracing_subscriber::EnvFilter;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("Turnera starting v{}", config::APP_VERSION);

    std::fs::create_dir_all(config::app_data_dir())
        .expect("Failed to create app data directory");

    tauri::Builder::default()
        .plugin(tauri_plugin_shell::init())
        .manage(state::AppState::new(config::database_path()))
        .invoke_handler(tauri::generate_handler![
            commands::health_check,
            // Clients
            commands::clients::list_clients,
            commands::clients::get_client,
            commands::clients::create_client,
            commands::clients::update_client,
            commands::clients::delete_client,
            // Service catalog
            commands::catalog::list_services,
            commands::catalog::create_service,
            commands::catalog::rename_service,
            commands::catalog::delete_service,
            commands::catalog::list_sub_services,
            commands::catalog::list_sub_services_for_service,
            commands::catalog::create_sub_service,
            commands::catalog::update_sub_service,
            commands::catalog::delete_sub_service,
            // Appointments
            commands::appointments::create_appointment,
            commands::appointments::update_appointment,
            commands::appointments::cancel_appointment,
            commands::appointments::restore_appointment,
            commands::appointments::get_appointment,
            commands::appointments::list_appointments_by_client,
            commands::appointments::list_appointments_in_range,
            commands::appointments::count_appointments_on,
            // Reminders
            commands::reminders::list_client_reminders,
            commands::reminders::list_due_reminders,
            commands::reminders::create_reminder,
            commands::reminders::mark_reminder_sent,
            commands::reminders::mark_reminder_failed,
            // Message templates
            commands::templates::list_templates,
            commands::templates::create_template,
            commands::templates::update_template,
            commands::templates::delete_template,
            commands::templates::preview_template,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
