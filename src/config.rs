use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Turnera";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default lead time for appointment reminders, in minutes.
pub const DEFAULT_REMINDER_LEAD_MINUTES: i64 = 60;

/// Default tracing filter when RUST_LOG is not set.
pub fn default_log_filter() -> String {
    format!("info,{}=debug", env!("CARGO_PKG_NAME"))
}

/// Get the application data directory
/// ~/Turnera/ on all platforms (user-visible, per design requirement)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("Turnera")
}

/// Path of the SQLite database file.
pub fn database_path() -> PathBuf {
    app_data_dir().join("turnera.db")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_data_dir_under_home() {
        let dir = app_data_dir();
        let home = dirs::home_dir().unwrap();
        assert!(dir.starts_with(home));
        assert!(dir.ends_with("Turnera"));
    }

    #[test]
    fn database_path_under_app_data() {
        let db = database_path();
        assert!(db.starts_with(app_data_dir()));
        assert!(db.ends_with("turnera.db"));
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.3.0");
    }

    #[test]
    fn default_reminder_lead_is_one_hour() {
        assert_eq!(DEFAULT_REMINDER_LEAD_MINUTES, 60);
    }
}
