//! Shared application state — where the database lives.
//!
//! Each IPC command opens its own connection for the duration of the
//! request: single writer per request, no shared in-memory mutable state
//! between requests.

use std::path::PathBuf;

use rusqlite::Connection;

use crate::db::{self, DatabaseError};

pub struct AppState {
    db_path: PathBuf,
}

impl AppState {
    pub fn new(db_path: PathBuf) -> Self {
        Self { db_path }
    }

    /// Opens a connection for the current request. Migrations are
    /// version-gated, so running them again on open is a cheap no-op.
    pub fn open_db(&self) -> Result<Connection, DatabaseError> {
        db::sqlite::open_database(&self.db_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_db_creates_and_reopens() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::new(dir.path().join("turnera.db"));

        let conn = state.open_db().unwrap();
        let tables = crate::db::sqlite::count_tables(&conn).unwrap();
        assert_eq!(tables, 8);
        drop(conn);

        // Second open hits the already-migrated file
        let conn = state.open_db().unwrap();
        assert_eq!(crate::db::sqlite::count_tables(&conn).unwrap(), 8);
    }
}
