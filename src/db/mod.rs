// Database module

pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};

use anyhow::Result;
use rusqlite::Connection;

use crate::constants::{CURIO_FOLDER, DB_FILENAME, SETTING_DEFAULT_OWNER};

/// Open or create a database at the given path
pub fn open_db(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;

    // Enable foreign keys (must be done per connection)
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;

    // Enable WAL mode for better concurrency
    conn.execute_batch("PRAGMA journal_mode = WAL;")?;

    // Run migrations
    migrations::run_migrations(&conn)?;

    Ok(conn)
}

/// Default database path: ~/.curio/curio.db
pub fn default_db_path() -> Result<PathBuf> {
    let base = directories::BaseDirs::new()
        .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;
    Ok(base.home_dir().join(CURIO_FOLDER).join(DB_FILENAME))
}

/// Initialize the database file, creating parent folders and a default
/// owner id (stored in settings) on first run. Returns the open connection
/// and the default owner id.
pub fn init_database(db_path: &Path) -> Result<(Connection, String)> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let conn = open_db(db_path)?;

    let owner = match schema::get_setting(&conn, SETTING_DEFAULT_OWNER)? {
        Some(existing) => existing,
        None => {
            let owner = uuid::Uuid::new_v4().to_string();
            schema::set_setting(&conn, SETTING_DEFAULT_OWNER, &owner)?;
            owner
        }
    };

    Ok((conn, owner))
}

/// Resolve the owner context for a request: an explicit owner id wins,
/// otherwise fall back to the stored default. Owner ids are opaque here;
/// authentication happens upstream.
pub fn resolve_owner(conn: &Connection, explicit: Option<String>) -> Result<String> {
    if let Some(owner) = explicit {
        return Ok(owner);
    }
    schema::get_setting(conn, SETTING_DEFAULT_OWNER)?
        .ok_or_else(|| anyhow::anyhow!("No owner given and no default owner configured (run init)"))
}
