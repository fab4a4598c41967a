// Database migrations
// Migrations are forward-only. Never edit or delete a migration after it ships.

use anyhow::Result;
use rusqlite::Connection;

/// All migrations in order. Each migration is a SQL string.
const MIGRATIONS: &[&str] = &[
    // Migration 1: Initial schema
    r#"
    -- Collection templates (user-defined schemas)
    CREATE TABLE templates (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        owner_id TEXT NOT NULL,
        name TEXT NOT NULL,
        fields TEXT NOT NULL DEFAULT '[]',
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        UNIQUE(owner_id, name)
    );

    -- Items (one template each; owner reached through the template)
    CREATE TABLE items (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        template_id INTEGER NOT NULL REFERENCES templates(id),
        name TEXT NOT NULL,
        dynamic_data TEXT NOT NULL DEFAULT '{}',
        price REAL NOT NULL DEFAULT 0 CHECK (price >= 0),
        estimated_value REAL NOT NULL DEFAULT 0 CHECK (estimated_value >= 0),
        acquired_at TEXT,
        origin TEXT,
        currency TEXT,
        images TEXT NOT NULL DEFAULT '[]',
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE INDEX idx_templates_owner ON templates(owner_id);
    CREATE INDEX idx_items_template ON items(template_id);

    -- App settings KV (default owner id, etc.)
    CREATE TABLE settings (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );
    "#,
];

/// Run all pending migrations on the connection.
/// Uses PRAGMA user_version to track the current schema version.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    let current: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

    for (idx, migration) in MIGRATIONS.iter().enumerate() {
        let version = (idx + 1) as i64;
        if version <= current {
            continue;
        }
        conn.execute_batch(migration)?;
        conn.execute_batch(&format!("PRAGMA user_version = {}", version))?;
        log::info!("Applied migration {}", version);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_apply_and_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        // Running again must be a no-op, not a "table already exists" error.
        run_migrations(&conn).unwrap();

        let version: i64 = conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(version, MIGRATIONS.len() as i64);
    }

    #[test]
    fn test_negative_price_rejected_by_schema() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn.execute(
            "INSERT INTO templates (owner_id, name) VALUES ('u1', 'Sneakers')",
            [],
        )
        .unwrap();
        let result = conn.execute(
            "INSERT INTO items (template_id, name, price) VALUES (1, 'Jordan 1', -5.0)",
            [],
        );
        assert!(result.is_err(), "CHECK constraint should reject negative price");
    }
}
