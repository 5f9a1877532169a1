//! Embedded schema migrations.
//!
//! Migrations ship inside the binary as plain SQL files and are applied in
//! version order. Applied versions are recorded in a `schema_migrations`
//! table, so running them again is a no-op.

use rusqlite::Connection;
use snapvault_common::{Error, Result};

/// One versioned schema change.
struct Migration {
    version: usize,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial",
    sql: include_str!("001_initial.sql"),
}];

/// Apply every migration newer than the recorded schema version.
///
/// Each migration runs in its own transaction together with the row that
/// records it, so a failed migration leaves the recorded version untouched.
/// Returns the number of migrations applied.
pub fn run_migrations(conn: &Connection) -> Result<usize> {
    ensure_migrations_table(conn)?;

    let from = recorded_version(conn)?;
    let mut applied = 0;

    for migration in MIGRATIONS.iter().filter(|m| m.version > from) {
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| Error::database(e.to_string()))?;

        tx.execute_batch(migration.sql).map_err(|e| {
            Error::database(format!(
                "migration {} ({}) failed: {}",
                migration.version, migration.name, e
            ))
        })?;

        tx.execute(
            "INSERT INTO schema_migrations (version, name) VALUES (?, ?)",
            rusqlite::params![migration.version, migration.name],
        )
        .map_err(|e| Error::database(e.to_string()))?;

        tx.commit().map_err(|e| {
            Error::database(format!(
                "migration {} commit failed: {}",
                migration.version, e
            ))
        })?;

        applied += 1;
        eprintln!(
            "Applied migration {}: {}",
            migration.version, migration.name
        );
    }

    Ok(applied)
}

/// Schema version currently recorded in the database.
pub fn current_version(conn: &Connection) -> Result<usize> {
    ensure_migrations_table(conn)?;
    recorded_version(conn)
}

/// Highest migration version compiled into this binary.
pub fn latest_version() -> usize {
    MIGRATIONS.last().map(|m| m.version).unwrap_or(0)
}

fn ensure_migrations_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )
    .map_err(|e| Error::database(e.to_string()))?;

    Ok(())
}

fn recorded_version(conn: &Connection) -> Result<usize> {
    conn.query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
        row.get::<_, Option<usize>>(0)
    })
    .map(|version| version.unwrap_or(0))
    .map_err(|e| Error::database(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_migrations_apply_once() {
        let conn = Connection::open_in_memory().unwrap();

        assert_eq!(run_migrations(&conn).unwrap(), MIGRATIONS.len());
        assert_eq!(current_version(&conn).unwrap(), latest_version());

        // Rerun finds nothing to do.
        assert_eq!(run_migrations(&conn).unwrap(), 0);
    }

    #[test]
    fn test_schema_tables_exist() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        for table in ["images", "schema_migrations"] {
            let count: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
                    [table],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(count, 1, "table {} missing", table);
        }
    }

    #[test]
    fn test_new_rows_get_defaults() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        conn.execute(
            "INSERT INTO images (id, uri) VALUES ('vault/x', 'https://cdn.example.com/x.jpg')",
            [],
        )
        .unwrap();

        let (hits, is_deleted): (i64, i64) = conn
            .query_row(
                "SELECT hits, is_deleted FROM images WHERE id = 'vault/x'",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();

        assert_eq!(hits, 1);
        assert_eq!(is_deleted, 0);
    }
}
