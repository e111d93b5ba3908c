//! Session store layout.
//!
//! The store is one `kv` table. Each row is a durable slot of the session
//! (`studio.metadata`, `studio.samples`, `studio.current_index`) holding
//! JSON text, so a change to one slot never rewrites the others.

use rusqlite::{Connection, TransactionBehavior};

/// Version bookkeeping. Created before anything else is read.
pub const SCHEMA_VERSION_DDL: &str = "
    CREATE TABLE IF NOT EXISTS schema_version (
        version INTEGER NOT NULL
    ) STRICT;
";

/// Slot table. `updated_at` is the Unix time of the last write to the slot
/// and is never read back by the application.
pub const SCHEMA_V1_SQL: &str = "
    CREATE TABLE IF NOT EXISTS kv (
        key         TEXT    PRIMARY KEY,
        value       TEXT    NOT NULL,
        updated_at  INTEGER NOT NULL
    ) STRICT;
";

/// Steps in order; step `n` brings the store from version `n` to `n + 1`.
const STEPS: &[&str] = &[SCHEMA_V1_SQL];

/// Version a store has after [`migrate`].
pub const SCHEMA_VERSION: i64 = STEPS.len() as i64;

/// Version recorded in the store, `0` for a new file.
pub fn stored_version(db: &Connection) -> rusqlite::Result<i64> {
    db.query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))
}

/// Applies every step the store has not seen yet, each in its own
/// `BEGIN IMMEDIATE` transaction together with its version row.
///
/// A store already at [`SCHEMA_VERSION`] is left untouched.
///
/// # Errors
///
/// Returns `rusqlite::Error` if a step fails; steps already committed stay.
pub fn migrate(db: &mut Connection) -> rusqlite::Result<()> {
    db.execute_batch(SCHEMA_VERSION_DDL)?;
    let from = stored_version(db)?;

    for (version, step) in (1..).zip(STEPS).skip(from.max(0) as usize) {
        let tx = db.transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute_batch(step)?;
        tx.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
        tx.commit()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrate_is_idempotent() {
        let mut db = Connection::open_in_memory().unwrap();
        migrate(&mut db).unwrap();
        migrate(&mut db).unwrap();

        assert_eq!(stored_version(&db).unwrap(), SCHEMA_VERSION);
        let rows: i64 = db
            .query_row("SELECT COUNT(*) FROM schema_version", [], |r| r.get(0))
            .unwrap();
        assert_eq!(rows, SCHEMA_VERSION, "one version row per step");

        db.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES ('studio.samples', '[]', 0)",
            [],
        )
        .unwrap();
    }
}
