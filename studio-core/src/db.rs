use std::time::Duration;

use rusqlite::OptionalExtension;
use tokio_rusqlite::Connection;

use crate::session::now_secs;

/// Opens (or creates) the key-value store at `path`, configures WAL mode,
/// and applies schema migrations via the `schema_version` table.
///
/// This function is the single entry point for all store connections.
/// It sets `busy_timeout` via the `Connection` method (not a PRAGMA string) so
/// the setting takes effect regardless of pragma caching.
///
/// # Errors
///
/// Returns `tokio_rusqlite::Error` if the file cannot be opened, WAL configuration
/// fails, or schema DDL fails.
pub async fn open_db(path: &str) -> Result<Connection, tokio_rusqlite::Error> {
    let conn = Connection::open(path).await?;

    conn.call(|db| {
        db.execute_batch(
            "PRAGMA journal_mode=WAL;
             PRAGMA synchronous=NORMAL;",
        )?;
        db.busy_timeout(Duration::from_secs(5))?;
        Ok::<_, rusqlite::Error>(())
    })
    .await?;

    // Fold any WAL left behind by a previous run back into the main file.
    conn.call(|db| {
        db.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok::<_, rusqlite::Error>(())
    })
    .await?;

    conn.call(|db| {
        crate::schema::migrate(db)?;
        Ok::<_, rusqlite::Error>(())
    })
    .await?;

    Ok(conn)
}

/// Reads the value stored under `key`, or `None` if the slot was never written.
///
/// # Errors
///
/// Returns `tokio_rusqlite::Error` if the query fails.
pub async fn read_slot(
    conn: &Connection,
    key: &str,
) -> Result<Option<String>, tokio_rusqlite::Error> {
    let key = key.to_owned();

    conn.call(move |db| {
        let value = db
            .query_row(
                "SELECT value FROM kv WHERE key = ?1",
                rusqlite::params![&key],
                |r| r.get::<_, String>(0),
            )
            .optional()?;
        Ok::<_, rusqlite::Error>(value)
    })
    .await
}

/// Writes `value` under `key`, replacing any previous value.
///
/// Uses an upsert inside `BEGIN IMMEDIATE`.
///
/// # Errors
///
/// Returns `tokio_rusqlite::Error` if the upsert transaction fails.
pub async fn write_slot(
    conn: &Connection,
    key: &str,
    value: String,
) -> Result<(), tokio_rusqlite::Error> {
    let key = key.to_owned();

    conn.call(move |db| {
        let now = now_secs();
        let tx = db.transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO kv (key, value, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(key)
             DO UPDATE SET value = excluded.value,
                           updated_at = excluded.updated_at",
            rusqlite::params![&key, &value, now],
        )?;
        tx.commit()?;
        Ok::<_, rusqlite::Error>(())
    })
    .await
}

/// Deletes every slot in `keys` in one transaction. Missing slots are ignored.
///
/// # Errors
///
/// Returns `tokio_rusqlite::Error` if the delete transaction fails.
pub async fn delete_slots(
    conn: &Connection,
    keys: &[&'static str],
) -> Result<(), tokio_rusqlite::Error> {
    let keys = keys.to_vec();

    conn.call(move |db| {
        let tx = db.transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;
        for key in &keys {
            tx.execute("DELETE FROM kv WHERE key = ?1", rusqlite::params![key])?;
        }
        tx.commit()?;
        Ok::<_, rusqlite::Error>(())
    })
    .await
}
