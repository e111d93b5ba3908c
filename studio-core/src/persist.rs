//! Persistence adapter: durable slots, sequenced write-through, and JSONL files.
//!
//! The session is stored as three independent slots (metadata, samples,
//! current index) in the key-value store opened by [`crate::db::open_db`].
//!
//! # Write ordering
//!
//! All slot writes go through a single [`SlotWriter`] task that performs them
//! one at a time in enqueue order, so a later snapshot of a slot can never be
//! overwritten by an earlier one. Writes are fire-and-forget for the caller;
//! failures come back on the failure channel handed to [`SlotWriter::spawn`]
//! and are never retried.

use std::path::Path;

use tokio::sync::{mpsc, oneshot};
use tokio_rusqlite::Connection;
use tracing::{debug, error, info};

use crate::codec;
use crate::db;
use crate::error::StudioError;
use crate::session::Session;
use crate::types::{Metadata, Sample};

/// Slot holding the session metadata.
pub const SLOT_METADATA: &str = "studio.metadata";
/// Slot holding the full sample list.
pub const SLOT_SAMPLES: &str = "studio.samples";
/// Slot holding the current view index.
pub const SLOT_CURRENT_INDEX: &str = "studio.current_index";

const ALL_SLOTS: [&str; 3] = [SLOT_METADATA, SLOT_SAMPLES, SLOT_CURRENT_INDEX];

/// Export name used when the session has no source file name.
pub const DEFAULT_EXPORT_NAME: &str = "dataset_result.jsonl";

async fn read_json<T>(conn: &Connection, slot: &'static str) -> Result<Option<T>, StudioError>
where
    T: serde::de::DeserializeOwned,
{
    match db::read_slot(conn, slot).await? {
        None => Ok(None),
        Some(text) => serde_json::from_str(&text)
            .map(Some)
            .map_err(|source| StudioError::CorruptSlot { slot, source }),
    }
}

/// Rebuilds the session from the durable slots.
///
/// Missing slots fall back to their neutral value (default metadata, empty
/// sample list, no current index), so a cold store yields an empty session.
///
/// # Errors
///
/// Returns `StudioError::Storage` if a read fails and
/// `StudioError::CorruptSlot` if a slot does not decode.
pub async fn restore(conn: &Connection) -> Result<Session, StudioError> {
    let metadata: Metadata = read_json(conn, SLOT_METADATA).await?.unwrap_or_default();
    let samples: Vec<Sample> = read_json(conn, SLOT_SAMPLES).await?.unwrap_or_default();
    let current_index: Option<usize> = read_json(conn, SLOT_CURRENT_INDEX).await?.flatten();

    info!(samples = samples.len(), ?current_index, "restored session");
    Ok(Session::restore(metadata, samples, current_index))
}

#[derive(Debug)]
enum SlotCommand {
    Write { slot: &'static str, value: String },
    Purge,
    Flush(oneshot::Sender<()>),
}

/// Handle to the background task that performs slot writes in order.
///
/// Dropping every handle closes the queue; the task finishes the writes
/// already enqueued and exits.
#[derive(Debug, Clone)]
pub struct SlotWriter {
    tx: mpsc::UnboundedSender<SlotCommand>,
}

impl SlotWriter {
    /// Spawns the writer task on the current tokio runtime.
    ///
    /// The task owns `conn`. Every failed write is logged and sent on
    /// `failures`; a closed failure channel is ignored.
    pub fn spawn(conn: Connection, failures: mpsc::UnboundedSender<StudioError>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<SlotCommand>();

        tokio::spawn(async move {
            while let Some(command) = rx.recv().await {
                let result = match command {
                    SlotCommand::Write { slot, value } => {
                        debug!(slot, bytes = value.len(), "writing slot");
                        db::write_slot(&conn, slot, value).await
                    }
                    SlotCommand::Purge => db::delete_slots(&conn, &ALL_SLOTS).await,
                    SlotCommand::Flush(done) => {
                        let _ = done.send(());
                        continue;
                    }
                };
                if let Err(e) = result {
                    error!(error = %e, "slot write failed");
                    let _ = failures.send(StudioError::Storage(e));
                }
            }
        });

        Self { tx }
    }

    fn send(&self, command: SlotCommand) {
        if self.tx.send(command).is_err() {
            error!("slot writer task is gone; dropping write");
        }
    }

    /// Enqueues a write of `value` to `slot`.
    pub fn write(&self, slot: &'static str, value: String) {
        self.send(SlotCommand::Write { slot, value });
    }

    /// Enqueues deletion of all three session slots.
    pub fn purge(&self) {
        self.send(SlotCommand::Purge);
    }

    /// Waits until every command enqueued before this call has been applied.
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        self.send(SlotCommand::Flush(done_tx));
        let _ = done_rx.await;
    }
}

/// Write-through of session changes to the durable slots.
///
/// Nothing is written until [`SessionPersister::initiate`] has been called
/// with the restored session; before that the in-memory session is transient
/// startup state and must not clobber what is on disk. After the gate opens,
/// each [`SessionPersister::observe`] writes only the slots whose value
/// differs from the last one written.
#[derive(Debug)]
pub struct SessionPersister {
    writer: SlotWriter,
    last: Option<Session>,
}

impl SessionPersister {
    pub fn new(writer: SlotWriter) -> Self {
        Self { writer, last: None }
    }

    /// `true` once the restored session has been handed to [`Self::initiate`].
    pub fn is_initiated(&self) -> bool {
        self.last.is_some()
    }

    /// Opens the gate. `restored` is taken as what the store already holds.
    pub fn initiate(&mut self, restored: &Session) {
        self.last = Some(restored.clone());
    }

    /// Enqueues writes for every slot of `session` that changed since the
    /// last observed value. A no-op before the gate is open.
    ///
    /// # Errors
    ///
    /// Returns `StudioError::Encode` if a slot value fails to serialize.
    pub fn observe(&mut self, session: &Session) -> Result<(), StudioError> {
        let Some(last) = self.last.as_ref() else {
            return Ok(());
        };

        if session.metadata() != last.metadata() {
            self.writer.write(SLOT_METADATA, to_slot_json(session.metadata())?);
        }
        if !session.shares_samples_with(last) && session.samples() != last.samples() {
            self.writer.write(SLOT_SAMPLES, to_slot_json(session.samples())?);
        }
        if session.current_index() != last.current_index() {
            self.writer.write(SLOT_CURRENT_INDEX, to_slot_json(&session.current_index())?);
        }

        self.last = Some(session.clone());
        Ok(())
    }

    /// Deletes the durable state. The gate stays open and the store is
    /// considered to hold an empty session afterwards.
    pub fn purge(&mut self) {
        info!("purging persisted session");
        self.writer.purge();
        if self.last.is_some() {
            self.last = Some(Session::default());
        }
    }

    pub async fn flush(&self) {
        self.writer.flush().await;
    }
}

fn to_slot_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, StudioError> {
    serde_json::to_string(value).map_err(StudioError::Encode)
}

/// Encodes the full, unfiltered session as a JSONL document.
///
/// # Errors
///
/// Returns `StudioError::Encode` if a record fails to serialize.
pub fn export_jsonl(session: &Session) -> Result<Vec<u8>, StudioError> {
    codec::encode_bytes(session.metadata(), session.samples())
}

/// Decodes a JSONL document into a new session.
///
/// A document without a metadata line gets fresh metadata. `file_name`
/// becomes the source file name only when the document does not carry one,
/// so reopening an export keeps the name of the original dataset.
///
/// # Errors
///
/// Returns `StudioError::Parse` for the first malformed line.
pub fn import_jsonl(bytes: &[u8], file_name: Option<&str>) -> Result<Session, StudioError> {
    let decoded = codec::decode_bytes(bytes)?;
    let mut metadata = decoded.metadata.unwrap_or_default();
    if metadata.filename.as_deref().is_none_or(str::is_empty) {
        metadata.filename = file_name.map(str::to_owned);
    }
    info!(samples = decoded.samples.len(), file = ?metadata.filename, "imported dataset");
    Ok(Session::load(decoded.samples, metadata))
}

/// Suggested download name: `<basename>_result<extension>` of the source
/// file, or [`DEFAULT_EXPORT_NAME`] when no file name is known.
pub fn export_file_name(metadata: &Metadata) -> String {
    let Some(name) = metadata.filename.as_deref().filter(|n| !n.is_empty()) else {
        return DEFAULT_EXPORT_NAME.to_owned();
    };
    let path = Path::new(name);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.to_owned());
    match path.extension() {
        Some(ext) => format!("{stem}_result.{}", ext.to_string_lossy()),
        None => format!("{stem}_result"),
    }
}
