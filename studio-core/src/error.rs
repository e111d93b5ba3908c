//! Error taxonomy for the session engine.
//!
//! Only failures that must reach the caller are represented here. Navigation,
//! labeling and deletion against an empty session or an out-of-range index are
//! total operations that return without effect, so they have no variant.

/// Every error the session engine surfaces to its caller.
#[derive(Debug, thiserror::Error)]
pub enum StudioError {
    /// A JSONL line could not be parsed, or its object does not have the
    /// shape of a sample. Fatal to the whole import; prior state is retained.
    #[error("line {line}: {source}")]
    Parse {
        /// 1-based ordinal of the offending line in the input.
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// The durable key-value store failed to read or write.
    #[error("storage error: {0}")]
    Storage(#[from] tokio_rusqlite::Error),

    /// A durable slot holds text that does not decode into its value type.
    #[error("slot `{slot}` is corrupt: {source}")]
    CorruptSlot {
        slot: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Serializing a record or a slot value failed.
    #[error("encode error: {0}")]
    Encode(#[source] serde_json::Error),

    /// Reading or writing a dataset file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl StudioError {
    /// Returns `true` when the error came from the durable store.
    ///
    /// In-memory state stays authoritative after a storage failure, so callers
    /// use this to report degraded persistence without discarding the session.
    pub fn is_storage(&self) -> bool {
        matches!(self, StudioError::Storage(_) | StudioError::CorruptSlot { .. })
    }
}
