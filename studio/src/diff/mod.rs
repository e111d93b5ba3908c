//! Commit rendering off the UI thread.
//!
//! The UI sends a [`types::DiffRequest`] over a crossbeam channel whenever the
//! sample under the cursor changes; [`worker::diff_worker_loop`] computes the
//! per-file unified diffs, highlights them, and posts the result back on the
//! event bus.

pub mod types;
pub mod worker;
