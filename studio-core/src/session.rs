//! The session store: the authoritative ordered sample list plus metadata.
//!
//! A [`Session`] is a value. Every mutation returns a new `Session` and leaves
//! the receiver untouched, so consumers detect change with `==` (or cheaply
//! with [`Session::shares_samples_with`]) instead of forcing copies. The
//! sample list sits behind an `Arc`, so operations that only touch metadata or
//! the current index share it with the previous value.
//!
//! Mutations are keyed by *original index*, the position of a sample in the
//! full unfiltered list. Callers obtain it from a live
//! [`VisibleSample`](crate::view::VisibleSample), never from a view position.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::debug;

use crate::types::{Metadata, Sample};

/// Returns the current Unix timestamp in seconds.
pub fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

/// The persistable unit: metadata, the full sample list and the current view index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    metadata: Metadata,
    samples: Arc<Vec<Sample>>,
    current_index: Option<usize>,
}

impl Session {
    /// Builds a session from an import, replacing everything.
    ///
    /// The current index resumes at `metadata.index` when it is in bounds,
    /// otherwise starts at `0`, or `None` when there are no samples.
    pub fn load(samples: Vec<Sample>, metadata: Metadata) -> Self {
        let current_index = match metadata.index {
            Some(i) if i < samples.len() => Some(i),
            _ if samples.is_empty() => None,
            _ => Some(0),
        };
        Self { metadata, samples: Arc::new(samples), current_index }
    }

    /// Rebuilds a session from the three durable slots.
    ///
    /// A stored index that no longer fits the sample list is clamped to the
    /// last sample rather than rejected.
    pub fn restore(metadata: Metadata, samples: Vec<Sample>, current_index: Option<usize>) -> Self {
        let current_index = if samples.is_empty() {
            None
        } else {
            current_index.map(|i| i.min(samples.len() - 1))
        };
        Self { metadata, samples: Arc::new(samples), current_index }
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Current position in the projected view, never in the raw list.
    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sample at `original_index` in the full list.
    pub fn get(&self, original_index: usize) -> Option<&Sample> {
        self.samples.get(original_index)
    }

    /// `true` when both sessions hold the very same sample list allocation.
    ///
    /// A cheap "samples unchanged" test for persistence; a `false` result
    /// still needs `==` to rule out an equal copy.
    pub fn shares_samples_with(&self, other: &Session) -> bool {
        Arc::ptr_eq(&self.samples, &other.samples)
    }

    /// Returns a copy with the labels of `original_index` replaced by
    /// `[label]`, or emptied when `label` is `None`.
    ///
    /// Out-of-bounds indices (including any index on an empty session) leave
    /// the session unchanged.
    pub fn with_label(&self, original_index: usize, label: Option<&str>) -> Self {
        if original_index >= self.samples.len() {
            debug!(original_index, len = self.samples.len(), "label target out of range");
            return self.clone();
        }
        let labels: Vec<String> = label.map(str::to_owned).into_iter().collect();
        if self.samples[original_index].labels == labels {
            return self.clone();
        }

        let mut samples = Arc::clone(&self.samples);
        Arc::make_mut(&mut samples)[original_index].labels = labels;
        Self { samples, ..self.clone() }
    }

    /// Returns a copy without the sample at `original_index`; later samples
    /// shift down by one.
    ///
    /// Every previously projected view is stale afterwards. The current index
    /// is carried over untouched; re-clamp it against the recomputed view.
    pub fn delete_at(&self, original_index: usize) -> Self {
        if original_index >= self.samples.len() {
            debug!(original_index, len = self.samples.len(), "delete target out of range");
            return self.clone();
        }
        let mut samples = Arc::clone(&self.samples);
        Arc::make_mut(&mut samples).remove(original_index);
        Self { samples, ..self.clone() }
    }

    pub fn with_current_index(&self, current_index: Option<usize>) -> Self {
        Self { current_index, ..self.clone() }
    }

    pub fn with_metadata(&self, metadata: Metadata) -> Self {
        Self { metadata, ..self.clone() }
    }

    /// Metadata stamped with `now` and `current_view_index`, keeping the file name.
    pub fn snapshot_metadata(&self, current_view_index: Option<usize>) -> Metadata {
        self.snapshot_metadata_at(current_view_index, now_secs())
    }

    /// Same as [`Session::snapshot_metadata`] with an explicit timestamp.
    pub fn snapshot_metadata_at(&self, current_view_index: Option<usize>, timestamp: i64) -> Metadata {
        Metadata {
            timestamp: Some(timestamp),
            index: current_view_index,
            ..self.metadata.clone()
        }
    }
}
