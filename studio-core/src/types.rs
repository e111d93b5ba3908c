//! Record types shared by the codec, the session store and the persistence layer.
//!
//! In memory every record uses camelCase keys; the codec translates to and from
//! the snake_case wire format. Fields the tool does not understand are kept in
//! each record's `extra` map so an import/export cycle does not drop them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One changed file inside a commit.
///
/// At least one of `old_content` / `new_content` is expected, but nothing
/// enforces it: commit content is never validated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Modification {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_filepath: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_filepath: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_content: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Modification {
    /// Path shown for this file: the new path, or the old one for deletions.
    pub fn display_path(&self) -> &str {
        self.new_filepath
            .as_deref()
            .or(self.old_filepath.as_deref())
            .unwrap_or("unknown")
    }
}

/// A commit as loaded from the dataset. Immutable once loaded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commit {
    pub hash: String,
    pub message: String,
    #[serde(default)]
    pub modifications: Vec<Modification>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One labelable unit: a commit, the repository it came from, and its labels.
///
/// `labels` holds zero or one element in practice: setting a label replaces
/// the whole sequence and clearing empties it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    pub commit: Commit,
    #[serde(default)]
    pub repository: String,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Sample {
    /// A sample counts as finished once it carries any label.
    pub fn is_labeled(&self) -> bool {
        !self.labels.is_empty()
    }

    /// First label, which is the effective label of the sample.
    pub fn label(&self) -> Option<&str> {
        self.labels.first().map(String::as_str)
    }
}

/// Discriminant carried by the metadata record on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordKind {
    #[default]
    #[serde(rename = "metadata")]
    Metadata,
}

/// Session metadata: last save time, last viewed position and source file name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(rename = "type", default)]
    pub kind: RecordKind,
    /// Seconds since the Unix epoch of the last save, or `None` if never saved.
    #[serde(default)]
    pub timestamp: Option<i64>,
    /// View position that was current when the session was last saved.
    #[serde(default)]
    pub index: Option<usize>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One entry of the label-options catalog supplied by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelOption {
    /// Value stored in `Sample::labels`.
    pub value: String,
    /// Human-readable name shown in the picker.
    pub label: String,
}

impl LabelOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self { value: value.into(), label: label.into() }
    }
}
