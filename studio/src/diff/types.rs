//! Owned data types for the diff background thread.
//!
//! Everything here is fully owned and `Send` so requests and rendered lines
//! can cross between the UI loop and the worker thread.

use studio_core::Modification;

/// One rendered diff line before highlighting.
///
/// Origin characters: `'+'` added, `'-'` removed, `' '` context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedDiffLine {
    pub origin: char,
    /// Line content without the trailing newline.
    pub content: String,
}

/// One `@@` hunk of a file diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedDiffHunk {
    /// The `@@ -a,b +c,d @@` header.
    pub header: String,
    pub lines: Vec<OwnedDiffLine>,
}

/// Identifies which sample a diff was rendered for.
///
/// A result whose key no longer matches the sample under the cursor is
/// stale and dropped by the UI.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DiffKey {
    pub original_index: usize,
    pub hash: String,
}

/// Work item for the diff thread: one commit to render.
#[derive(Debug, Clone)]
pub struct DiffRequest {
    pub key: DiffKey,
    pub message: String,
    pub repository: String,
    pub modifications: Vec<Modification>,
}

/// Rendered commit view, carried back inside `AppEvent::DiffResult`.
///
/// Boxed on the channel because the line buffer can be large.
#[derive(Debug)]
pub struct DiffResultPayload {
    pub key: DiffKey,
    /// Pre-highlighted lines with owned span content.
    pub lines: Vec<ratatui::text::Line<'static>>,
    /// Indices into `lines` where hunk headers appear, for `[` / `]` jumps.
    pub hunk_offsets: Vec<usize>,
    /// Index into `lines` of each file header, in modification order.
    pub file_offsets: Vec<usize>,
}
