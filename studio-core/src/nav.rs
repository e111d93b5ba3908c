//! Navigation controller: the cursor into the latest projected view.
//!
//! The cursor is a view position, bounded by the view length passed to each
//! operation. Besides the committed cursor the controller tracks a staged
//! preview target (select, then confirm or cancel) as an explicit state
//! machine, and the label most recently picked for display.

/// Staged navigation gesture.
///
/// `Idle` → `Previewing(i)` on select; `Previewing(i)` → `Committed(i)` on
/// confirm; any state → `Idle` on cancel. A new select from `Committed`
/// starts another preview.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Preview {
    #[default]
    Idle,
    Previewing(usize),
    Committed(usize),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Navigator {
    current: Option<usize>,
    preview: Preview,
    staged_label: Option<String>,
}

impl Navigator {
    pub fn new(current: Option<usize>) -> Self {
        Self { current, ..Self::default() }
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn preview(&self) -> Preview {
        self.preview
    }

    /// The staged preview target, if a preview is pending.
    pub fn preview_index(&self) -> Option<usize> {
        match self.preview {
            Preview::Previewing(i) => Some(i),
            Preview::Idle | Preview::Committed(_) => None,
        }
    }

    pub fn staged_label(&self) -> Option<&str> {
        self.staged_label.as_deref()
    }

    /// Advances one position, stopping at the last entry.
    pub fn next(&mut self, view_len: usize) {
        if view_len == 0 {
            self.current = None;
            return;
        }
        let next = self.current.unwrap_or(0).saturating_add(1);
        self.current = Some(next.min(view_len - 1));
    }

    /// Steps back one position, stopping at the first entry.
    pub fn back(&mut self, view_len: usize) {
        if view_len == 0 {
            self.current = None;
            return;
        }
        let back = self.current.unwrap_or(0).saturating_sub(1);
        self.current = Some(back.min(view_len - 1));
    }

    /// Stages `view_index` as the pending target without moving the cursor.
    ///
    /// Indices outside the view are ignored.
    pub fn select_preview(&mut self, view_index: usize, view_len: usize) {
        if view_index < view_len {
            self.preview = Preview::Previewing(view_index);
        }
    }

    /// Commits the staged preview to the cursor and drops the staged label.
    ///
    /// Does nothing unless a preview is pending.
    pub fn confirm(&mut self) {
        if let Preview::Previewing(i) = self.preview {
            self.current = Some(i);
            self.preview = Preview::Committed(i);
            self.staged_label = None;
        }
    }

    /// Discards the staged preview and staged label.
    pub fn cancel(&mut self) {
        self.preview = Preview::Idle;
        self.staged_label = None;
    }

    /// Records the label last picked, for display until the next gesture.
    pub fn stage_label(&mut self, label: Option<String>) {
        self.staged_label = label;
    }

    /// Re-clamps the cursor after the view changed length.
    ///
    /// `previous` is the cursor before the mutation. A `None` cursor stays
    /// `None`, an empty view forces `None`, and otherwise the cursor is
    /// clamped to the last entry of the new view. A pending preview that fell
    /// off the end of the view is cancelled.
    pub fn reindex_after_mutation(&mut self, new_view_len: usize, previous: Option<usize>) {
        self.current = match previous {
            _ if new_view_len == 0 => None,
            None => None,
            Some(prev) => Some(prev.min(new_view_len - 1)),
        };
        if let Some(i) = self.preview_index() {
            if i >= new_view_len {
                self.cancel();
            }
        }
    }
}
