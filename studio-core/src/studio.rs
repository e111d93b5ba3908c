//! Application root for the session engine.
//!
//! [`Studio`] owns the session, the active filter, the navigation cursor and
//! the label catalog, and exposes the callbacks the presentation layer calls.
//! Every callback runs to completion: it replaces the session value,
//! re-projects the view and re-clamps the cursor before returning, so the
//! caller never observes a cursor that points outside the view.
//!
//! Persistence is not triggered from here. After each callback the caller
//! hands [`Studio::session`] to a
//! [`SessionPersister`](crate::persist::SessionPersister), and calls its
//! `purge` after [`Studio::clear`].

use tracing::{debug, info};

use crate::error::StudioError;
use crate::nav::{Navigator, Preview};
use crate::persist;
use crate::session::Session;
use crate::types::{LabelOption, Metadata};
use crate::view::{project, Filter, Progress, VisibleSample};

/// A finished export: the suggested file name and the JSONL bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Everything the presentation layer reads to draw one frame.
#[derive(Debug, Clone)]
pub struct Presentation<'a> {
    pub samples: Vec<VisibleSample<'a>>,
    pub metadata: &'a Metadata,
    pub current_index: Option<usize>,
    pub preview: Preview,
    pub filter: Filter,
    pub progress: Progress,
    pub label_options: &'a [LabelOption],
    /// Label shown in the picker: the staged one, else the current sample's.
    pub current_label: Option<&'a str>,
}

impl<'a> Presentation<'a> {
    /// Display name for a label value, falling back to the value itself.
    pub fn label_display(&self, value: &'a str) -> &'a str {
        self.label_options
            .iter()
            .find(|o| o.value == value)
            .map_or(value, |o| o.label.as_str())
    }

    /// Number of samples in the full, unfiltered list.
    pub fn total(&self) -> usize {
        self.progress.total
    }

    /// View position of the row being previewed, if any.
    pub fn previewing(&self) -> Option<usize> {
        match self.preview {
            Preview::Previewing(i) => Some(i),
            Preview::Idle | Preview::Committed(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Studio {
    session: Session,
    filter: Filter,
    nav: Navigator,
    /// Original indices of the latest projection, in view order.
    visible: Vec<usize>,
    label_options: Vec<LabelOption>,
}

impl Studio {
    /// An empty studio with the given label catalog.
    pub fn new(label_options: Vec<LabelOption>) -> Self {
        Self::with_session(Session::default(), label_options)
    }

    /// A studio resuming `session`, e.g. one returned by
    /// [`persist::restore`].
    pub fn with_session(session: Session, label_options: Vec<LabelOption>) -> Self {
        let mut studio = Self {
            session: Session::default(),
            filter: Filter::All,
            nav: Navigator::default(),
            visible: Vec::new(),
            label_options,
        };
        studio.load(session);
        studio
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn navigator(&self) -> &Navigator {
        &self.nav
    }

    pub fn label_options(&self) -> &[LabelOption] {
        &self.label_options
    }

    pub fn current_index(&self) -> Option<usize> {
        self.nav.current()
    }

    pub fn view_len(&self) -> usize {
        self.visible.len()
    }

    /// The projected view for the active filter.
    pub fn view(&self) -> Vec<VisibleSample<'_>> {
        self.visible
            .iter()
            .filter_map(|&original_index| {
                self.session
                    .get(original_index)
                    .map(|sample| VisibleSample { sample, original_index })
            })
            .collect()
    }

    /// View entry at `view_index`.
    pub fn visible_at(&self, view_index: usize) -> Option<VisibleSample<'_>> {
        let original_index = *self.visible.get(view_index)?;
        self.session
            .get(original_index)
            .map(|sample| VisibleSample { sample, original_index })
    }

    /// View entry under the cursor.
    pub fn current(&self) -> Option<VisibleSample<'_>> {
        self.visible_at(self.nav.current()?)
    }

    pub fn progress(&self) -> Progress {
        Progress::of(self.session.samples())
    }

    /// The staged label if one was just picked, else the current sample's label.
    pub fn current_label(&self) -> Option<&str> {
        self.nav
            .staged_label()
            .or_else(|| self.current().and_then(|v| v.sample.label()))
    }

    pub fn presentation(&self) -> Presentation<'_> {
        Presentation {
            samples: self.view(),
            metadata: self.session.metadata(),
            current_index: self.nav.current(),
            preview: self.nav.preview(),
            filter: self.filter,
            progress: self.progress(),
            label_options: &self.label_options,
            current_label: self.current_label(),
        }
    }

    /// Re-projects the view, re-clamps the cursor against it starting from
    /// `previous`, and writes the cursor back into the session.
    fn refresh(&mut self, previous: Option<usize>) {
        self.visible = project(self.session.samples(), self.filter)
            .into_iter()
            .map(|v| v.original_index)
            .collect();
        self.nav.reindex_after_mutation(self.visible.len(), previous);
        self.sync_cursor();
    }

    fn sync_cursor(&mut self) {
        if self.session.current_index() != self.nav.current() {
            self.session = self.session.with_current_index(self.nav.current());
        }
    }

    /// Replaces the whole session. The filter resets to `All`, so the
    /// session's stored index addresses the unfiltered list.
    pub fn load(&mut self, session: Session) {
        self.filter = Filter::All;
        self.nav = Navigator::new(session.current_index());
        self.session = session;
        self.refresh(self.nav.current());
    }

    /// Imports a JSONL document, replacing the session.
    ///
    /// # Errors
    ///
    /// Returns `StudioError::Parse` for a malformed line; the current
    /// session is left exactly as it was.
    pub fn import_jsonl(&mut self, bytes: &[u8], file_name: Option<&str>) -> Result<(), StudioError> {
        let session = persist::import_jsonl(bytes, file_name)?;
        self.load(session);
        Ok(())
    }

    /// Resets to the empty session. The caller must also purge durable state.
    pub fn clear(&mut self) {
        info!(samples = self.session.len(), "clearing session");
        self.load(Session::default());
    }

    pub fn next(&mut self) {
        self.nav.cancel();
        self.nav.next(self.visible.len());
        self.sync_cursor();
    }

    pub fn back(&mut self) {
        self.nav.cancel();
        self.nav.back(self.visible.len());
        self.sync_cursor();
    }

    /// Stages `view_index` as a navigation target; see [`Studio::confirm`].
    pub fn select_preview(&mut self, view_index: usize) {
        self.nav.select_preview(view_index, self.visible.len());
    }

    /// Moves the cursor to the staged preview.
    pub fn confirm(&mut self) {
        self.nav.confirm();
        self.sync_cursor();
    }

    pub fn cancel(&mut self) {
        self.nav.cancel();
    }

    /// Sets (or with `None`, clears) the label of the sample under the cursor.
    ///
    /// The sample may drop out of a filtered view; the cursor then stays at
    /// the same position, which now holds the following sample.
    pub fn set_label(&mut self, label: Option<&str>) {
        let Some(target) = self.current() else {
            debug!("set_label on empty view");
            return;
        };
        let original_index = target.original_index;
        let previous = self.nav.current();

        self.session = self.session.with_label(original_index, label);
        self.nav.stage_label(label.map(str::to_owned));
        self.refresh(previous);
    }

    pub fn set_filter(&mut self, filter: Filter) {
        let previous = self.nav.current();
        self.filter = filter;
        self.nav.cancel();
        self.refresh(previous);
    }

    /// Deletes the previewed sample if a preview is staged, otherwise the
    /// sample under the cursor. Deletion is keyed by original index.
    pub fn delete_current(&mut self) {
        let Some(view_index) = self.nav.preview_index().or(self.nav.current()) else {
            debug!("delete on empty view");
            return;
        };
        let Some(original_index) = self.visible.get(view_index).copied() else {
            debug!(view_index, "delete target outside view");
            return;
        };
        let previous = self.nav.current();

        info!(original_index, "deleting sample");
        self.session = self.session.delete_at(original_index);
        self.nav.cancel();
        self.refresh(previous);
    }

    /// Stamps the metadata with the save time and cursor, then exports the
    /// full session.
    ///
    /// # Errors
    ///
    /// Returns `StudioError::Encode` if a record fails to serialize.
    pub fn save(&mut self) -> Result<Export, StudioError> {
        let metadata = self.session.snapshot_metadata(self.nav.current());
        self.session = self.session.with_metadata(metadata);

        let bytes = persist::export_jsonl(&self.session)?;
        let file_name = persist::export_file_name(self.session.metadata());
        info!(file = %file_name, samples = self.session.len(), "exported session");
        Ok(Export { file_name, bytes })
    }
}
