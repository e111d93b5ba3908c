//! Central UI state for studio.
//!
//! `AppState` wraps the session engine ([`Studio`]) together with everything
//! the terminal needs on top of it: mode, focus, scroll offsets, cached
//! viewport heights, the rendered commit view and the transient status line.
//! No rendering happens here; `ui` reads this state and `ui::keybindings`
//! mutates it.

use std::time::{Duration, Instant};

use crossbeam_channel::Sender;
use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui::widgets::ListState;
use studio_core::Studio;
use tracing::debug;

use crate::diff::types::{DiffKey, DiffRequest, DiffResultPayload};

/// How long a status message stays in the status bar.
const STATUS_TTL: Duration = Duration::from_secs(4);

/// Input mode controlling which keybinding set is active.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Normal,
    HelpOverlay,
    /// y/n dialog before deleting the previewed or current item.
    ConfirmDelete,
    /// y/n dialog before discarding the whole session.
    ConfirmClear,
    /// Single-line prompt for a JSONL path to import.
    OpenPrompt,
}

/// Which panel receives scroll keys.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PanelFocus {
    #[default]
    SampleList,
    Commit,
}

impl PanelFocus {
    pub fn toggle(self) -> Self {
        match self {
            PanelFocus::SampleList => PanelFocus::Commit,
            PanelFocus::Commit => PanelFocus::SampleList,
        }
    }
}

/// Transient one-line message shown in the status bar.
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
    expires_at: Instant,
}

pub struct AppState {
    pub studio: Studio,
    pub mode: Mode,
    pub focus: PanelFocus,

    /// Selection state backing the sample list; synced from the navigator on render.
    pub list_state: ListState,

    /// First visible line of the commit panel.
    pub commit_scroll: usize,
    pub commit_viewport_height: u16,
    pub help_scroll: u16,

    /// Text typed into the open-file prompt.
    pub prompt: String,
    pub status: Option<StatusMessage>,

    /// Rendered commit view for `diff_key`.
    pub diff_lines: Vec<Line<'static>>,
    pub hunk_offsets: Vec<usize>,
    pub file_offsets: Vec<usize>,
    pub hunk_cursor: usize,
    /// True while a request for `diff_key` is outstanding.
    pub diff_loading: bool,
    /// Sample the commit panel shows, or is waiting on.
    pub diff_key: Option<DiffKey>,
    pub diff_tx: Option<Sender<DiffRequest>>,

    /// Outer rects of `[sample list, commit]` from the last frame, for mouse hit tests.
    pub panel_rects: [Rect; 2],
}

impl AppState {
    pub fn new(studio: Studio) -> Self {
        Self {
            studio,
            mode: Mode::default(),
            focus: PanelFocus::default(),
            list_state: ListState::default(),
            commit_scroll: 0,
            commit_viewport_height: 0,
            help_scroll: 0,
            prompt: String::new(),
            status: None,
            diff_lines: Vec::new(),
            hunk_offsets: Vec::new(),
            file_offsets: Vec::new(),
            hunk_cursor: 0,
            diff_loading: false,
            diff_key: None,
            diff_tx: None,
            panel_rects: [Rect::default(); 2],
        }
    }

    pub fn set_status(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            is_error: false,
            expires_at: Instant::now() + STATUS_TTL,
        });
    }

    pub fn set_error(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            is_error: true,
            expires_at: Instant::now() + STATUS_TTL,
        });
    }

    /// Drops the status message once it has expired. Called on every tick.
    pub fn on_tick(&mut self) {
        if self.status.as_ref().is_some_and(|s| Instant::now() >= s.expires_at) {
            self.status = None;
        }
    }

    /// Moves the staged preview one row up or down from the preview, or from
    /// the cursor when nothing is staged.
    pub fn step_preview(&mut self, forward: bool) {
        let len = self.studio.view_len();
        if len == 0 {
            return;
        }
        let nav = self.studio.navigator();
        let target = match nav.preview_index().or(nav.current()) {
            Some(from) if forward => (from + 1).min(len - 1),
            Some(from) => from.saturating_sub(1),
            None => 0,
        };
        self.studio.select_preview(target);
    }

    /// Row the sample list should highlight: the preview if one is staged,
    /// else the cursor.
    pub fn highlighted_row(&self) -> Option<usize> {
        let nav = self.studio.navigator();
        nav.preview_index().or(nav.current())
    }

    pub fn scroll_down(&mut self, lines: u16) {
        match self.focus {
            PanelFocus::SampleList => {
                for _ in 0..lines {
                    self.step_preview(true);
                }
            }
            PanelFocus::Commit => self.scroll_commit_down(lines as usize),
        }
    }

    pub fn scroll_up(&mut self, lines: u16) {
        match self.focus {
            PanelFocus::SampleList => {
                for _ in 0..lines {
                    self.step_preview(false);
                }
            }
            PanelFocus::Commit => self.scroll_commit_up(lines as usize),
        }
    }

    pub fn scroll_commit_down(&mut self, lines: usize) {
        let max = self.diff_lines.len().saturating_sub(1);
        self.commit_scroll = self.commit_scroll.saturating_add(lines).min(max);
    }

    pub fn scroll_commit_up(&mut self, lines: usize) {
        self.commit_scroll = self.commit_scroll.saturating_sub(lines);
    }

    /// Half the commit viewport, at least one line.
    pub fn commit_half_page(&self) -> usize {
        (self.commit_viewport_height / 2).max(1) as usize
    }

    pub fn scroll_commit_top(&mut self) {
        self.commit_scroll = 0;
        self.hunk_cursor = 0;
    }

    pub fn scroll_commit_bottom(&mut self) {
        self.commit_scroll = self.diff_lines.len().saturating_sub(1);
    }

    pub fn prev_hunk(&mut self) {
        if self.hunk_offsets.is_empty() {
            return;
        }
        self.hunk_cursor = self.hunk_cursor.saturating_sub(1);
        self.commit_scroll = self.hunk_offsets[self.hunk_cursor];
    }

    pub fn next_hunk(&mut self) {
        if self.hunk_offsets.is_empty() {
            return;
        }
        self.hunk_cursor = (self.hunk_cursor + 1).min(self.hunk_offsets.len() - 1);
        self.commit_scroll = self.hunk_offsets[self.hunk_cursor];
    }

    /// Scrolls the commit panel to the next file header below the top line.
    pub fn next_file(&mut self) {
        if let Some(&offset) = self.file_offsets.iter().find(|&&o| o > self.commit_scroll) {
            self.commit_scroll = offset;
        }
    }

    pub fn prev_file(&mut self) {
        if let Some(&offset) = self.file_offsets.iter().rev().find(|&&o| o < self.commit_scroll) {
            self.commit_scroll = offset;
        }
    }

    /// Sends a render request when the sample under the cursor differs from
    /// the one the commit panel shows. Clears the panel when the view is empty.
    pub fn request_diff(&mut self) {
        let Some(current) = self.studio.current() else {
            if self.diff_key.take().is_some() {
                self.diff_lines.clear();
                self.hunk_offsets.clear();
                self.file_offsets.clear();
                self.diff_loading = false;
                self.scroll_commit_top();
            }
            return;
        };
        let key = DiffKey {
            original_index: current.original_index,
            hash: current.sample.commit.hash.clone(),
        };
        if self.diff_key.as_ref() == Some(&key) {
            return;
        }

        let request = DiffRequest {
            key: key.clone(),
            message: current.sample.commit.message.clone(),
            repository: current.sample.repository.clone(),
            modifications: current.sample.commit.modifications.clone(),
        };
        self.diff_key = Some(key);
        self.diff_loading = true;
        self.scroll_commit_top();
        if let Some(tx) = &self.diff_tx {
            if tx.send(request).is_err() {
                debug!("diff worker gone, commit view will not update");
                self.diff_loading = false;
            }
        }
    }

    /// Installs a rendered commit view unless it is for a sample the cursor
    /// has already left.
    pub fn apply_diff_result(&mut self, payload: DiffResultPayload) {
        if self.diff_key.as_ref() != Some(&payload.key) {
            debug!(index = payload.key.original_index, "dropping stale commit view");
            return;
        }
        self.diff_lines = payload.lines;
        self.hunk_offsets = payload.hunk_offsets;
        self.file_offsets = payload.file_offsets;
        self.diff_loading = false;
        self.scroll_commit_top();
    }
}
