//! UI rendering for studio.
//!
//! [`render`] is the single entry point, called from the event loop's
//! `terminal.draw()` closure. Layout arithmetic lives in `layout.rs`; each
//! panel and overlay has its own module.

mod layout;
pub mod commit_view;
pub mod help;
pub mod keybindings;
pub mod overlay;
pub mod sample_list;

use ratatui::Frame;

use crate::app::{AppState, Mode};
use crate::theme::Theme;
use layout::{compute_layout, inner_rect, render_status_bar};

/// Draws one frame.
///
/// Viewport heights and panel rects are written back into `state` so the
/// next keypress can size half-page scrolls and hit-test mouse clicks.
pub fn render(frame: &mut Frame, state: &mut AppState, theme: &Theme) {
    let label_rows = state.studio.label_options().len().min(9) as u16;
    let [list, labels, commit, status_bar] = compute_layout(frame, label_rows);

    state.commit_viewport_height = inner_rect(commit).height;
    state.panel_rects = [list, commit];

    sample_list::render_sample_list(frame, list, state, theme);
    sample_list::render_labels(frame, labels, state, theme);
    commit_view::render_commit(frame, commit, state, theme);
    render_status_bar(frame, status_bar, state, theme);

    match state.mode {
        Mode::Normal => {}
        Mode::HelpOverlay => help::render_help_overlay(frame, theme, state.help_scroll),
        Mode::ConfirmDelete => overlay::render_confirm_delete(frame, state, theme),
        Mode::ConfirmClear => overlay::render_confirm_clear(frame, state, theme),
        Mode::OpenPrompt => overlay::render_open_prompt(frame, state, theme),
    }
}
