//! Keybinding dispatcher for studio.
//!
//! Translates crossterm key and mouse events into session callbacks and UI
//! state changes. The dispatcher branches first on `state.mode`, so each
//! overlay has its own handler. Anything that needs I/O or the persister
//! (save, clear, open) is returned to the event loop as a [`KeyAction`].

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Position;

use crate::app::{AppState, Mode, PanelFocus};

/// What the event loop must do after a key has been handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Continue,
    Quit,
    /// Export the session and write it to the output directory.
    Save,
    /// The session was cleared; purge durable state.
    Clear,
    /// Import the JSONL file at this path.
    Open(String),
}

pub fn handle_key(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match state.mode {
        Mode::Normal => handle_normal(key, state),
        Mode::HelpOverlay => handle_help(key, state),
        Mode::ConfirmDelete => handle_confirm_delete(key, state),
        Mode::ConfirmClear => handle_confirm_clear(key, state),
        Mode::OpenPrompt => handle_prompt(key, state),
    }
}

// ---------------------------------------------------------------------------
// Normal mode
// ---------------------------------------------------------------------------

fn handle_normal(key: KeyEvent, state: &mut AppState) -> KeyAction {
    if let Some(action) = handle_commit_scroll_key(key, state) {
        return action;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return if key.code == KeyCode::Char('c') { KeyAction::Quit } else { KeyAction::Continue };
    }

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            state.scroll_down(1);
            KeyAction::Continue
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.scroll_up(1);
            KeyAction::Continue
        }
        KeyCode::Enter => {
            state.studio.confirm();
            KeyAction::Continue
        }
        KeyCode::Esc => {
            state.studio.cancel();
            KeyAction::Continue
        }
        KeyCode::Char('n') | KeyCode::Right => {
            state.studio.next();
            KeyAction::Continue
        }
        KeyCode::Char('b') | KeyCode::Left => {
            state.studio.back();
            KeyAction::Continue
        }

        KeyCode::Char(c @ '1'..='9') => {
            apply_label_shortcut(c, state);
            KeyAction::Continue
        }
        KeyCode::Char('0') => {
            if state.studio.current().is_some() {
                state.studio.set_label(None);
                state.set_status("label cleared");
            }
            KeyAction::Continue
        }

        KeyCode::Char('u') => {
            let filter = state.studio.filter().toggle_unfinished();
            state.studio.set_filter(filter);
            KeyAction::Continue
        }
        KeyCode::Char('f') => {
            let filter = state.studio.filter().toggle_finished();
            state.studio.set_filter(filter);
            KeyAction::Continue
        }

        KeyCode::Char('d') => {
            if state.highlighted_row().is_some() {
                state.mode = Mode::ConfirmDelete;
            }
            KeyAction::Continue
        }
        KeyCode::Char('C') => {
            if !state.studio.session().is_empty() {
                state.mode = Mode::ConfirmClear;
            }
            KeyAction::Continue
        }
        KeyCode::Char('s') => {
            if state.studio.session().is_empty() {
                state.set_error("nothing to save");
                KeyAction::Continue
            } else {
                KeyAction::Save
            }
        }
        KeyCode::Char('o') => {
            state.prompt.clear();
            state.mode = Mode::OpenPrompt;
            KeyAction::Continue
        }

        KeyCode::Tab => {
            state.focus = state.focus.toggle();
            KeyAction::Continue
        }
        KeyCode::Char('?') => {
            state.help_scroll = 0;
            state.mode = Mode::HelpOverlay;
            KeyAction::Continue
        }
        KeyCode::Char('q') => KeyAction::Quit,

        _ => KeyAction::Continue,
    }
}

/// `1`..`9` pick the Nth entry of the label catalog for the current sample.
fn apply_label_shortcut(digit: char, state: &mut AppState) {
    let Some(n) = digit.to_digit(10) else { return };
    let Some(option) = state.studio.label_options().get(n as usize - 1).cloned() else {
        state.set_error(format!("no label bound to {digit}"));
        return;
    };
    let Some(item) = state.studio.current().map(|v| v.original_index) else {
        return;
    };
    state.studio.set_label(Some(&option.value));
    state.set_status(format!("item #{item} labeled {}", option.label));
}

/// Commit-panel keys that work regardless of focus.
fn handle_commit_scroll_key(key: KeyEvent, state: &mut AppState) -> Option<KeyAction> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('J') => state.scroll_commit_down(1),
        KeyCode::Char('K') => state.scroll_commit_up(1),
        KeyCode::Char('d') if ctrl => state.scroll_commit_down(state.commit_half_page()),
        KeyCode::Char('u') if ctrl => state.scroll_commit_up(state.commit_half_page()),
        KeyCode::Char('g') => state.scroll_commit_top(),
        KeyCode::Char('G') => state.scroll_commit_bottom(),
        KeyCode::Char('[') => state.prev_hunk(),
        KeyCode::Char(']') => state.next_hunk(),
        KeyCode::Char('{') => state.prev_file(),
        KeyCode::Char('}') => state.next_file(),
        _ => return None,
    }
    Some(KeyAction::Continue)
}

// ---------------------------------------------------------------------------
// Overlays
// ---------------------------------------------------------------------------

fn handle_help(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            state.help_scroll = state.help_scroll.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.help_scroll = state.help_scroll.saturating_sub(1);
        }
        KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q') => {
            state.mode = Mode::Normal;
        }
        _ => {}
    }
    KeyAction::Continue
}

fn handle_confirm_delete(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            let target = state
                .highlighted_row()
                .and_then(|row| state.studio.visible_at(row))
                .map(|v| v.original_index);
            state.studio.delete_current();
            if let Some(item) = target {
                state.set_status(format!("item #{item} deleted"));
            }
            state.mode = Mode::Normal;
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            state.mode = Mode::Normal;
        }
        _ => {}
    }
    KeyAction::Continue
}

fn handle_confirm_clear(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            state.studio.clear();
            state.mode = Mode::Normal;
            state.set_status("session cleared");
            KeyAction::Clear
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            state.mode = Mode::Normal;
            KeyAction::Continue
        }
        _ => KeyAction::Continue,
    }
}

fn handle_prompt(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Enter => {
            state.mode = Mode::Normal;
            let path = state.prompt.trim().to_owned();
            state.prompt.clear();
            if path.is_empty() { KeyAction::Continue } else { KeyAction::Open(path) }
        }
        KeyCode::Esc => {
            state.prompt.clear();
            state.mode = Mode::Normal;
            KeyAction::Continue
        }
        KeyCode::Backspace => {
            state.prompt.pop();
            KeyAction::Continue
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            state.prompt.push(c);
            KeyAction::Continue
        }
        _ => KeyAction::Continue,
    }
}

// ---------------------------------------------------------------------------
// Mouse events
// ---------------------------------------------------------------------------

/// Left click focuses a panel (and previews the clicked row in the sample
/// list); the wheel scrolls the focused panel by 3.
pub fn handle_mouse(mouse: MouseEvent, state: &mut AppState) -> KeyAction {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) if state.mode == Mode::Normal => {
            handle_mouse_click(mouse.column, mouse.row, state);
        }
        MouseEventKind::ScrollUp => {
            if state.mode == Mode::HelpOverlay {
                state.help_scroll = state.help_scroll.saturating_sub(3);
            } else if state.mode == Mode::Normal {
                state.scroll_up(3);
            }
        }
        MouseEventKind::ScrollDown => {
            if state.mode == Mode::HelpOverlay {
                state.help_scroll = state.help_scroll.saturating_add(3);
            } else if state.mode == Mode::Normal {
                state.scroll_down(3);
            }
        }
        _ => {}
    }
    KeyAction::Continue
}

fn handle_mouse_click(col: u16, row: u16, state: &mut AppState) {
    let pos = Position { x: col, y: row };
    let [list, commit] = state.panel_rects;

    if list.contains(pos) {
        state.focus = PanelFocus::SampleList;
        // Rows start one cell below the top border.
        if let Some(offset) = row.checked_sub(list.y + 1) {
            let view_index = state.list_state.offset() + offset as usize;
            state.studio.select_preview(view_index);
        }
    } else if commit.contains(pos) {
        state.focus = PanelFocus::Commit;
    }
}
