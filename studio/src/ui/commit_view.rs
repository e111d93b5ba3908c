//! Commit panel with manual virtual scrolling.
//!
//! Only `diff_lines[commit_scroll..commit_scroll + height]` is materialised
//! per frame, so long commits cost O(viewport) to draw.

use ratatui::{
    Frame,
    layout::Rect,
    text::Line,
    widgets::{List, ListItem},
};

use crate::app::{AppState, PanelFocus};
use crate::theme::Theme;
use crate::ui::layout::{inner_rect, panel_block};

pub fn render_commit(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let is_focused = state.focus == PanelFocus::Commit;
    let title = match state.studio.current() {
        Some(v) => format!("Commit · item #{}", v.original_index),
        None => "Commit".to_owned(),
    };
    let block = panel_block(title, is_focused, theme);
    let inner = inner_rect(area);
    frame.render_widget(block, area);

    if state.diff_lines.is_empty() {
        let msg = if state.diff_loading {
            "Rendering commit..."
        } else if state.studio.view_len() == 0 {
            "Nothing selected."
        } else {
            "No commit loaded."
        };
        frame.render_widget(List::new(vec![ListItem::new(Line::raw(msg))]), inner);
        return;
    }

    let total = state.diff_lines.len();
    let start = state.commit_scroll.min(total.saturating_sub(1));
    let end = (start + inner.height as usize).min(total);

    let items: Vec<ListItem> =
        state.diff_lines[start..end].iter().map(|l| ListItem::new(l.clone())).collect();
    frame.render_widget(List::new(items), inner);
}
