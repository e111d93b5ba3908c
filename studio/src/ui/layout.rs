//! Panel layout and shared block styling for studio.
//!
//! Pure layout arithmetic, recomputed on every frame from `frame.area()`.
//! The sample list and the label panel stack in the left column; the commit
//! view fills the rest. `Spacing::Overlap(1)` with `MergeStrategy::Fuzzy`
//! makes neighbouring borders share one column.

use chrono::{DateTime, Local};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Margin, Rect, Spacing},
    style::{Modifier, Style},
    symbols::merge::MergeStrategy,
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph},
};

use crate::app::{AppState, Mode};
use crate::theme::Theme;

/// Left column width on wide terminals.
const LIST_PCT: u16 = 30;
/// Left column width below 100 columns.
const LIST_MIN_WIDTH: u16 = 26;

/// Returns `[sample_list, labels, commit, status_bar]` for the current frame.
pub fn compute_layout(frame: &Frame, label_rows: u16) -> [Rect; 4] {
    let [main_area, status_bar] =
        frame.area().layout(&Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]));

    let left_width = if frame.area().width >= 100 {
        Constraint::Percentage(LIST_PCT)
    } else {
        Constraint::Length(LIST_MIN_WIDTH)
    };
    let [left, commit] = main_area
        .layout(&Layout::horizontal([left_width, Constraint::Fill(1)]).spacing(Spacing::Overlap(1)));

    // Progress gauge, three info rows and one row per label, plus borders.
    let labels_height = label_rows.saturating_add(6);
    let [list, labels] = left.layout(
        &Layout::vertical([Constraint::Fill(1), Constraint::Length(labels_height)])
            .spacing(Spacing::Overlap(1)),
    );

    [list, labels, commit, status_bar]
}

/// Inner `Rect` of a bordered panel.
pub fn inner_rect(area: Rect) -> Rect {
    area.inner(Margin { vertical: 1, horizontal: 1 })
}

/// Bordered block: thick and highlighted when focused, plain otherwise.
pub fn panel_block<'a>(title: impl Into<Line<'a>>, is_focused: bool, theme: &Theme) -> Block<'a> {
    let color = if is_focused { theme.border_active } else { theme.border_inactive };
    let border_type = if is_focused { BorderType::Thick } else { BorderType::Plain };

    Block::bordered()
        .title(title)
        .border_type(border_type)
        .border_style(Style::default().fg(color))
        .merge_borders(MergeStrategy::Fuzzy)
}

/// Formats a save timestamp as `MM/DD/YYYY hh:mm:ss` local time, or `Never`.
pub fn format_last_updated(timestamp: Option<i64>) -> String {
    timestamp
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|utc| utc.with_timezone(&Local).format("%m/%d/%Y %I:%M:%S").to_string())
        .unwrap_or_else(|| "Never".to_owned())
}

/// One-row status bar: mode, filter, position, progress, then the status message.
pub fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let mode_text = match state.mode {
        Mode::Normal => " NORMAL ",
        Mode::HelpOverlay => " HELP ",
        Mode::ConfirmDelete | Mode::ConfirmClear => " CONFIRM ",
        Mode::OpenPrompt => " OPEN ",
    };
    let p = state.studio.presentation();
    let progress = p.progress;
    let position = match p.current_index {
        Some(i) => format!("{}/{}", i + 1, p.samples.len()),
        None => "-/-".to_owned(),
    };

    let mut spans = vec![
        Span::styled(mode_text, Style::default().fg(theme.status_mode).add_modifier(Modifier::BOLD)),
        Span::raw(format!(" {} │ {position} │ ", p.filter.name())),
        Span::raw(format!(
            "{} of {} ({}%)",
            progress.completed,
            progress.total,
            progress.percent()
        )),
    ];
    if state.diff_loading {
        spans.push(Span::raw(" │ rendering…"));
    }
    if let Some(msg) = &state.status {
        let color = if msg.is_error { theme.status_error } else { theme.status_ok };
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled(msg.text.clone(), Style::default().fg(color)));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans))
            .style(Style::default().bg(theme.status_bar_bg).fg(theme.status_bar_fg)),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_never_saved() {
        assert_eq!(format_last_updated(None), "Never");
    }

    #[test]
    fn test_saved_timestamp_shape() {
        let text = format_last_updated(Some(1_700_000_000));
        assert_eq!(text.len(), "11/14/2023 10:13:20".len());
        assert_eq!(&text[2..3], "/");
        assert_eq!(&text[5..6], "/");
        assert_eq!(&text[13..14], ":");
    }
}
