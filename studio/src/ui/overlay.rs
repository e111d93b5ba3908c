//! Small modal dialogs: y/n confirmations and the open-file prompt.

use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph, Wrap},
};

use crate::app::AppState;
use crate::theme::Theme;

fn dialog_area(frame: &Frame, height: u16) -> Rect {
    frame.area().centered(Constraint::Max(64), Constraint::Length(height))
}

fn dialog_block<'a>(title: &'a str, theme: &Theme) -> Block<'a> {
    Block::bordered()
        .title(title)
        .border_style(Style::default().fg(theme.border_active))
}

pub fn render_confirm_delete(frame: &mut Frame, state: &AppState, theme: &Theme) {
    let target = state
        .highlighted_row()
        .and_then(|row| state.studio.visible_at(row))
        .map_or_else(|| "this item".to_owned(), |v| format!("item #{}", v.original_index));
    render_confirm(frame, " Delete ", &format!("Delete {target}?"), theme);
}

pub fn render_confirm_clear(frame: &mut Frame, state: &AppState, theme: &Theme) {
    let n = state.studio.session().len();
    render_confirm(
        frame,
        " Clear ",
        &format!("Discard all {n} items and the saved session?"),
        theme,
    );
}

fn render_confirm(frame: &mut Frame, title: &str, question: &str, theme: &Theme) {
    let area = dialog_area(frame, 5);
    frame.render_widget(Clear, area);
    let text = vec![
        Line::from(question.to_owned()),
        Line::default(),
        Line::from(vec![
            Span::styled("y", Style::default().fg(theme.status_ok).add_modifier(Modifier::BOLD)),
            Span::raw(" yes   "),
            Span::styled("n", Style::default().fg(theme.status_error).add_modifier(Modifier::BOLD)),
            Span::raw(" no"),
        ]),
    ];
    frame.render_widget(
        Paragraph::new(text).block(dialog_block(title, theme)).wrap(Wrap { trim: true }),
        area,
    );
}

pub fn render_open_prompt(frame: &mut Frame, state: &AppState, theme: &Theme) {
    let area = dialog_area(frame, 3);
    frame.render_widget(Clear, area);
    let line = Line::from(vec![
        Span::raw(state.prompt.clone()),
        Span::styled("█", Style::default().fg(theme.border_active)),
    ]);
    frame.render_widget(
        Paragraph::new(line).block(dialog_block(" Open JSONL · Enter to load, Esc to cancel ", theme)),
        area,
    );
}
