//! Help overlay: a centred modal listing every keybinding.

use ratatui::{
    Frame,
    layout::Constraint,
    style::Style,
    text::{Line, Text},
    widgets::{Block, Clear, Paragraph, Wrap},
};

use crate::theme::Theme;

/// Draws the help modal over the panels. Skipped below 60 columns.
pub fn render_help_overlay(frame: &mut Frame, theme: &Theme, help_scroll: u16) {
    if frame.area().width < 60 {
        return;
    }

    let area = frame.area().centered(Constraint::Percentage(70), Constraint::Percentage(80));
    frame.render_widget(Clear, area);

    let block = Block::bordered()
        .title(" Help · j/k scroll, ? or Esc to close ")
        .border_style(Style::default().fg(theme.border_active));

    frame.render_widget(
        Paragraph::new(build_help_text())
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((help_scroll, 0)),
        area,
    );
}

fn build_help_text() -> Text<'static> {
    Text::from(vec![
        Line::from("Items"),
        Line::from("  j / k         Preview next / previous item"),
        Line::from("  Enter         Go to the previewed item"),
        Line::from("  Esc           Drop the preview"),
        Line::from("  n / →         Next item"),
        Line::from("  b / ←         Previous item"),
        Line::from("  click         Preview the clicked item"),
        Line::from(""),
        Line::from("Labels"),
        Line::from("  1 - 9         Apply the numbered label to the current item"),
        Line::from("  0             Clear the current item's label"),
        Line::from(""),
        Line::from("Filters"),
        Line::from("  u             Only unfinished items (again for all)"),
        Line::from("  f             Only finished items (again for all)"),
        Line::from(""),
        Line::from("Commit"),
        Line::from("  J / K         Scroll one line"),
        Line::from("  Ctrl-d / u    Scroll half a page"),
        Line::from("  g / G         Top / bottom"),
        Line::from("  [ / ]         Previous / next hunk"),
        Line::from("  { / }         Previous / next file"),
        Line::from("  Tab           Switch focus between items and commit"),
        Line::from(""),
        Line::from("Session"),
        Line::from("  o             Open a JSONL dataset"),
        Line::from("  s             Save the labeled dataset"),
        Line::from("  d             Delete the previewed or current item"),
        Line::from("  C             Clear the whole session"),
        Line::from("  ?             Toggle this help"),
        Line::from("  q / Ctrl-c    Quit"),
    ])
}
