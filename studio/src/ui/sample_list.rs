//! Sample list panel and label panel.
//!
//! Each visible sample is one row, `✅ item #N` when labeled or `🚫 item #N`
//! when not, numbered by its index in the full list so numbers stay stable
//! under filters. The staged preview row is highlighted distinctly from the
//! committed cursor.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Gauge, List, ListItem, Paragraph},
};
use studio_core::VisibleSample;

use crate::app::{AppState, PanelFocus};
use crate::theme::Theme;
use crate::ui::layout::{format_last_updated, inner_rect, panel_block};

pub fn render_sample_list(frame: &mut Frame, area: Rect, state: &mut AppState, theme: &Theme) {
    let is_focused = state.focus == PanelFocus::SampleList;
    let (title, items, previewing) = {
        let p = state.studio.presentation();
        let title = format!("Items ({}/{})", p.samples.len(), p.total());
        let items: Vec<ListItem> = if p.samples.is_empty() {
            let msg = if p.total() == 0 {
                "No items. Press o to open."
            } else {
                "No items match the filter"
            };
            vec![ListItem::new(Line::raw(msg))]
        } else {
            p.samples
                .iter()
                .enumerate()
                .map(|(row, v)| {
                    let label = p.label_display(v.sample.label().unwrap_or(""));
                    sample_item(v, Some(row) == p.current_index, label, theme)
                })
                .collect()
        };
        (title, items, p.previewing().is_some())
    };

    let highlight = if previewing { theme.item_preview } else { theme.item_current };
    let list = List::new(items)
        .block(panel_block(title, is_focused, theme))
        .highlight_symbol("› ")
        .highlight_style(Style::default().fg(highlight).add_modifier(Modifier::REVERSED));

    let selected = state.highlighted_row();
    state.list_state.select(selected);
    frame.render_stateful_widget(list, area, &mut state.list_state);
}

fn sample_item<'a>(
    v: &VisibleSample<'_>,
    is_current: bool,
    label: &str,
    theme: &Theme,
) -> ListItem<'a> {
    let (marker, color) = if v.sample.is_labeled() {
        ("✅", theme.item_done)
    } else {
        ("🚫", theme.item_todo)
    };
    let mut name = Style::default().fg(color);
    if is_current {
        name = name.add_modifier(Modifier::BOLD);
    }
    let mut spans = vec![
        Span::raw(format!("{marker} ")),
        Span::styled(format!("item #{}", v.original_index), name),
    ];
    if !label.is_empty() {
        spans.push(Span::styled(format!("  {label}"), Style::default().fg(theme.label_text)));
    }
    ListItem::new(Line::from(spans))
}

/// Progress gauge, last-updated time, the current label and the numbered
/// label catalog.
pub fn render_labels(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let p = state.studio.presentation();
    let block = panel_block("Labels", false, theme);
    let inner = inner_rect(area);
    frame.render_widget(block, area);
    if inner.height == 0 {
        return;
    }

    let [gauge_area, body] =
        inner.layout(&Layout::vertical([Constraint::Length(1), Constraint::Fill(1)]));

    let progress = p.progress;
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(theme.progress_fill))
        .percent(progress.percent().min(100))
        .label(format!("{} / {}", progress.completed, progress.total));
    frame.render_widget(gauge, gauge_area);

    let meta = Style::default().fg(theme.commit_meta);
    let current_label = p.current_label;
    let mut lines = vec![
        Line::from(vec![
            Span::styled("Last updated ", meta),
            Span::raw(format_last_updated(p.metadata.timestamp)),
        ]),
        Line::from(vec![
            Span::styled("Label        ", meta),
            Span::styled(
                current_label.map_or("none", |l| p.label_display(l)).to_owned(),
                Style::default().fg(theme.label_text),
            ),
        ]),
        Line::default(),
    ];
    for (i, option) in p.label_options.iter().take(9).enumerate() {
        let selected = current_label == Some(option.value.as_str());
        let style = if selected {
            Style::default().fg(theme.label_text).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{} ", i + 1), meta),
            Span::styled(option.label.clone(), style),
        ]));
    }
    frame.render_widget(Paragraph::new(lines), body);
}
