//! Background thread that renders commits into highlighted lines.
//!
//! Runs on a plain `std::thread`: syntect highlighting is CPU-bound and must
//! not stall the tokio runtime. Requests arrive over crossbeam, results leave
//! as `AppEvent::DiffResult`.

use std::sync::LazyLock;

use crossbeam_channel::Receiver;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use similar::{ChangeTag, TextDiff};
use studio_core::Modification;
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::diff::types::{DiffRequest, DiffResultPayload, OwnedDiffHunk, OwnedDiffLine};
use crate::event::AppEvent;
use crate::theme::Theme;

static PS: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static TS: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

const CONTEXT_RADIUS: usize = 3;

/// Entry point for the diff thread.
///
/// Loops until every request sender is dropped. Only the newest queued
/// request is rendered: older ones are already stale by the time the thread
/// gets to them.
pub fn diff_worker_loop(
    rx: Receiver<DiffRequest>,
    event_tx: UnboundedSender<AppEvent>,
    theme: Theme,
) {
    let _ = &*PS;
    let _ = &*TS;

    while let Ok(mut request) = rx.recv() {
        while let Ok(newer) = rx.try_recv() {
            request = newer;
        }
        debug!(index = request.key.original_index, hash = %request.key.hash, "rendering commit");
        let payload = render_commit(&request, &theme);
        if event_tx.send(AppEvent::DiffResult(Box::new(payload))).is_err() {
            break;
        }
    }
}

/// Renders the commit header followed by one highlighted diff per modification.
fn render_commit(request: &DiffRequest, theme: &Theme) -> DiffResultPayload {
    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut hunk_offsets = Vec::new();
    let mut file_offsets = Vec::new();

    let meta = Style::default().fg(theme.commit_meta);
    lines.push(Line::from(vec![
        Span::styled("commit ", meta),
        Span::styled(request.key.hash.clone(), meta.add_modifier(Modifier::BOLD)),
    ]));
    if !request.repository.is_empty() {
        lines.push(Line::from(Span::styled(format!("repo   {}", request.repository), meta)));
    }
    lines.push(Line::default());
    for msg_line in request.message.lines() {
        lines.push(Line::from(Span::styled(
            format!("    {msg_line}"),
            Style::default().fg(theme.commit_message),
        )));
    }
    lines.push(Line::default());

    if request.modifications.is_empty() {
        lines.push(Line::from(Span::styled("(no modifications)", meta)));
    }

    for modification in &request.modifications {
        file_offsets.push(lines.len());
        lines.push(file_header(modification, theme));

        let hunks = build_hunks(
            modification.old_content.as_deref().unwrap_or(""),
            modification.new_content.as_deref().unwrap_or(""),
        );
        if hunks.is_empty() {
            lines.push(Line::from(Span::styled("    (no textual changes)", meta)));
        }
        let ext = file_ext(modification.display_path());
        let (highlighted, offsets) = highlight_hunks(&hunks, ext, theme);
        let base = lines.len();
        hunk_offsets.extend(offsets.into_iter().map(|o| o + base));
        lines.extend(highlighted);
        lines.push(Line::default());
    }

    DiffResultPayload { key: request.key.clone(), lines, hunk_offsets, file_offsets }
}

fn file_header(modification: &Modification, theme: &Theme) -> Line<'static> {
    let text = match (&modification.old_filepath, &modification.new_filepath) {
        (Some(old), Some(new)) if old != new => format!("renamed {old} → {new}"),
        (None, Some(new)) => format!("added {new}"),
        (Some(old), None) => format!("deleted {old}"),
        _ => modification.display_path().to_owned(),
    };
    Line::from(Span::styled(
        text,
        Style::default().fg(theme.diff_file_header).add_modifier(Modifier::BOLD),
    ))
}

/// Line-level unified diff of one file, grouped into hunks.
fn build_hunks(old: &str, new: &str) -> Vec<OwnedDiffHunk> {
    let diff = TextDiff::from_lines(old, new);
    let mut unified = diff.unified_diff();
    unified.context_radius(CONTEXT_RADIUS);

    unified
        .iter_hunks()
        .map(|hunk| OwnedDiffHunk {
            header: hunk.header().to_string(),
            lines: hunk
                .iter_changes()
                .map(|change| OwnedDiffLine {
                    origin: match change.tag() {
                        ChangeTag::Insert => '+',
                        ChangeTag::Delete => '-',
                        ChangeTag::Equal => ' ',
                    },
                    content: change.value().trim_end_matches(['\n', '\r']).to_owned(),
                })
                .collect(),
        })
        .collect()
}

/// Converts a syntect (Style, &str) pair to an owned ratatui Span.
fn syntect_to_span(style: syntect::highlighting::Style, content: &str) -> Span<'static> {
    use syntect::highlighting::{Color as SC, FontStyle};
    let to_color = |c: SC| (c.a > 0).then_some(Color::Rgb(c.r, c.g, c.b));
    let mut ratatui_style = Style::default();
    if let Some(fg) = to_color(style.foreground) {
        ratatui_style = ratatui_style.fg(fg);
    }
    if style.font_style.contains(FontStyle::BOLD) {
        ratatui_style = ratatui_style.add_modifier(Modifier::BOLD);
    }
    if style.font_style.contains(FontStyle::ITALIC) {
        ratatui_style = ratatui_style.add_modifier(Modifier::ITALIC);
    }
    Span::styled(content.to_owned(), ratatui_style)
}

fn build_syntect_spans(code: &str, h: &mut HighlightLines) -> Vec<Span<'static>> {
    let ranges = h.highlight_line(code, &PS).unwrap_or_default();
    let spans: Vec<Span<'static>> =
        ranges.into_iter().map(|(style, text)| syntect_to_span(style, text)).collect();
    if spans.is_empty() {
        vec![Span::raw(code.to_owned())]
    } else {
        spans
    }
}

/// Word-level emphasis for a removed/added line pair.
fn word_diff_spans(
    old_line: &str,
    new_line: &str,
    theme: &Theme,
) -> (Vec<Span<'static>>, Vec<Span<'static>>) {
    let diff = TextDiff::from_words(old_line, new_line);
    let removed = Style::default().fg(theme.diff_removed);
    let added = Style::default().fg(theme.diff_added);
    let unchanged = Style::default().fg(theme.commit_meta);
    let mut old_spans = Vec::new();
    let mut new_spans = Vec::new();

    for op in diff.ops() {
        for change in diff.iter_inline_changes(op) {
            for (emphasized, value) in change.iter_strings_lossy() {
                let text = value.into_owned();
                let emphasize =
                    |s: Style| if emphasized { s.add_modifier(Modifier::BOLD) } else { s };
                match change.tag() {
                    ChangeTag::Delete => old_spans.push(Span::styled(text, emphasize(removed))),
                    ChangeTag::Insert => new_spans.push(Span::styled(text, emphasize(added))),
                    ChangeTag::Equal => {
                        old_spans.push(Span::styled(text.clone(), unchanged));
                        new_spans.push(Span::styled(text, unchanged));
                    }
                }
            }
        }
    }
    (old_spans, new_spans)
}

fn prefixed(prefix: &'static str, color: Color, rest: Vec<Span<'static>>) -> Line<'static> {
    let mut spans = vec![Span::styled(prefix, Style::default().fg(color))];
    spans.extend(rest);
    Line::from(spans)
}

/// Highlights hunks, pairing a removed line with the added line that follows
/// it for word-level emphasis. Returns the lines and hunk-header offsets.
fn highlight_hunks(
    hunks: &[OwnedDiffHunk],
    ext: &str,
    theme: &Theme,
) -> (Vec<Line<'static>>, Vec<usize>) {
    let syntect_theme = TS.themes.get("base16-ocean.dark").or_else(|| TS.themes.values().next());
    let syntax = PS.find_syntax_by_extension(ext).unwrap_or_else(|| PS.find_syntax_plain_text());

    let mut out: Vec<Line<'static>> = Vec::new();
    let mut hunk_offsets = Vec::new();

    for hunk in hunks {
        hunk_offsets.push(out.len());
        out.push(Line::from(Span::styled(
            hunk.header.trim_end().to_owned(),
            Style::default().fg(theme.diff_hunk_header),
        )));

        let Some(t) = syntect_theme else {
            emit_plain_hunk_lines(&hunk.lines, theme, &mut out);
            continue;
        };
        let mut h = HighlightLines::new(syntax, t);
        let mut pending_removed: Option<(String, Vec<Span<'static>>)> = None;

        for dl in &hunk.lines {
            let base_spans = build_syntect_spans(&dl.content, &mut h);
            match dl.origin {
                '-' => {
                    if let Some((_, spans)) = pending_removed.take() {
                        out.push(prefixed("- ", theme.diff_removed, spans));
                    }
                    pending_removed = Some((dl.content.clone(), base_spans));
                }
                '+' => match pending_removed.take() {
                    Some((old_code, _)) => {
                        let (old_words, new_words) = word_diff_spans(&old_code, &dl.content, theme);
                        out.push(prefixed("- ", theme.diff_removed, old_words));
                        out.push(prefixed("+ ", theme.diff_added, new_words));
                    }
                    None => out.push(prefixed("+ ", theme.diff_added, base_spans)),
                },
                _ => {
                    if let Some((_, spans)) = pending_removed.take() {
                        out.push(prefixed("- ", theme.diff_removed, spans));
                    }
                    out.push(prefixed("  ", theme.diff_context, base_spans));
                }
            }
        }
        if let Some((_, spans)) = pending_removed.take() {
            out.push(prefixed("- ", theme.diff_removed, spans));
        }
    }

    (out, hunk_offsets)
}

/// Fallback when the syntect theme set is empty.
fn emit_plain_hunk_lines(lines: &[OwnedDiffLine], theme: &Theme, out: &mut Vec<Line<'static>>) {
    for dl in lines {
        let color = match dl.origin {
            '+' => theme.diff_added,
            '-' => theme.diff_removed,
            _ => theme.diff_context,
        };
        out.push(Line::from(Span::styled(
            format!("{} {}", dl.origin, dl.content),
            Style::default().fg(color),
        )));
    }
}

/// Extension used to pick a syntax; "txt" when the path has none.
fn file_ext(path: &str) -> &str {
    std::path::Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("txt")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::types::DiffKey;

    fn modification(old: Option<&str>, new: Option<&str>) -> Modification {
        Modification {
            old_filepath: Some("src/lib.rs".into()),
            new_filepath: Some("src/lib.rs".into()),
            old_content: old.map(str::to_owned),
            new_content: new.map(str::to_owned),
            extra: Default::default(),
        }
    }

    #[test]
    fn test_build_hunks_single_change() {
        let hunks = build_hunks("a\nb\nc\n", "a\nB\nc\n");
        assert_eq!(hunks.len(), 1);
        assert!(hunks[0].header.starts_with("@@ -1,3 +1,3 @@"));
        let origins: Vec<char> = hunks[0].lines.iter().map(|l| l.origin).collect();
        assert_eq!(origins, vec![' ', '-', '+', ' ']);
        assert_eq!(hunks[0].lines[2].content, "B");
    }

    #[test]
    fn test_build_hunks_new_file() {
        let hunks = build_hunks("", "fn a() {}\nfn b() {}\n");
        assert_eq!(hunks.len(), 1);
        assert!(hunks[0].lines.iter().all(|l| l.origin == '+'));
        assert_eq!(hunks[0].lines.len(), 2);
    }

    #[test]
    fn test_build_hunks_identical_is_empty() {
        assert!(build_hunks("same\n", "same\n").is_empty());
    }

    #[test]
    fn test_file_ext() {
        assert_eq!(file_ext("src/main.rs"), "rs");
        assert_eq!(file_ext("Makefile"), "txt");
        assert_eq!(file_ext("a.b/c"), "txt");
    }

    #[test]
    fn test_render_commit_offsets() {
        let request = DiffRequest {
            key: DiffKey { original_index: 3, hash: "abc123".into() },
            message: "fix: thing\n\nbody".into(),
            repository: "org/repo".into(),
            modifications: vec![
                modification(Some("x\n"), Some("y\n")),
                modification(None, Some("new\n")),
            ],
        };
        let payload = render_commit(&request, &Theme::dark());
        assert_eq!(payload.key.original_index, 3);
        assert_eq!(payload.file_offsets.len(), 2);
        assert_eq!(payload.hunk_offsets.len(), 2);
        assert!(payload.file_offsets[0] < payload.hunk_offsets[0]);
        assert!(payload.hunk_offsets[0] < payload.file_offsets[1]);
        let first: String =
            payload.lines[0].spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(first, "commit abc123");
    }
}
