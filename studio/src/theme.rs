//! Color themes for studio.
//!
//! Two built-ins: `dark` (ANSI 16 colors, safe on any terminal) and
//! `catppuccin-mocha` (RGB, needs truecolor).

use ratatui::style::Color;

/// Every color the UI draws with.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Border of the panel that has keyboard focus.
    pub border_active: Color,
    pub border_inactive: Color,

    pub diff_added: Color,
    pub diff_removed: Color,
    pub diff_context: Color,
    pub diff_hunk_header: Color,
    /// Per-file header line inside the commit panel.
    pub diff_file_header: Color,
    pub commit_message: Color,
    pub commit_meta: Color,

    /// Marker color for labeled items in the item list.
    pub item_done: Color,
    /// Marker color for unlabeled items.
    pub item_todo: Color,
    /// Row highlight for the committed cursor.
    pub item_current: Color,
    /// Row highlight for a staged preview target.
    pub item_preview: Color,
    pub label_text: Color,

    pub status_bar_bg: Color,
    pub status_bar_fg: Color,
    pub status_mode: Color,
    pub status_ok: Color,
    pub status_error: Color,
    pub progress_fill: Color,
}

impl Theme {
    /// ANSI-16 dark theme, the fallback for unknown names.
    pub fn dark() -> Self {
        Self {
            border_active: Color::Cyan,
            border_inactive: Color::DarkGray,

            diff_added: Color::Green,
            diff_removed: Color::Red,
            diff_context: Color::Reset,
            diff_hunk_header: Color::Cyan,
            diff_file_header: Color::Yellow,
            commit_message: Color::White,
            commit_meta: Color::DarkGray,

            item_done: Color::Green,
            item_todo: Color::Red,
            item_current: Color::Cyan,
            item_preview: Color::Yellow,
            label_text: Color::Blue,

            status_bar_bg: Color::DarkGray,
            status_bar_fg: Color::White,
            status_mode: Color::Cyan,
            status_ok: Color::Green,
            status_error: Color::Red,
            progress_fill: Color::Green,
        }
    }

    /// Catppuccin Mocha palette (<https://github.com/catppuccin/catppuccin>).
    pub fn catppuccin_mocha() -> Self {
        let green = Color::Rgb(166, 227, 161);    // #a6e3a1
        let red = Color::Rgb(243, 139, 168);      // #f38ba8
        let yellow = Color::Rgb(249, 226, 175);   // #f9e2af
        let blue = Color::Rgb(137, 180, 250);     // #89b4fa
        let teal = Color::Rgb(148, 226, 213);     // #94e2d5
        let lavender = Color::Rgb(180, 190, 254); // #b4befe
        let overlay1 = Color::Rgb(127, 132, 156); // #7f849c
        let surface1 = Color::Rgb(69, 71, 90);    // #45475a
        let text = Color::Rgb(205, 214, 244);     // #cdd6f4
        let peach = Color::Rgb(250, 179, 135);    // #fab387

        Self {
            border_active: lavender,
            border_inactive: overlay1,

            diff_added: green,
            diff_removed: red,
            diff_context: text,
            diff_hunk_header: teal,
            diff_file_header: peach,
            commit_message: text,
            commit_meta: overlay1,

            item_done: green,
            item_todo: red,
            item_current: lavender,
            item_preview: yellow,
            label_text: blue,

            status_bar_bg: surface1,
            status_bar_fg: text,
            status_mode: lavender,
            status_ok: green,
            status_error: red,
            progress_fill: green,
        }
    }

    /// Resolves a configured theme name. Unknown names fall back to `dark()`
    /// with a warning so a typo never prevents startup.
    pub fn from_name(name: &str) -> Self {
        match name {
            "catppuccin-mocha" | "catppuccin_mocha" => Self::catppuccin_mocha(),
            "dark" => Self::dark(),
            other => {
                tracing::warn!(theme = other, "unknown theme, falling back to 'dark'");
                Self::dark()
            }
        }
    }
}
