//! Header component renderer.
//!
//! Renders the page title bar with centered text, theme-aware colors, and
//! optional background styling.

use crate::ui::helpers::{center, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::HeaderInfo;

/// Renders the header title bar at a 1-indexed row.
///
/// Displays the title centered horizontally with bold styling and theme
/// colors, padded to fill the entire terminal width. Returns the next row.
///
/// # Layout
///
/// ```text
/// [left padding] TITLE [right padding]
/// ```
///
/// If the width cannot be split evenly, the right padding is one cell
/// larger.
pub fn render_header(out: &mut String, row: usize, header: &HeaderInfo, theme: &Theme, cols: usize) -> usize {
    position_cursor(out, row, 1);
    out.push_str(Theme::bold());
    out.push_str(&Theme::fg(&theme.colors.header_fg));
    if let Some(bg) = &theme.colors.header_bg {
        out.push_str(&Theme::bg(bg));
    }
    out.push_str(&center(&header.title, cols));
    out.push_str(Theme::reset());
    row + 1
}
