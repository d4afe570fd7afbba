//! Footer component renderer.
//!
//! This module renders the footer help bar with centered keybinding hints, or
//! the last API error in its place.

use crate::ui::helpers::{center, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::FooterInfo;

/// Renders the footer help bar at a 1-indexed row.
///
/// Displays keybinding hints centered horizontally with dimmed styling,
/// padded to the full terminal width and truncated on narrow terminals. When
/// `error` is set it replaces the hints, drawn in `error_fg`.
///
/// Returns the next available row position.
pub fn render_footer(
    out: &mut String,
    row: usize,
    footer: &FooterInfo,
    error: Option<&str>,
    theme: &Theme,
    cols: usize,
) -> usize {
    position_cursor(out, row, 1);
    match error {
        Some(message) => {
            out.push_str(&Theme::fg(&theme.colors.error_fg));
            out.push_str(&center(&format!("! {message}"), cols));
        }
        None => {
            out.push_str(&Theme::fg(&theme.colors.text_dim));
            out.push_str(&center(&footer.keybindings, cols));
        }
    }
    out.push_str(Theme::reset());
    row + 1
}
