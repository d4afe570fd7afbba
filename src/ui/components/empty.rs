//! Empty state component renderer.
//!
//! This module renders the message shown in place of the table body when no
//! records are available.

use crate::ui::helpers::{center, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::EmptyState;

/// Renders the empty state message starting at a 1-indexed row.
///
/// Displays a centered two-line message. Typically shown when:
/// - The API returned no records for the active filters
/// - The search query matches nothing
/// - The last fetch failed
///
/// # Layout
///
/// ```text
/// [blank line]
/// [left padding] MESSAGE [right padding]
/// [left padding] subtitle [right padding]
/// ```
///
/// The message uses the `empty_state_fg` theme color, and the subtitle uses
/// `text_dim` with dim styling.
pub fn render_empty_state(out: &mut String, row: usize, empty: &EmptyState, theme: &Theme, cols: usize) {
    position_cursor(out, row + 1, 1);
    out.push_str(&Theme::fg(&theme.colors.empty_state_fg));
    out.push_str(&center(&empty.message, cols));
    out.push_str(Theme::reset());

    position_cursor(out, row + 2, 1);
    out.push_str(Theme::dim());
    out.push_str(&Theme::fg(&theme.colors.text_dim));
    out.push_str(&center(&empty.subtitle, cols));
    out.push_str(Theme::reset());
}
