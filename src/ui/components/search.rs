//! Search bar component renderer.

use crate::ui::helpers::{fit, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::SearchBarInfo;

/// Left margin before the search prompt.
const SEARCH_MARGIN: usize = 1;

/// Renders the one-line search box at a 1-indexed row. Returns the next row.
///
/// ```text
///  / math▏ …
/// ```
///
/// The prompt uses `search_bar_border` while focused and `text_dim`
/// otherwise. A cursor bar follows the query while focused; the trailing
/// `…` marks input that has not been applied yet.
pub fn render_search_bar(out: &mut String, row: usize, search: &SearchBarInfo, theme: &Theme, cols: usize) -> usize {
    let prompt_color = if search.focused {
        &theme.colors.search_bar_border
    } else {
        &theme.colors.text_dim
    };

    let mut text = search.query.clone();
    if search.focused {
        text.push('▏');
    }
    if search.pending {
        text.push_str(" …");
    }
    if search.query.is_empty() && !search.focused {
        text = "search".to_string();
    }

    position_cursor(out, row, 1);
    out.push_str(&" ".repeat(SEARCH_MARGIN));
    out.push_str(&Theme::fg(prompt_color));
    out.push_str("/ ");
    if search.query.is_empty() && !search.focused {
        out.push_str(Theme::dim());
    } else {
        out.push_str(&Theme::fg(&theme.colors.text_normal));
    }
    out.push_str(&fit(&text, cols.saturating_sub(SEARCH_MARGIN + 2)));
    out.push_str(Theme::reset());
    row + 1
}
