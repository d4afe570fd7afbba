//! Filter bar: one `[label ▾]` trigger per filter.

use crate::ui::helpers::position_cursor;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::FilterChip;
use unicode_width::UnicodeWidthStr;

/// Renders the filter triggers on one 1-indexed row. Returns the next row.
///
/// Each chip is drawn at its own `rect.x`, so the bar matches the layout the
/// page uses for pointer hit tests. Chips holding a selection use
/// `filter_active_fg`; the open one is bold with an up arrow.
pub fn render_filter_bar(out: &mut String, row: usize, chips: &[FilterChip], theme: &Theme, cols: usize) -> usize {
    position_cursor(out, row, 1);
    out.push_str(&" ".repeat(cols));

    for chip in chips {
        if chip.rect.x >= cols {
            break;
        }
        let arrow = if chip.open { '▴' } else { '▾' };
        let text = format!("[{} {arrow}]", chip.label);
        if chip.rect.x + text.width() > cols {
            break;
        }

        position_cursor(out, row, chip.rect.x + 1);
        if chip.open {
            out.push_str(Theme::bold());
        }
        let color = if chip.active {
            &theme.colors.filter_active_fg
        } else {
            &theme.colors.filter_fg
        };
        out.push_str(&Theme::fg(color));
        out.push_str(&text);
        out.push_str(Theme::reset());
    }
    row + 1
}
