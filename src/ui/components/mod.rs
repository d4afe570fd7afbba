//! Composable UI component renderers.
//!
//! Each component is responsible for one part of the page and writes ANSI
//! output into a shared frame buffer, returning the next free row where that
//! makes sense.
//!
//! # Components
//!
//! - [`header`]: Title bar with record count
//! - [`filters`]: Filter trigger buttons
//! - [`search`]: One-line search box
//! - [`table`]: Column headers, data rows with menu buttons, skeleton rows
//! - [`empty`]: Message shown instead of an empty table body
//! - [`footer`]: Keybinding hints or the last API error
//! - [`panel`]: Open filter panel (overlay)
//! - [`menu`]: Row action menu (overlay)
//! - [`calendar`]: Month grid, printed inline by the CLI
//!
//! # Layout
//!
//! [`render_page`] places components on the rows the page state uses for
//! hit testing:
//!
//! ```text
//! [Header]
//! [Filter triggers]
//! [Search box]
//! [Table headers]
//! [Table rows | skeleton rows | empty state]
//! [Blank padding to fill screen]
//! [Footer]
//! ```
//!
//! Overlays are drawn last, over whatever lies beneath them.

pub mod calendar;
pub mod empty;
pub mod filters;
pub mod footer;
pub mod header;
pub mod menu;
pub mod panel;
pub mod search;
pub mod table;

pub use calendar::render_calendar;

use crate::app::state::{FILTER_ROW, FIRST_DATA_ROW, HEADER_ROW, SEARCH_ROW, TABLE_HEADER_ROW};
use crate::popup::Rect;
use crate::ui::helpers::{draw_line, fit, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::UIViewModel;

/// Draws a framed box over `rect`, one `(style, text)` pair per inner line.
///
/// Lines beyond the box height are dropped; missing lines are left blank.
fn draw_box(out: &mut String, rect: Rect, border_color: &str, lines: &[(String, String)]) {
    if rect.width < 2 || rect.height < 2 {
        return;
    }
    let inner = rect.width - 2;
    let border = Theme::fg(border_color);

    position_cursor(out, rect.y + 1, rect.x + 1);
    out.push_str(&border);
    out.push_str(&format!("┌{}┐", "─".repeat(inner)));
    out.push_str(Theme::reset());

    for line in 0..rect.height - 2 {
        position_cursor(out, rect.y + line + 2, rect.x + 1);
        out.push_str(&border);
        out.push('│');
        out.push_str(Theme::reset());
        match lines.get(line) {
            Some((style, text)) => {
                out.push_str(style);
                out.push_str(&fit(text, inner));
                out.push_str(Theme::reset());
            }
            None => out.push_str(&" ".repeat(inner)),
        }
        out.push_str(&border);
        out.push('│');
        out.push_str(Theme::reset());
    }

    position_cursor(out, rect.bottom(), rect.x + 1);
    out.push_str(&border);
    out.push_str(&format!("└{}┘", "─".repeat(inner)));
    out.push_str(Theme::reset());
}

/// Renders a full page frame of `rows` x `cols` cells.
pub fn render_page(out: &mut String, vm: &UIViewModel, theme: &Theme, rows: usize, cols: usize) {
    let footer_row = rows.max(FIRST_DATA_ROW + 1);
    let body_rows = footer_row.saturating_sub(FIRST_DATA_ROW + 1);

    header::render_header(out, HEADER_ROW + 1, &vm.header, theme, cols);
    filters::render_filter_bar(out, FILTER_ROW + 1, &vm.filters, theme, cols);
    search::render_search_bar(out, SEARCH_ROW + 1, &vm.search_bar, theme, cols);
    table::render_table_headers(out, TABLE_HEADER_ROW + 1, &vm.table, theme, cols);

    let first_body_row = FIRST_DATA_ROW + 1;
    let mut next_row =
        table::render_table_body(out, first_body_row, &vm.table, vm.selected_index, theme, cols, body_rows);
    if let Some(empty) = &vm.empty_state {
        empty::render_empty_state(out, first_body_row, empty, theme, cols);
        next_row = next_row.max(first_body_row + 3);
    }
    for row in next_row..footer_row {
        draw_line(out, row, "", "", cols);
    }

    footer::render_footer(out, footer_row, &vm.footer, vm.error.as_deref(), theme, cols);

    if let Some(panel_view) = &vm.panel {
        panel::render_panel(out, panel_view, theme);
    }
    if let Some(menu_view) = &vm.row_menu {
        menu::render_menu(out, menu_view, theme);
    }
}
