//! Table component renderer.
//!
//! Renders a [`TableView`] as evenly sized columns. The last
//! [`MENU_BUTTON_WIDTH`] cells of every data row hold the `⋯` button that
//! opens the row's action menu; loading tables show shaded skeleton bars
//! instead of data.

use crate::app::state::MENU_BUTTON_WIDTH;
use crate::table::{SkeletonRow, TableBody, TableRow, TableView, SKELETON_STAGGER_MS};
use crate::ui::helpers::{fit, position_cursor};
use crate::ui::theme::Theme;

/// Widths of `count` columns sharing `cols` cells minus the menu button.
///
/// The first columns absorb the remainder.
#[must_use]
pub fn column_widths(count: usize, cols: usize) -> Vec<usize> {
    if count == 0 {
        return Vec::new();
    }
    let content = cols.saturating_sub(MENU_BUTTON_WIDTH);
    let base = content / count;
    let extra = content % count;
    (0..count).map(|i| base + usize::from(i < extra)).collect()
}

/// Text of one cell, leaving a one-cell gap before the next column.
fn cell_text(text: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    format!("{} ", fit(text, width - 1))
}

/// Renders the column headers at a 1-indexed row. Returns the next row.
pub fn render_table_headers(out: &mut String, row: usize, table: &TableView, theme: &Theme, cols: usize) -> usize {
    position_cursor(out, row, 1);
    out.push_str(Theme::bold());
    out.push_str(&Theme::fg(&theme.colors.header_fg));
    let widths = column_widths(table.column_count(), cols);
    let mut used = 0;
    for (header, width) in table.headers.iter().zip(&widths) {
        out.push_str(&cell_text(&header.to_uppercase(), *width));
        used += width;
    }
    out.push_str(&" ".repeat(cols.saturating_sub(used)));
    out.push_str(Theme::reset());
    row + 1
}

/// Renders the table body from a 1-indexed row, at most `max_rows` lines.
///
/// `selected` indexes the rows of `table`. Returns the next free row.
pub fn render_table_body(
    out: &mut String,
    row: usize,
    table: &TableView,
    selected: Option<usize>,
    theme: &Theme,
    cols: usize,
    max_rows: usize,
) -> usize {
    let widths = column_widths(table.column_count(), cols);
    let mut current_row = row;
    match &table.body {
        TableBody::Rows(rows) => {
            for (index, data) in rows.iter().take(max_rows).enumerate() {
                current_row = render_table_row(out, current_row, data, selected == Some(index), &widths, theme, cols);
            }
        }
        TableBody::Skeleton(rows) => {
            for skeleton in rows.iter().take(max_rows) {
                current_row = render_skeleton_row(out, current_row, skeleton, &widths, theme, cols);
            }
        }
    }
    current_row
}

/// Renders one data row.
///
/// # Styling Precedence
///
/// 1. Selection colors (whole row, if selected)
/// 2. Theme color of the cell's class
/// 3. Normal text color
fn render_table_row(
    out: &mut String,
    row: usize,
    data: &TableRow,
    is_selected: bool,
    widths: &[usize],
    theme: &Theme,
    cols: usize,
) -> usize {
    position_cursor(out, row, 1);
    let base = if is_selected {
        format!("{}{}", Theme::fg(&theme.colors.selection_fg), Theme::bg(&theme.colors.selection_bg))
    } else {
        Theme::fg(&theme.colors.text_normal)
    };
    out.push_str(&base);

    let mut used = 0;
    for (cell, width) in data.cells.iter().zip(widths) {
        let class_color = cell
            .class
            .as_deref()
            .filter(|_| !is_selected)
            .and_then(|class| theme.class_color(class));
        match class_color {
            Some(color) => {
                out.push_str(&Theme::fg(color));
                out.push_str(&cell_text(&cell.text, *width));
                out.push_str(&base);
            }
            None => out.push_str(&cell_text(&cell.text, *width)),
        }
        used += width;
    }

    let button_width = MENU_BUTTON_WIDTH.min(cols);
    out.push_str(&" ".repeat(cols.saturating_sub(used + button_width)));
    if !is_selected {
        out.push_str(&Theme::fg(&theme.colors.text_dim));
    }
    out.push_str(&fit(" ⋯", button_width));
    out.push_str(Theme::reset());
    row + 1
}

/// Renders a loading placeholder; consecutive rows alternate shading by
/// their animation offset.
fn render_skeleton_row(
    out: &mut String,
    row: usize,
    skeleton: &SkeletonRow,
    widths: &[usize],
    theme: &Theme,
    cols: usize,
) -> usize {
    let shade = if (skeleton.animation_delay_ms / SKELETON_STAGGER_MS) % 2 == 0 {
        '░'
    } else {
        '▒'
    };

    position_cursor(out, row, 1);
    out.push_str(&Theme::fg(&theme.colors.skeleton_fg));
    let mut used = 0;
    for width in widths {
        let bar: String = std::iter::repeat(shade).take(width.saturating_sub(1) * 2 / 3).collect();
        out.push_str(&cell_text(&bar, *width));
        used += width;
    }
    out.push_str(&" ".repeat(cols.saturating_sub(used)));
    out.push_str(Theme::reset());
    row + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Cell;
    use crate::ui::helpers::strip_ansi;
    use pretty_assertions::assert_eq;

    fn table() -> TableView {
        TableView {
            headers: vec!["Name".into(), "Debt".into()],
            body: TableBody::Rows(vec![TableRow {
                row_key: "1".into(),
                cells: vec![
                    Cell::plain("Anna"),
                    Cell {
                        text: "1200".into(),
                        class: Some("debt".into()),
                    },
                ],
            }]),
        }
    }

    #[test]
    fn columns_share_width_evenly() {
        assert_eq!(column_widths(3, 23), vec![7, 7, 6]);
        assert!(column_widths(0, 80).is_empty());
        assert_eq!(column_widths(2, 2), vec![0, 0]);
    }

    #[test]
    fn class_color_applies_to_unselected_cells() {
        let theme = Theme::default();
        let debt = Theme::fg(theme.class_color("debt").unwrap());

        let mut out = String::new();
        render_table_body(&mut out, 5, &table(), None, &theme, 23, 10);
        assert!(out.contains(&format!("{debt}1200")));
        let plain = strip_ansi(&out);
        assert!(plain.starts_with(&format!("{:<10}{:<10}", "Anna", "1200")));
        assert!(plain.ends_with("⋯ "));

        let mut selected = String::new();
        render_table_body(&mut selected, 5, &table(), Some(0), &theme, 23, 10);
        assert!(!selected.contains(&debt));
    }

    #[test]
    fn skeleton_rows_alternate_shading() {
        let view = TableView {
            headers: vec!["Name".into()],
            body: TableBody::Skeleton(vec![
                SkeletonRow { index: 0, animation_delay_ms: 0 },
                SkeletonRow { index: 1, animation_delay_ms: SKELETON_STAGGER_MS },
            ]),
        };
        let mut out = String::new();
        let next = render_table_body(&mut out, 5, &view, None, &Theme::default(), 13, 10);
        assert_eq!(next, 7);
        let plain = strip_ansi(&out);
        assert!(plain.contains('░'));
        assert!(plain.contains('▒'));
    }
}
