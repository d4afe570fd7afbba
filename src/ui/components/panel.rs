//! Open filter panel, drawn over the table.

use super::draw_box;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::PanelView;

/// Renders an open panel at its placed rect.
///
/// Line order inside the frame matches what pointer hit tests expect: the
/// search box (searchable controls only), the pinned row, then the options.
pub fn render_panel(out: &mut String, panel: &PanelView, theme: &Theme) {
    let normal = Theme::fg(&theme.colors.text_normal);
    let mut lines = Vec::with_capacity(panel.options.len() + 2);

    if let Some(search) = &panel.search {
        lines.push((normal.clone(), format!("⌕ {search}▏")));
    }
    if let Some(pinned) = &panel.pinned {
        let style = if pinned.clickable {
            Theme::fg(&theme.colors.filter_fg)
        } else {
            format!("{}{}", Theme::dim(), Theme::fg(&theme.colors.text_dim))
        };
        let marker = if pinned.clickable { "✕ " } else { "" };
        lines.push((style, format!("{marker}{}", pinned.label)));
    }
    for option in &panel.options {
        if option.selected {
            lines.push((Theme::fg(&theme.colors.filter_active_fg), format!("● {}", option.label)));
        } else {
            lines.push((normal.clone(), format!("○ {}", option.label)));
        }
    }

    draw_box(out, panel.rect, &theme.colors.panel_border, &lines);
}
