//! Row action menu.

use super::draw_box;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::MenuView;

/// Renders the open row menu, items numbered from 1 for keyboard picks.
pub fn render_menu(out: &mut String, menu: &MenuView, theme: &Theme) {
    let style = Theme::fg(&theme.colors.text_normal);
    let lines: Vec<(String, String)> = menu
        .items
        .iter()
        .enumerate()
        .map(|(index, label)| (style.clone(), format!("{} {label}", index + 1)))
        .collect();
    draw_box(out, menu.rect, &theme.colors.panel_border, &lines);
}
