//! Month grid for the schedule calendar.
//!
//! Unlike the page components this one produces plain lines (no cursor
//! positioning) so the CLI can print a calendar inline.

use crate::dates::Week;
use crate::ui::theme::Theme;
use chrono::{Datelike, NaiveDate};

/// Monday-first weekday captions.
pub const WEEKDAYS: [&str; 7] = ["Пн", "Вт", "Ср", "Чт", "Пт", "Сб", "Вс"];

/// Cells per day: two digits and a gap.
const CELL_WIDTH: usize = 3;

/// Renders a titled month grid, one line per week.
///
/// Padding days from neighbouring months are dimmed; `today` is drawn with
/// the selection colors when it falls inside the grid.
#[must_use]
pub fn render_calendar(title: &str, weeks: &[Week], today: Option<NaiveDate>, theme: &Theme) -> String {
    let width = CELL_WIDTH * WEEKDAYS.len();
    let mut lines = Vec::with_capacity(weeks.len() + 2);

    lines.push(format!(
        "{}{}{:^width$}{}",
        Theme::bold(),
        Theme::fg(&theme.colors.header_fg),
        title,
        Theme::reset()
    ));
    lines.push(format!(
        "{}{}{}",
        Theme::fg(&theme.colors.text_dim),
        WEEKDAYS.map(|day| format!("{day} ")).concat(),
        Theme::reset()
    ));

    for week in weeks {
        let mut line = String::new();
        for day in week {
            let number = format!("{:>2}", day.date.day());
            if Some(day.date) == today {
                line.push_str(&Theme::fg(&theme.colors.selection_fg));
                line.push_str(&Theme::bg(&theme.colors.selection_bg));
            } else if day.current {
                line.push_str(&Theme::fg(&theme.colors.text_normal));
            } else {
                line.push_str(Theme::dim());
                line.push_str(&Theme::fg(&theme.colors.text_dim));
            }
            line.push_str(&number);
            line.push_str(Theme::reset());
            line.push(' ');
        }
        lines.push(line);
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::month_matrix;
    use crate::ui::helpers::strip_ansi;
    use chrono::Month;
    use pretty_assertions::assert_eq;

    #[test]
    fn march_2024_grid() {
        let weeks = month_matrix(2024, Month::March).unwrap();
        let text = strip_ansi(&render_calendar("Март 2024", &weeks, None, &Theme::default()));
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 2 + weeks.len());
        assert_eq!(lines[1], "Пн Вт Ср Чт Пт Сб Вс ");
        // 1 March 2024 is a Friday; the row starts on Monday 26 February.
        assert_eq!(lines[2], "26 27 28 29  1  2  3 ");
        assert!(lines.last().unwrap().starts_with("25 26 27 28 29 30 31"));
    }

    #[test]
    fn today_is_highlighted() {
        let theme = Theme::default();
        let weeks = month_matrix(2024, Month::March).unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 3, 8);
        let text = render_calendar("Март", &weeks, today, &theme);
        assert!(text.contains(&format!("{} 8", Theme::bg(&theme.colors.selection_bg))));
    }
}
