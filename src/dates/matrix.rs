//! Week-aligned month grids for the schedule calendar.

use crate::domain::{DeskError, Result};
use chrono::{Datelike, Days, Month, NaiveDate};

/// Days per calendar row.
pub const DAYS_PER_WEEK: usize = 7;

/// One cell of a month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarDay {
    /// The calendar date shown in the cell.
    pub date: NaiveDate,
    /// `true` if the date belongs to the requested month, `false` for the
    /// padding days borrowed from the previous or next month.
    pub current: bool,
}

/// A calendar row, Monday first.
pub type Week = [CalendarDay; DAYS_PER_WEEK];

/// Builds the Monday-first week grid for a month.
///
/// The first row starts on the Monday on or before the 1st and the last row
/// ends on the Sunday on or after the last day, so every row has exactly seven
/// cells and the padding cells carry `current: false`.
///
/// # Errors
///
/// Returns [`DeskError::DateParse`] if the year is outside chrono's range.
///
/// # Examples
///
/// ```
/// use chrono::Month;
/// use classdesk::dates::month_matrix;
///
/// let weeks = month_matrix(2024, Month::February)?;
/// let current = weeks.iter().flatten().filter(|d| d.current).count();
/// assert_eq!(current, 29);
/// assert_eq!(weeks.len(), 5);
/// # Ok::<(), classdesk::DeskError>(())
/// ```
pub fn month_matrix(year: i32, month: Month) -> Result<Vec<Week>> {
    let first = NaiveDate::from_ymd_opt(year, month.number_from_month(), 1)
        .ok_or_else(|| DeskError::DateParse(format!("{year}-{month:?} is out of range")))?;
    let lead = first.weekday().num_days_from_monday() as usize;
    let days_in_month = days_in_month(first);
    let weeks = (lead + days_in_month).div_ceil(DAYS_PER_WEEK);

    let start = first
        .checked_sub_days(Days::new(lead as u64))
        .ok_or_else(|| DeskError::DateParse(format!("{first} has no preceding week")))?;

    let mut days = start.iter_days().map(|date| CalendarDay {
        date,
        current: date.year() == first.year() && date.month() == first.month(),
    });

    let mut grid = Vec::with_capacity(weeks);
    for _ in 0..weeks {
        let row: Vec<CalendarDay> = days.by_ref().take(DAYS_PER_WEEK).collect();
        let row: Week = row
            .try_into()
            .map_err(|_| DeskError::DateParse(format!("{first} runs past the calendar end")))?;
        grid.push(row);
    }

    tracing::trace!(%first, weeks, "month matrix built");
    Ok(grid)
}

/// Number of days in the month containing `first`.
fn days_in_month(first: NaiveDate) -> usize {
    let next = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
    };
    next.and_then(|n| n.pred_opt()).map_or(31, |last| last.day() as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn leap_february_is_padded_to_full_weeks() {
        let weeks = month_matrix(2024, Month::February).unwrap();
        let cells: Vec<&CalendarDay> = weeks.iter().flatten().collect();

        assert_eq!(cells.iter().filter(|d| d.current).count(), 29);
        assert_eq!(cells.len() % DAYS_PER_WEEK, 0);
        // 2024-02-01 is a Thursday.
        assert_eq!(weeks[0][0].date, NaiveDate::from_ymd_opt(2024, 1, 29).unwrap());
        assert!(!weeks[0][2].current);
        assert!(weeks[0][3].current);
        assert_eq!(weeks[4][6].date, NaiveDate::from_ymd_opt(2024, 3, 3).unwrap());
        assert!(!weeks[4][6].current);
    }

    #[test]
    fn month_starting_on_monday_has_no_leading_padding() {
        // 2024-04-01 is a Monday.
        let weeks = month_matrix(2024, Month::April).unwrap();
        assert!(weeks[0][0].current);
        assert_eq!(weeks[0][0].date.day(), 1);
        assert_eq!(weeks.iter().flatten().filter(|d| d.current).count(), 30);
    }

    #[test]
    fn december_wraps_into_next_year() {
        let weeks = month_matrix(2023, Month::December).unwrap();
        let last = weeks.last().unwrap()[6];
        assert_eq!(last.date, NaiveDate::from_ymd_opt(2024, 1, 7).unwrap());
        assert!(!last.current);
    }

    #[test]
    fn every_row_starts_on_monday() {
        for month in [Month::January, Month::June, Month::September] {
            for week in month_matrix(2025, month).unwrap() {
                assert_eq!(week[0].date.weekday(), chrono::Weekday::Mon);
            }
        }
    }
}
