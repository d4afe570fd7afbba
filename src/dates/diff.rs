//! Month/year differences and Russian count words.

use chrono::{Datelike, NaiveDate};

/// Whole years and remaining months between two dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateDiff {
    /// Whole years elapsed.
    pub years: u32,
    /// Whole months elapsed on top of `years` (0..12).
    pub months: u32,
}

impl DateDiff {
    /// Total elapsed months.
    #[must_use]
    pub const fn total_months(self) -> u32 {
        self.years * 12 + self.months
    }
}

/// Computes the whole months and years elapsed from `from` to `to`.
///
/// A month only counts once `to` has reached `from`'s day of month, so
/// 15 Jan → 14 Feb is zero months and 15 Jan → 15 Feb is one. Spans where
/// `to` precedes `from` clamp to zero.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use classdesk::dates::{months_between, DateDiff};
///
/// let enrolled = NaiveDate::from_ymd_opt(2021, 9, 1).unwrap();
/// let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
/// assert_eq!(months_between(enrolled, today), DateDiff { years: 2, months: 6 });
/// ```
#[must_use]
pub fn months_between(from: NaiveDate, to: NaiveDate) -> DateDiff {
    let mut total = i64::from(to.year() - from.year()) * 12
        + i64::from(to.month()) - i64::from(from.month());
    if to.day() < from.day() {
        total -= 1;
    }
    let total = u32::try_from(total.max(0)).unwrap_or(u32::MAX);

    DateDiff {
        years: total / 12,
        months: total % 12,
    }
}

/// Picks the Russian word form that agrees with a count.
///
/// - `n % 100` in `11..=14` always takes the "many" form
/// - otherwise a last digit of 1 takes `one`, 2 to 4 take `few`
/// - everything else takes `many`
///
/// # Examples
///
/// ```
/// use classdesk::dates::russian_plural;
///
/// assert_eq!(russian_plural(1, "год", "года", "лет"), "год");
/// assert_eq!(russian_plural(3, "год", "года", "лет"), "года");
/// assert_eq!(russian_plural(11, "год", "года", "лет"), "лет");
/// assert_eq!(russian_plural(21, "год", "года", "лет"), "год");
/// ```
#[must_use]
pub fn russian_plural<'a>(n: u64, one: &'a str, few: &'a str, many: &'a str) -> &'a str {
    if (11..=14).contains(&(n % 100)) {
        return many;
    }
    match n % 10 {
        1 => one,
        2..=4 => few,
        _ => many,
    }
}

/// Formats a person's age in years, e.g. `"16 лет"`.
#[must_use]
pub fn age_label(birth: NaiveDate, today: NaiveDate) -> String {
    let years = months_between(birth, today).years;
    format!("{years} {}", russian_plural(u64::from(years), "год", "года", "лет"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn day_of_month_must_be_reached() {
        assert_eq!(months_between(date(2024, 1, 15), date(2024, 2, 14)).total_months(), 0);
        assert_eq!(months_between(date(2024, 1, 15), date(2024, 2, 15)).total_months(), 1);
        assert_eq!(
            months_between(date(2020, 5, 31), date(2024, 5, 30)),
            DateDiff { years: 3, months: 11 }
        );
    }

    #[test]
    fn reversed_span_clamps_to_zero() {
        assert_eq!(months_between(date(2024, 5, 1), date(2023, 5, 1)), DateDiff::default());
    }

    #[test]
    fn plural_forms() {
        let forms = |n| russian_plural(n, "год", "года", "лет");
        assert_eq!(forms(1), "год");
        assert_eq!(forms(2), "года");
        assert_eq!(forms(4), "года");
        assert_eq!(forms(5), "лет");
        assert_eq!(forms(0), "лет");
        assert_eq!(forms(11), "лет");
        assert_eq!(forms(12), "лет");
        assert_eq!(forms(14), "лет");
        assert_eq!(forms(21), "год");
        assert_eq!(forms(22), "года");
        assert_eq!(forms(111), "лет");
        assert_eq!(forms(101), "год");
    }

    #[test]
    fn age_label_uses_agreeing_word() {
        assert_eq!(age_label(date(2008, 3, 10), date(2024, 3, 10)), "16 лет");
        assert_eq!(age_label(date(2003, 1, 1), date(2024, 6, 1)), "21 год");
        assert_eq!(age_label(date(2021, 1, 1), date(2024, 6, 1)), "3 года");
    }
}
