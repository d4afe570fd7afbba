//! Token-based date formatting and parsing.

use crate::domain::{DeskError, Result};
use chrono::{Datelike, NaiveDate};
use regex::{NoExpand, Regex};
use std::sync::OnceLock;

/// Format used by list screens and the date-picker input.
pub const DISPLAY_FORMAT: &str = "DD.MM.YYYY";

/// Localized month names used by the `M_STR` and `M_SHORT` tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthNames {
    /// Full names, January first.
    pub full: [&'static str; 12],
    /// Abbreviated names, January first.
    pub short: [&'static str; 12],
}

impl MonthNames {
    /// Russian month names in the genitive case ("5 марта").
    #[must_use]
    pub const fn russian() -> Self {
        Self {
            full: [
                "января", "февраля", "марта", "апреля", "мая", "июня", "июля", "августа",
                "сентября", "октября", "ноября", "декабря",
            ],
            short: [
                "янв", "фев", "мар", "апр", "мая", "июн", "июл", "авг", "сен", "окт", "ноя", "дек",
            ],
        }
    }

    /// English month names.
    #[must_use]
    pub const fn english() -> Self {
        Self {
            full: [
                "January", "February", "March", "April", "May", "June", "July", "August",
                "September", "October", "November", "December",
            ],
            short: [
                "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
            ],
        }
    }
}

impl Default for MonthNames {
    fn default() -> Self {
        Self::russian()
    }
}

#[derive(Debug, Clone, Copy)]
enum Token {
    Year,
    Month,
    Day,
    MonthShort,
    MonthName,
}

/// Token patterns in substitution order.
///
/// Numeric tokens go first so that month names inserted later are never
/// scanned for tokens again.
fn token_patterns() -> &'static [(Regex, Token)] {
    static PATTERNS: OnceLock<Vec<(Regex, Token)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            ("(?i)YYYY", Token::Year),
            ("(?i)MM", Token::Month),
            ("(?i)DD", Token::Day),
            ("(?i)M_SHORT", Token::MonthShort),
            ("(?i)M_STR", Token::MonthName),
        ]
        .into_iter()
        .map(|(pattern, token)| {
            let regex = Regex::new(pattern).expect("date token patterns are valid regexes");
            (regex, token)
        })
        .collect()
    })
}

/// Formats a date using a token-based format string.
///
/// Supported tokens (matched case-insensitively, anywhere in the string):
///
/// | Token     | Output                      |
/// |-----------|-----------------------------|
/// | `YYYY`    | four-digit year             |
/// | `MM`      | two-digit month             |
/// | `DD`      | two-digit day of month      |
/// | `M_SHORT` | abbreviated month name      |
/// | `M_STR`   | full month name             |
///
/// Everything else is copied through unchanged.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use classdesk::dates::{format_date, MonthNames};
///
/// let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
/// assert_eq!(format_date(date, "DD.MM.YYYY", &MonthNames::russian()), "05.03.2024");
/// assert_eq!(format_date(date, "dd M_STR yyyy", &MonthNames::russian()), "05 марта 2024");
/// assert_eq!(format_date(date, "M_SHORT DD", &MonthNames::english()), "Mar 05");
/// ```
#[must_use]
pub fn format_date(date: NaiveDate, format: &str, names: &MonthNames) -> String {
    let month_index = date.month0() as usize;

    token_patterns()
        .iter()
        .fold(format.to_string(), |acc, (regex, token)| {
            let replacement = match token {
                Token::Year => format!("{:04}", date.year()),
                Token::Month => format!("{:02}", date.month()),
                Token::Day => format!("{:02}", date.day()),
                Token::MonthShort => names.short[month_index].to_string(),
                Token::MonthName => names.full[month_index].to_string(),
            };
            regex.replace_all(&acc, NoExpand(&replacement)).into_owned()
        })
}

/// Parses a date typed by the user.
///
/// Accepts [`DISPLAY_FORMAT`] (`DD.MM.YYYY`) and ISO `YYYY-MM-DD`, the shape
/// the API sends dates in.
///
/// # Errors
///
/// Returns [`DeskError::DateParse`] if the text matches neither format or
/// names a day that does not exist.
///
/// # Examples
///
/// ```
/// use classdesk::dates::parse_date;
///
/// let date = parse_date("29.02.2024")?;
/// assert_eq!(date.to_string(), "2024-02-29");
/// assert!(parse_date("30.02.2024").is_err());
/// # Ok::<(), classdesk::DeskError>(())
/// ```
pub fn parse_date(text: &str) -> Result<NaiveDate> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, "%d.%m.%Y")
        .or_else(|_| NaiveDate::parse_from_str(text, "%Y-%m-%d"))
        .map_err(|e| DeskError::DateParse(format!("`{text}`: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn display_format_round_trips() {
        let names = MonthNames::default();
        for d in [date(2024, 1, 1), date(1999, 12, 31), date(2024, 2, 29), date(1000, 7, 4)] {
            let text = format_date(d, DISPLAY_FORMAT, &names);
            assert_eq!(parse_date(&text).unwrap(), d, "round trip of {text}");
        }
    }

    #[test]
    fn tokens_are_order_independent() {
        let d = date(2023, 11, 9);
        let names = MonthNames::russian();
        assert_eq!(format_date(d, "YYYY/MM/DD", &names), "2023/11/09");
        assert_eq!(format_date(d, "mm-dd-yyyy", &names), "11-09-2023");
    }

    #[test]
    fn names_and_numbers_mix() {
        let d = date(2023, 12, 1);
        assert_eq!(format_date(d, "M_STR DD", &MonthNames::english()), "December 01");
        assert_eq!(format_date(d, "DD M_SHORT", &MonthNames::russian()), "01 дек");
    }

    #[test]
    fn iso_input_is_accepted() {
        assert_eq!(parse_date(" 2024-05-17 ").unwrap(), date(2024, 5, 17));
    }

    #[test]
    fn garbage_is_rejected() {
        let err = parse_date("tomorrow").unwrap_err();
        assert!(matches!(err, DeskError::DateParse(_)));
    }
}
