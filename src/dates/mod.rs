//! Calendar and date helpers.
//!
//! Pure, stateless functions used by the schedule calendar, list screens and
//! student cards:
//!
//! - [`format`]: token-based formatting (`DD.MM.YYYY`, `M_STR`) and parsing
//! - [`matrix`]: Monday-first week grids for a month
//! - [`diff`]: month/year differences and Russian count words

pub mod diff;
pub mod format;
pub mod matrix;

pub use diff::{age_label, months_between, russian_plural, DateDiff};
pub use format::{format_date, parse_date, MonthNames, DISPLAY_FORMAT};
pub use matrix::{month_matrix, CalendarDay, Week, DAYS_PER_WEEK};
