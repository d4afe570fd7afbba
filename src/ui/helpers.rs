//! Shared rendering utilities.
//!
//! Every component writes into one frame buffer (`String`) through these
//! helpers. Widths are measured in terminal cells with `unicode-width`, so
//! Cyrillic names and box-drawing characters line up.
//!
//! # Example
//!
//! ```rust
//! use classdesk::ui::helpers::{fit, position_cursor};
//!
//! let mut out = String::new();
//! position_cursor(&mut out, 5, 1);
//! out.push_str(&fit("Петрова Анна", 8));
//! assert_eq!(out, "\u{1b}[5;1HПетрова…");
//! ```

use std::fmt::Write;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Marks text cut short by [`truncate`].
pub const ELLIPSIS: char = '…';

/// Moves the cursor to a 1-indexed row and column.
///
/// Uses ANSI escape sequence `\u{1b}[{row};{col}H`.
pub fn position_cursor(out: &mut String, row: usize, col: usize) {
    let _ = write!(out, "\u{1b}[{row};{col}H");
}

/// Cuts `text` to at most `width` cells, ending in [`ELLIPSIS`] when cut.
#[must_use]
pub fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let mut cut = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        cut.push(ch);
        used += w;
    }
    cut.push(ELLIPSIS);
    cut
}

/// Truncates or right-pads `text` to exactly `width` cells.
#[must_use]
pub fn fit(text: &str, width: usize) -> String {
    let mut fitted = truncate(text, width);
    let used = fitted.width();
    fitted.push_str(&" ".repeat(width.saturating_sub(used)));
    fitted
}

/// Centers `text` in `width` cells; the left side gets the smaller half.
#[must_use]
pub fn center(text: &str, width: usize) -> String {
    let text = truncate(text, width);
    let len = text.width();
    let padding = width.saturating_sub(len) / 2;
    format!("{}{text}{}", " ".repeat(padding), " ".repeat(width.saturating_sub(padding + len)))
}

/// Draws `line` at a 1-indexed row, padded to `cols`, between `style` and a
/// reset.
pub fn draw_line(out: &mut String, row: usize, style: &str, line: &str, cols: usize) {
    position_cursor(out, row, 1);
    out.push_str(style);
    out.push_str(&fit(line, cols));
    out.push_str(crate::ui::Theme::reset());
}

/// Removes ANSI escape sequences, leaving the visible text.
///
/// Handles the CSI sequences this crate emits (`ESC [ ... letter`).
#[must_use]
pub fn strip_ansi(text: &str) -> String {
    let mut plain = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch == '\u{1b}' {
            if chars.next() == Some('[') {
                for c in chars.by_ref() {
                    if c.is_ascii_alphabetic() {
                        break;
                    }
                }
            }
        } else {
            plain.push(ch);
        }
    }
    plain
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn truncate_counts_cells() {
        assert_eq!(truncate("Math", 10), "Math");
        assert_eq!(truncate("Mathematics", 5), "Math…");
        assert_eq!(truncate("日本語", 4), "日…");
        assert_eq!(truncate("abc", 0), "");
    }

    #[test]
    fn fit_and_center_fill_width() {
        assert_eq!(fit("ab", 4), "ab  ");
        assert_eq!(center("ab", 5), " ab  ");
        assert_eq!(center("abcdef", 3), "ab…");
    }

    #[test]
    fn strip_ansi_keeps_text() {
        let mut out = String::new();
        position_cursor(&mut out, 2, 1);
        out.push_str("\u{1b}[38;2;1;2;3mhi\u{1b}[0m");
        assert_eq!(strip_ansi(&out), "hi");
    }
}
