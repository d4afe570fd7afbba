//! Options shown by selection controls.

use serde::{Deserialize, Serialize};

/// A value offered by a [`SelectControl`](crate::select::SelectControl).
///
/// Options are either a plain display string, which is its own identity, or a
/// keyed pair where `key` is the identity and `value` the display label. The
/// untagged serde representation accepts both JSON shapes, so option lists and
/// stored selections can come straight from the API or the page URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SelectOption {
    /// A bare scalar, shown as-is.
    Plain(String),
    /// A keyed option with a separate display label.
    Keyed {
        /// Identity used for selection membership.
        key: String,
        /// Display label.
        value: String,
    },
}

impl SelectOption {
    /// Creates a plain option.
    pub fn plain(value: impl Into<String>) -> Self {
        Self::Plain(value.into())
    }

    /// Creates a keyed option.
    pub fn keyed(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Keyed {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Identity used for "is this selected" comparisons.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Plain(value) => value,
            Self::Keyed { key, .. } => key,
        }
    }

    /// Text shown to the user.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Plain(value) | Self::Keyed { value, .. } => value,
        }
    }

    /// Returns `true` if `other` refers to the same option.
    ///
    /// Two keyed options match on key alone. When either side is plain, the
    /// plain value is compared against the other side's key and display value,
    /// so a selection stored as a scalar still matches its keyed counterpart.
    ///
    /// # Examples
    ///
    /// ```
    /// use classdesk::domain::SelectOption;
    ///
    /// let keyed = SelectOption::keyed("42", "Grade 5");
    /// assert!(keyed.matches(&SelectOption::plain("42")));
    /// assert!(keyed.matches(&SelectOption::plain("Grade 5")));
    /// assert!(!keyed.matches(&SelectOption::plain("Grade 6")));
    /// assert!(!keyed.matches(&SelectOption::keyed("Grade 5", "42")));
    /// ```
    #[must_use]
    pub fn matches(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Keyed { key, .. }, Self::Keyed { key: theirs, .. }) => key == theirs,
            (Self::Plain(value), keyed) | (keyed, Self::Plain(value)) => {
                keyed.key() == value.as_str() || keyed.label() == value.as_str()
            }
        }
    }
}

impl From<&str> for SelectOption {
    fn from(value: &str) -> Self {
        Self::plain(value)
    }
}

impl std::fmt::Display for SelectOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn deserializes_both_shapes() {
        let options: Vec<SelectOption> =
            serde_json::from_str(r#"["Math", {"key": "7", "value": "Physics"}]"#).unwrap();
        assert_eq!(
            options,
            vec![SelectOption::plain("Math"), SelectOption::keyed("7", "Physics")]
        );
    }

    #[test]
    fn keyed_options_match_on_key_only() {
        let grade5 = SelectOption::keyed("1", "5");
        assert!(!grade5.matches(&SelectOption::keyed("5", "9")));
        assert!(grade5.matches(&SelectOption::keyed("1", "Fifth")));
        assert!(grade5.matches(&SelectOption::plain("5")));
        assert!(SelectOption::plain("1").matches(&grade5));
    }

    #[test]
    fn plain_option_is_its_own_key() {
        let option = SelectOption::plain("Math");
        assert_eq!(option.key(), "Math");
        assert_eq!(option.label(), "Math");
    }
}
