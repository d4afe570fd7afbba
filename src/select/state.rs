//! Selection state for single and multiple choice controls.

use crate::domain::{DeskError, Result, SelectOption};
use serde_json::Value;

/// Whether a control holds one choice or many.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    Single,
    Multiple,
}

/// The choices currently held by a control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionState {
    /// At most one option.
    Single(Option<SelectOption>),
    /// Options in the order they were picked, never two with the same key.
    Multiple(Vec<SelectOption>),
}

impl SelectionState {
    /// Creates an empty selection for a mode.
    #[must_use]
    pub const fn empty(mode: SelectionMode) -> Self {
        match mode {
            SelectionMode::Single => Self::Single(None),
            SelectionMode::Multiple => Self::Multiple(Vec::new()),
        }
    }

    #[must_use]
    pub const fn mode(&self) -> SelectionMode {
        match self {
            Self::Single(_) => SelectionMode::Single,
            Self::Multiple(_) => SelectionMode::Multiple,
        }
    }

    /// Applies a user pick.
    ///
    /// Single mode replaces the current choice. Multiple mode toggles: an
    /// option already held is removed, any other option is appended.
    ///
    /// # Examples
    ///
    /// ```
    /// use classdesk::domain::SelectOption;
    /// use classdesk::select::{SelectionMode, SelectionState};
    ///
    /// let mut days = SelectionState::empty(SelectionMode::Multiple);
    /// days.select(SelectOption::plain("Mon"));
    /// days.select(SelectOption::plain("Wed"));
    /// days.select(SelectOption::plain("Mon"));
    /// assert_eq!(days.labels(), vec!["Wed"]);
    /// ```
    pub fn select(&mut self, option: SelectOption) {
        match self {
            Self::Single(current) => *current = Some(option),
            Self::Multiple(items) => {
                if items.iter().any(|held| held.matches(&option)) {
                    items.retain(|held| !held.matches(&option));
                } else {
                    items.push(option);
                }
            }
        }
    }

    /// Returns `true` if `option` is currently held.
    ///
    /// Compares against both key and display value, see
    /// [`SelectOption::matches`].
    #[must_use]
    pub fn is_selected(&self, option: &SelectOption) -> bool {
        self.options().any(|held| held.matches(option))
    }

    /// Held options in order.
    pub fn options(&self) -> impl Iterator<Item = &SelectOption> {
        let slice: &[SelectOption] = match self {
            Self::Single(current) => current.as_slice(),
            Self::Multiple(items) => items,
        };
        slice.iter()
    }

    /// Display labels of the held options.
    #[must_use]
    pub fn labels(&self) -> Vec<&str> {
        self.options().map(SelectOption::label).collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.options().next().is_none()
    }

    /// Drops every held option, keeping the mode.
    pub fn clear(&mut self) {
        *self = Self::empty(self.mode());
    }

    /// Encodes the selection for the page URL: `null`, one option, or an array.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Single(None) => Value::Null,
            Self::Single(Some(option)) => option_to_json(option),
            Self::Multiple(items) => Value::Array(items.iter().map(option_to_json).collect()),
        }
    }

    /// Decodes a selection written by [`to_json`](Self::to_json).
    ///
    /// A single value given to a multiple-mode control is accepted as a
    /// one-element selection.
    ///
    /// # Errors
    ///
    /// Returns [`DeskError::Json`] if an entry is neither a string nor a
    /// `{key, value}` object, and [`DeskError::Config`] for an array given to a
    /// single-mode control.
    pub fn from_json(mode: SelectionMode, value: &Value) -> Result<Self> {
        let mut state = Self::empty(mode);
        let entries: Vec<Value> = match (mode, value) {
            (_, Value::Null) => Vec::new(),
            (SelectionMode::Multiple, Value::Array(items)) => items.clone(),
            (SelectionMode::Single, Value::Array(_)) => {
                return Err(DeskError::Config(format!(
                    "single selection cannot hold a list: {value}"
                )))
            }
            (_, other) => vec![other.clone()],
        };

        for entry in entries {
            let option: SelectOption = serde_json::from_value(entry)?;
            state.select(option);
        }
        Ok(state)
    }
}

fn option_to_json(option: &SelectOption) -> Value {
    match option {
        SelectOption::Plain(value) => Value::String(value.clone()),
        SelectOption::Keyed { key, value } => serde_json::json!({ "key": key, "value": value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn options() -> Vec<SelectOption> {
        vec![
            SelectOption::keyed("1", "Math"),
            SelectOption::keyed("2", "Physics"),
            SelectOption::plain("Art"),
        ]
    }

    #[test]
    fn multiple_toggle_twice_restores_state() {
        for start in [vec![], vec![options()[1].clone()], options()] {
            for option in options() {
                let mut state = SelectionState::Multiple(start.clone());
                let before = state.clone();
                state.select(option.clone());
                state.select(option);
                let mut sorted_after: Vec<_> = state.labels().into_iter().map(String::from).collect();
                let mut sorted_before: Vec<_> = before.labels().into_iter().map(String::from).collect();
                sorted_after.sort();
                sorted_before.sort();
                assert_eq!(sorted_after, sorted_before);
            }
        }
    }

    #[test]
    fn colliding_keyed_options_toggle_independently() {
        let grade5 = SelectOption::keyed("1", "5");
        let grade9 = SelectOption::keyed("5", "9");
        let mut state = SelectionState::Multiple(vec![grade5.clone()]);
        let before = state.clone();

        assert!(state.is_selected(&grade5));
        assert!(!state.is_selected(&grade9));

        state.select(grade9.clone());
        assert_eq!(state, SelectionState::Multiple(vec![grade5, grade9.clone()]));
        state.select(grade9);
        assert_eq!(state, before);
    }

    #[test]
    fn single_pick_always_holds_exactly_that_option() {
        for prior in [None, Some(options()[0].clone()), Some(options()[2].clone())] {
            for option in options() {
                let mut state = SelectionState::Single(prior.clone());
                state.select(option.clone());
                assert_eq!(state, SelectionState::Single(Some(option)));
            }
        }
    }

    #[test]
    fn multiple_never_duplicates_keys() {
        let mut state = SelectionState::empty(SelectionMode::Multiple);
        state.select(SelectOption::keyed("1", "Math"));
        state.select(SelectOption::keyed("2", "Physics"));
        state.select(SelectOption::plain("1"));
        assert_eq!(state.labels(), vec!["Physics"]);
    }

    #[test]
    fn plain_scalar_selection_matches_keyed_option() {
        let state = SelectionState::Single(Some(SelectOption::plain("2")));
        assert!(state.is_selected(&SelectOption::keyed("2", "Physics")));
        assert!(!state.is_selected(&SelectOption::keyed("1", "Math")));
    }

    #[test]
    fn json_encoding_round_trips() {
        let mut state = SelectionState::empty(SelectionMode::Multiple);
        state.select(SelectOption::keyed("1", "Math"));
        state.select(SelectOption::plain("Art"));

        let encoded = state.to_json();
        assert_eq!(encoded, json!([{ "key": "1", "value": "Math" }, "Art"]));
        assert_eq!(SelectionState::from_json(SelectionMode::Multiple, &encoded).unwrap(), state);
    }

    #[test]
    fn single_rejects_lists() {
        let err = SelectionState::from_json(SelectionMode::Single, &json!(["a", "b"])).unwrap_err();
        assert!(matches!(err, DeskError::Config(_)));
        assert_eq!(
            SelectionState::from_json(SelectionMode::Single, &Value::Null).unwrap(),
            SelectionState::Single(None)
        );
    }
}
