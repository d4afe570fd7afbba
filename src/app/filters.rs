//! Filter selections mirrored into the page URL.
//!
//! Each filter id maps to the JSON encoding of its selection, so a reloaded
//! or shared URL restores every control:
//!
//! ```text
//! ?group=%7B%22key%22%3A%225a%22%2C%22value%22%3A%225A%22%7D&day=%5B%22Mon%22%5D
//! ```

use crate::domain::{DeskError, Result};
use serde_json::Value;
use std::collections::BTreeMap;

/// Placeholder origin used only to reuse `Url`'s query encoding.
const QUERY_BASE: &str = "http://classdesk.local/";

/// Active filter values by filter id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    values: BTreeMap<String, Value>,
}

impl FilterState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a filter. `null`, empty strings and empty arrays remove it.
    pub fn set(&mut self, id: impl Into<String>, value: Value) {
        let id = id.into();
        let inactive = match &value {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            Value::Array(items) => items.is_empty(),
            _ => false,
        };
        if inactive {
            self.values.remove(&id);
        } else {
            self.values.insert(id, value);
        }
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Value> {
        self.values.get(id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Encodes the filters as a URL query string without the leading `?`.
    #[must_use]
    pub fn to_query(&self) -> String {
        let Ok(mut url) = reqwest::Url::parse(QUERY_BASE) else {
            return String::new();
        };
        if !self.values.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (id, value) in &self.values {
                pairs.append_pair(id, &value.to_string());
            }
        }
        url.query().unwrap_or_default().to_string()
    }

    /// Decodes a query string written by [`to_query`](Self::to_query).
    ///
    /// A leading `?` is accepted. Parameters whose value is not valid JSON
    /// are taken as plain strings, so hand-written URLs like `?day=Mon` work.
    ///
    /// # Errors
    ///
    /// Returns [`DeskError::Config`] if the query cannot be parsed at all.
    pub fn from_query(query: &str) -> Result<Self> {
        let query = query.trim_start_matches('?');
        let url = reqwest::Url::parse(&format!("{QUERY_BASE}?{query}"))
            .map_err(|e| DeskError::Config(format!("invalid filter query {query:?}: {e}")))?;

        let mut state = Self::new();
        for (id, raw) in url.query_pairs() {
            let value = serde_json::from_str(&raw).unwrap_or_else(|_| Value::String(raw.to_string()));
            state.set(id.to_string(), value);
        }
        Ok(state)
    }

    /// Flattens the filters into API query parameters.
    ///
    /// Plain values pass through, keyed options contribute their key, and
    /// arrays contribute one parameter per element.
    #[must_use]
    pub fn api_query(&self) -> Vec<(String, String)> {
        fn scalar(value: &Value) -> Option<String> {
            match value {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                Value::Bool(b) => Some(b.to_string()),
                Value::Object(fields) => fields.get("key").and_then(scalar),
                Value::Null | Value::Array(_) => None,
            }
        }

        let mut query = Vec::new();
        for (id, value) in &self.values {
            match value {
                Value::Array(items) => query.extend(items.iter().filter_map(scalar).map(|v| (id.clone(), v))),
                other => query.extend(scalar(other).map(|v| (id.clone(), v))),
            }
        }
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sample() -> FilterState {
        let mut state = FilterState::new();
        state.set("group", json!({ "key": "5a", "value": "5A класс" }));
        state.set("day", json!(["Mon", "Wed"]));
        state.set("paid", json!(true));
        state
    }

    #[test]
    fn round_trips_through_query() {
        let state = sample();
        let query = state.to_query();
        assert!(!query.contains(' '));
        assert_eq!(FilterState::from_query(&query).unwrap(), state);
        assert_eq!(FilterState::from_query(&format!("?{query}")).unwrap(), state);
    }

    #[test]
    fn inactive_values_are_dropped() {
        let mut state = sample();
        state.set("day", json!([]));
        state.set("paid", Value::Null);
        assert_eq!(state.get("day"), None);
        assert_eq!(state.get("paid"), None);
        assert!(FilterState::new().to_query().is_empty());
    }

    #[test]
    fn plain_query_values_are_strings() {
        let state = FilterState::from_query("day=Mon").unwrap();
        assert_eq!(state.get("day"), Some(&json!("Mon")));
    }

    #[test]
    fn api_query_uses_keys() {
        assert_eq!(
            sample().api_query(),
            vec![
                ("day".to_string(), "Mon".to_string()),
                ("day".to_string(), "Wed".to_string()),
                ("group".to_string(), "5a".to_string()),
                ("paid".to_string(), "true".to_string()),
            ]
        );
    }
}
