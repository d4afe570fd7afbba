//! Declarative per-field scoring rules.
//!
//! A [`SearchConfig`] lists, in order, which fields of a record take part in a
//! search and how each one is scored. Configs are usually written in code for
//! each entity, but list screens may also declare them in JSON using the same
//! shape the dashboard front end has always used:
//!
//! ```json
//! {
//!   "name": { "perCase": { "add": 10 } },
//!   "phone": true,
//!   "group": { "subs": { "title": true }, "multiplier": 0.5 },
//!   "parents": { "forAll": { "name": true }, "multiplier": 0.25 },
//!   "notes": { "minCases": 2, "stopAtCases": 5, "perCase": { "multiple": 1.5 } }
//! }
//! ```

use crate::domain::{DeskError, Record, Result};
use serde_json::Value;

/// Scoring rule for a plain text field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextRule {
    /// Matches needed before the field contributes any score.
    pub min_cases: u32,
    /// Matches beyond this count are ignored. `None` means unlimited.
    pub stop_at_cases: Option<u32>,
    /// Score added per counted match.
    pub per_case_add: f64,
    /// Factor the running score is multiplied by per counted match.
    pub per_case_multiple: f64,
}

impl Default for TextRule {
    fn default() -> Self {
        Self {
            min_cases: 0,
            stop_at_cases: None,
            per_case_add: 1.0,
            per_case_multiple: 1.0,
        }
    }
}

/// How a single field takes part in scoring.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldRule {
    /// Match the query against the field's display text.
    Text(TextRule),
    /// Recurse into a nested object.
    Subs {
        /// Rules for the nested object's fields.
        config: SearchConfig,
        /// Factor applied to the nested score.
        multiplier: f64,
    },
    /// Recurse into every element of an array.
    Array {
        /// Rules applied to each object element.
        for_all: SearchConfig,
        /// Factor applied to the summed element scores.
        multiplier: f64,
    },
}

/// Ordered scoring rules for the fields of one kind of record.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchConfig {
    fields: Vec<(String, FieldRule)>,
}

impl SearchConfig {
    /// Creates an empty config.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field with an explicit rule.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, rule: FieldRule) -> Self {
        self.fields.push((name.into(), rule));
        self
    }

    /// Adds a plain text field with default scoring.
    #[must_use]
    pub fn text(self, name: impl Into<String>) -> Self {
        self.field(name, FieldRule::Text(TextRule::default()))
    }

    /// Adds a nested-object field.
    #[must_use]
    pub fn subs(self, name: impl Into<String>, config: Self, multiplier: f64) -> Self {
        self.field(name, FieldRule::Subs { config, multiplier })
    }

    /// Adds an array field whose elements are scored with `for_all`.
    #[must_use]
    pub fn array(self, name: impl Into<String>, for_all: Self, multiplier: f64) -> Self {
        self.field(name, FieldRule::Array { for_all, multiplier })
    }

    /// Field rules in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[(String, FieldRule)] {
        &self.fields
    }

    /// Derives a config covering every key of a sample record.
    ///
    /// Objects become [`FieldRule::Subs`], arrays become [`FieldRule::Array`]
    /// (element rules are merged from every object element), and everything
    /// else is scored as text. Derivation recurses to full depth.
    ///
    /// # Examples
    ///
    /// ```
    /// use classdesk::search::{FieldRule, SearchConfig};
    /// use serde_json::json;
    ///
    /// let config = SearchConfig::infer(&json!({
    ///     "name": "Anna",
    ///     "group": { "title": "5A" },
    ///     "phones": ["+7 900", "+7 901"],
    /// }));
    /// assert_eq!(config.fields().len(), 3);
    /// assert!(matches!(config.fields()[1].1, FieldRule::Subs { .. }));
    /// ```
    #[must_use]
    pub fn infer(record: &Record) -> Self {
        let Some(object) = record.as_object() else {
            return Self::new();
        };

        object.iter().fold(Self::new(), |config, (name, value)| match value {
            Value::Object(_) => config.subs(name.clone(), Self::infer(value), 1.0),
            Value::Array(items) => {
                let for_all = items
                    .iter()
                    .filter(|item| item.is_object())
                    .fold(Self::new(), |merged, item| merged.merge(Self::infer(item)));
                config.array(name.clone(), for_all, 1.0)
            }
            _ => config.text(name.clone()),
        })
    }

    /// Derives one config from every record of a list.
    ///
    /// A field that is null or scalar in one record and an object or array in
    /// another is scored by its structured shape.
    #[must_use]
    pub fn infer_all<'a>(records: impl IntoIterator<Item = &'a Record>) -> Self {
        records
            .into_iter()
            .fold(Self::new(), |merged, record| merged.merge(Self::infer(record)))
    }

    /// Folds the fields of `other` into this config.
    ///
    /// New fields are appended. A text rule is replaced by a structured rule
    /// for the same field, and structured rules of the same kind merge their
    /// nested configs.
    #[must_use]
    fn merge(mut self, other: Self) -> Self {
        for (name, rule) in other.fields {
            let Some(slot) = self.fields.iter_mut().find(|(existing, _)| *existing == name) else {
                self.fields.push((name, rule));
                continue;
            };
            let current = std::mem::replace(&mut slot.1, FieldRule::Text(TextRule::default()));
            slot.1 = match (current, rule) {
                (FieldRule::Text(_), structured @ (FieldRule::Subs { .. } | FieldRule::Array { .. })) => structured,
                (
                    FieldRule::Subs { config, multiplier },
                    FieldRule::Subs { config: theirs, .. },
                ) => FieldRule::Subs {
                    config: config.merge(theirs),
                    multiplier,
                },
                (
                    FieldRule::Array { for_all, multiplier },
                    FieldRule::Array { for_all: theirs, .. },
                ) => FieldRule::Array {
                    for_all: for_all.merge(theirs),
                    multiplier,
                },
                (current, _) => current,
            };
        }
        self
    }

    /// Reads a config from its JSON declaration.
    ///
    /// # Errors
    ///
    /// Returns [`DeskError::Mapping`] for anything that is not a recognised
    /// rule: unknown keys, wrong value types, or a non-object root.
    pub fn from_json(value: &Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| DeskError::Mapping(format!("search config must be an object, got {value}")))?;

        object
            .iter()
            .map(|(name, raw)| parse_rule(name, raw).map(|rule| (name.clone(), rule)))
            .collect::<Result<Vec<_>>>()
            .map(|fields| Self { fields })
    }
}

fn parse_rule(name: &str, raw: &Value) -> Result<FieldRule> {
    let bad = |what: &str| DeskError::Mapping(format!("search field `{name}`: {what}"));

    let object = match raw {
        Value::Bool(true) => return Ok(FieldRule::Text(TextRule::default())),
        Value::Object(object) => object,
        other => return Err(bad(&format!("expected `true` or an object, got {other}"))),
    };

    let multiplier = match object.get("multiplier") {
        None => 1.0,
        Some(v) => v.as_f64().ok_or_else(|| bad("`multiplier` must be a number"))?,
    };

    if let Some(subs) = object.get("subs") {
        ensure_keys(object, &["subs", "multiplier"], &bad)?;
        return Ok(FieldRule::Subs {
            config: SearchConfig::from_json(subs)?,
            multiplier,
        });
    }

    if let Some(for_all) = object.get("forAll") {
        ensure_keys(object, &["forAll", "array", "multiplier"], &bad)?;
        return Ok(FieldRule::Array {
            for_all: SearchConfig::from_json(for_all)?,
            multiplier,
        });
    }

    ensure_keys(object, &["minCases", "stopAtCases", "perCase"], &bad)?;

    let count = |key: &str| -> Result<Option<u32>> {
        object
            .get(key)
            .map(|v| {
                v.as_u64()
                    .and_then(|n| u32::try_from(n).ok())
                    .ok_or_else(|| bad(&format!("`{key}` must be a non-negative integer")))
            })
            .transpose()
    };

    let mut rule = TextRule {
        min_cases: count("minCases")?.unwrap_or(0),
        stop_at_cases: count("stopAtCases")?,
        ..TextRule::default()
    };

    if let Some(per_case) = object.get("perCase") {
        let per_case = per_case
            .as_object()
            .ok_or_else(|| bad("`perCase` must be an object"))?;
        ensure_keys(per_case, &["add", "multiple"], &bad)?;
        if let Some(add) = per_case.get("add") {
            rule.per_case_add = add.as_f64().ok_or_else(|| bad("`perCase.add` must be a number"))?;
        }
        if let Some(multiple) = per_case.get("multiple") {
            rule.per_case_multiple = multiple
                .as_f64()
                .ok_or_else(|| bad("`perCase.multiple` must be a number"))?;
        }
    }

    Ok(FieldRule::Text(rule))
}

fn ensure_keys(
    object: &serde_json::Map<String, Value>,
    allowed: &[&str],
    bad: &dyn Fn(&str) -> DeskError,
) -> Result<()> {
    match object.keys().find(|key| !allowed.contains(&key.as_str())) {
        Some(key) => Err(bad(&format!("unknown directive `{key}`"))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn parses_every_rule_kind() {
        let config = SearchConfig::from_json(&json!({
            "name": { "perCase": { "add": 10 } },
            "phone": true,
            "group": { "subs": { "title": true }, "multiplier": 0.5 },
            "parents": { "forAll": { "name": true }, "array": true },
            "notes": { "minCases": 2, "stopAtCases": 5, "perCase": { "multiple": 1.5 } }
        }))
        .unwrap();

        let expected = SearchConfig::new()
            .field(
                "name",
                FieldRule::Text(TextRule { per_case_add: 10.0, ..TextRule::default() }),
            )
            .text("phone")
            .subs("group", SearchConfig::new().text("title"), 0.5)
            .array("parents", SearchConfig::new().text("name"), 1.0)
            .field(
                "notes",
                FieldRule::Text(TextRule {
                    min_cases: 2,
                    stop_at_cases: Some(5),
                    per_case_multiple: 1.5,
                    ..TextRule::default()
                }),
            );

        assert_eq!(config, expected);
    }

    #[test]
    fn unknown_directive_fails_fast() {
        let err = SearchConfig::from_json(&json!({ "name": { "fuzzy": true } })).unwrap_err();
        assert!(err.to_string().contains("unknown directive `fuzzy`"), "{err}");
    }

    #[test]
    fn false_is_not_a_rule() {
        assert!(SearchConfig::from_json(&json!({ "name": false })).is_err());
        assert!(SearchConfig::from_json(&json!(["name"])).is_err());
    }

    #[test]
    fn infer_recurses_into_nested_shapes() {
        let config = SearchConfig::infer(&json!({
            "group": { "teacher": { "name": "Irina" } },
            "parents": [{ "name": "Olga" }, { "phone": "+7" }],
        }));

        let expected = SearchConfig::new()
            .subs(
                "group",
                SearchConfig::new().subs("teacher", SearchConfig::new().text("name"), 1.0),
                1.0,
            )
            .array("parents", SearchConfig::new().text("name").text("phone"), 1.0);

        assert_eq!(config, expected);
    }

    #[test]
    fn later_records_upgrade_text_fields() {
        let records = [
            json!({ "id": 1, "group": null, "parents": [] }),
            json!({ "id": 2, "group": { "title": "5A" }, "parents": [{ "name": "Olga" }] }),
            json!({ "id": 3, "group": { "teacher": "Irina" }, "phone": "+7" }),
        ];

        let expected = SearchConfig::new()
            .text("id")
            .subs("group", SearchConfig::new().text("title").text("teacher"), 1.0)
            .array("parents", SearchConfig::new().text("name"), 1.0)
            .text("phone");

        assert_eq!(SearchConfig::infer_all(&records), expected);
    }
}
