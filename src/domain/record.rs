//! Records and their display helpers.
//!
//! A record is whatever the API returns for one entity (a student, a payment,
//! a lesson): a JSON object whose fields are scalars, arrays of scalars, or
//! nested objects. Views never mutate records; edits produce new records that
//! are handed back through callbacks.

use serde_json::Value;

/// One entity as delivered by the API.
///
/// Always expected to be a JSON object; helpers in this module treat any
/// other shape as a record without fields.
pub type Record = Value;

/// Separator used when an array field is shown in a single cell.
pub const ARRAY_SEPARATOR: &str = ", ";

/// Returns the identity used for a record's display row.
///
/// Prefers the `id` field, then `key`, and falls back to the compact JSON
/// serialization of the whole record. The fallback is stable for a given
/// record but not collision-proof.
///
/// # Examples
///
/// ```
/// use classdesk::domain::record::row_key;
/// use serde_json::json;
///
/// assert_eq!(row_key(&json!({ "id": 3, "key": "x" })), "3");
/// assert_eq!(row_key(&json!({ "key": "x" })), "x");
/// assert_eq!(row_key(&json!({ "name": "A" })), r#"{"name":"A"}"#);
/// ```
#[must_use]
pub fn row_key(record: &Record) -> String {
    ["id", "key"]
        .iter()
        .find_map(|field| record.get(field).filter(|v| !v.is_null()))
        .map_or_else(|| record.to_string(), display_value)
}

/// Resolves a dotted field path (`group.title`) against a record.
///
/// An empty path resolves to the record itself. Returns `None` when any
/// segment is missing or crosses a non-object value.
#[must_use]
pub fn lookup<'a>(record: &'a Record, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(record);
    }
    path.split('.').try_fold(record, |current, segment| current.get(segment))
}

/// Converts a field value to the text shown in a cell.
///
/// - strings are shown without quotes
/// - `null` is shown as an empty string
/// - arrays are joined with [`ARRAY_SEPARATOR`]
/// - nested objects fall back to compact JSON
///
/// # Examples
///
/// ```
/// use classdesk::domain::record::display_value;
/// use serde_json::json;
///
/// assert_eq!(display_value(&json!("Anna")), "Anna");
/// assert_eq!(display_value(&json!(["Mon", "Wed"])), "Mon, Wed");
/// assert_eq!(display_value(&json!(null)), "");
/// ```
#[must_use]
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(ARRAY_SEPARATOR),
        Value::Object(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn null_id_falls_through_to_key() {
        let record = json!({ "id": null, "key": "k-1" });
        assert_eq!(row_key(&record), "k-1");
    }

    #[test]
    fn lookup_walks_nested_objects() {
        let record = json!({ "group": { "teacher": { "name": "Irina" } } });
        assert_eq!(lookup(&record, "group.teacher.name"), Some(&json!("Irina")));
        assert_eq!(lookup(&record, "group.missing"), None);
        assert_eq!(lookup(&record, ""), Some(&record));
    }

    #[test]
    fn lookup_does_not_cross_scalars() {
        let record = json!({ "name": "Anna" });
        assert_eq!(lookup(&record, "name.first"), None);
    }

    #[test]
    fn numbers_and_bools_render_plainly() {
        assert_eq!(display_value(&json!(12.5)), "12.5");
        assert_eq!(display_value(&json!(false)), "false");
        assert_eq!(display_value(&json!([1, "b", null])), "1, b, ");
    }
}
