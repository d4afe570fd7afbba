//! Field mappings: which record fields become which table columns.
//!
//! A [`FieldMapping`] is an ordered list of `(field path, Directive)` entries.
//! Entry order is column order. Mappings are usually built in code; list
//! screens whose columns are configured by the user load them from TOML or
//! JSON via [`FieldMapping::from_toml_str`] / [`FieldMapping::from_json`].
//!
//! ```toml
//! [[columns]]
//! field = "name"
//! label = "Name"
//!
//! [[columns]]
//! field = "teacher"
//! join = ["last_name", "first_name"]
//! label = "Teacher"
//!
//! [[columns]]
//! field = "group"
//! flatten = [{ field = "title", label = "Group" }]
//!
//! [[columns]]
//! field = "birth_date"
//! label = "Age"
//! format = "age"
//! ```

use crate::dates::{age_label, format_date, parse_date, MonthNames, DISPLAY_FORMAT};
use crate::domain::record::{display_value, lookup};
use crate::domain::{DeskError, Record, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// Separator used by join directives that do not name one.
pub const DEFAULT_JOIN_SEPARATOR: &str = " ";

/// Caller-supplied cell renderer for computed columns.
pub type ComputeFn = Rc<dyn Fn(&Record) -> String>;

/// How one mapping entry turns into cells.
#[derive(Clone)]
pub enum Directive {
    /// One column showing the field's string form.
    Label(String),
    /// Splice the columns of a nested mapping over the nested object inline.
    Flatten(FieldMapping),
    /// One column joining sibling fields of the object at the entry's path.
    Join {
        label: String,
        fields: Vec<String>,
        separator: String,
    },
    /// One column rendered by a function of the record.
    Compute { label: String, compute: ComputeFn },
}

impl fmt::Debug for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Label(label) => f.debug_tuple("Label").field(label).finish(),
            Self::Flatten(nested) => f.debug_tuple("Flatten").field(nested).finish(),
            Self::Join {
                label,
                fields,
                separator,
            } => f
                .debug_struct("Join")
                .field("label", label)
                .field("fields", fields)
                .field("separator", separator)
                .finish(),
            Self::Compute { label, .. } => f.debug_struct("Compute").field("label", label).finish_non_exhaustive(),
        }
    }
}

/// Ordered column declarations for a [`TableView`](super::TableView).
#[derive(Debug, Clone, Default)]
pub struct FieldMapping {
    entries: Vec<(String, Directive)>,
}

impl FieldMapping {
    #[must_use]
    pub const fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Adds a plain column. `field` may be a dotted path.
    #[must_use]
    pub fn label(mut self, field: impl Into<String>, label: impl Into<String>) -> Self {
        self.entries.push((field.into(), Directive::Label(label.into())));
        self
    }

    /// Splices the columns of `nested` over the object at `field`.
    #[must_use]
    pub fn flatten(mut self, field: impl Into<String>, nested: Self) -> Self {
        self.entries.push((field.into(), Directive::Flatten(nested)));
        self
    }

    /// Adds a column joining `fields` of the object at `field` with a space.
    ///
    /// An empty `field` joins fields of the record itself.
    #[must_use]
    pub fn join<I, S>(self, field: impl Into<String>, label: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.join_with(field, label, fields, DEFAULT_JOIN_SEPARATOR)
    }

    /// Like [`join`](Self::join) with an explicit separator.
    #[must_use]
    pub fn join_with<I, S>(
        mut self,
        field: impl Into<String>,
        label: impl Into<String>,
        fields: I,
        separator: impl Into<String>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries.push((
            field.into(),
            Directive::Join {
                label: label.into(),
                fields: fields.into_iter().map(Into::into).collect(),
                separator: separator.into(),
            },
        ));
        self
    }

    /// Adds a column rendered by `compute`.
    #[must_use]
    pub fn compute(
        mut self,
        field: impl Into<String>,
        label: impl Into<String>,
        compute: impl Fn(&Record) -> String + 'static,
    ) -> Self {
        self.entries.push((
            field.into(),
            Directive::Compute {
                label: label.into(),
                compute: Rc::new(compute),
            },
        ));
        self
    }

    /// Adds a column showing the date at `field` as `DD.MM.YYYY`.
    ///
    /// `field` is a path from the record root. Values that are not dates are
    /// shown unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use classdesk::table::{build_table, FieldMapping, TableOptions};
    /// use serde_json::json;
    ///
    /// let mapping = FieldMapping::new().date("paid_at", "Paid");
    /// let records = vec![json!({ "paid_at": "2024-03-05" })];
    /// let view = build_table(&records, &mapping, &TableOptions::default())?;
    /// assert_eq!(view.rows()[0].cells[0].text, "05.03.2024");
    /// # Ok::<(), classdesk::DeskError>(())
    /// ```
    #[must_use]
    pub fn date(mut self, field: impl Into<String>, label: impl Into<String>) -> Self {
        let field = field.into();
        let directive = date_directive(&field, label.into());
        self.entries.push((field, directive));
        self
    }

    /// Adds a column showing the age, as of `today`, of the birth date at
    /// `field`. Cells stay empty when the value is not a date.
    #[must_use]
    pub fn age(mut self, field: impl Into<String>, label: impl Into<String>, today: NaiveDate) -> Self {
        let field = field.into();
        let directive = age_directive(&field, label.into(), today);
        self.entries.push((field, directive));
        self
    }

    #[must_use]
    pub fn entries(&self) -> &[(String, Directive)] {
        &self.entries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Column headers in order, with flattened mappings spliced in.
    #[must_use]
    pub fn headers(&self) -> Vec<String> {
        let mut headers = Vec::new();
        self.collect_headers(&mut headers);
        headers
    }

    fn collect_headers(&self, out: &mut Vec<String>) {
        for (_, directive) in &self.entries {
            match directive {
                Directive::Label(label) | Directive::Join { label, .. } | Directive::Compute { label, .. } => {
                    out.push(label.clone());
                }
                Directive::Flatten(nested) => nested.collect_headers(out),
            }
        }
    }

    /// Rejects flatten directives without nested columns and joins without fields.
    ///
    /// # Errors
    ///
    /// Returns [`DeskError::Mapping`] naming the offending field.
    pub fn validate(&self) -> Result<()> {
        for (field, directive) in &self.entries {
            match directive {
                Directive::Flatten(nested) if nested.is_empty() => {
                    return Err(DeskError::Mapping(format!("`{field}`: flatten without a nested mapping")));
                }
                Directive::Flatten(nested) => nested.validate()?,
                Directive::Join { fields, .. } if fields.is_empty() => {
                    return Err(DeskError::Mapping(format!("`{field}`: join without fields")));
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Loads a mapping from a TOML document with a `[[columns]]` array.
    ///
    /// # Errors
    ///
    /// Returns [`DeskError::Mapping`] for malformed TOML and for entries with
    /// unknown or conflicting directives.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let file: MappingFile =
            toml::from_str(source).map_err(|e| DeskError::Mapping(format!("invalid mapping TOML: {e}")))?;
        Self::from_entries(file.columns)
    }

    /// Loads a mapping from a JSON array of column entries.
    ///
    /// # Errors
    ///
    /// Same as [`from_toml_str`](Self::from_toml_str).
    pub fn from_json(value: &Value) -> Result<Self> {
        let entries: Vec<MappingEntry> = serde_json::from_value(value.clone())
            .map_err(|e| DeskError::Mapping(format!("invalid mapping JSON: {e}")))?;
        Self::from_entries(entries)
    }

    fn from_entries(entries: Vec<MappingEntry>) -> Result<Self> {
        let mut mapping = Self::new();
        for entry in entries {
            let (field, directive) = entry.into_directive()?;
            mapping.entries.push((field, directive));
        }
        mapping.validate()?;
        Ok(mapping)
    }
}

fn date_directive(field: &str, label: String) -> Directive {
    let path = field.to_string();
    let names = MonthNames::russian();
    Directive::Compute {
        label,
        compute: Rc::new(move |record: &Record| {
            let text = lookup(record, &path).map(display_value).unwrap_or_default();
            parse_date(&text).map_or(text, |date| format_date(date, DISPLAY_FORMAT, &names))
        }),
    }
}

fn age_directive(field: &str, label: String, today: NaiveDate) -> Directive {
    let path = field.to_string();
    Directive::Compute {
        label,
        compute: Rc::new(move |record: &Record| {
            let text = lookup(record, &path).map(display_value).unwrap_or_default();
            parse_date(&text).map_or_else(|_| String::new(), |birth| age_label(birth, today))
        }),
    }
}

/// Value formats a configured column may ask for.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ColumnFormat {
    Date,
    Age,
}

#[derive(Debug, Deserialize)]
struct MappingFile {
    #[serde(default)]
    columns: Vec<MappingEntry>,
}

/// One column entry as written in configuration.
#[derive(Debug, Deserialize)]
struct MappingEntry {
    field: String,
    label: Option<String>,
    flatten: Option<Vec<MappingEntry>>,
    join: Option<Vec<String>>,
    separator: Option<String>,
    format: Option<ColumnFormat>,
    #[serde(flatten)]
    unknown: BTreeMap<String, Value>,
}

impl MappingEntry {
    fn into_directive(self) -> Result<(String, Directive)> {
        let field = self.field;
        if let Some(key) = self.unknown.keys().next() {
            return Err(DeskError::Mapping(format!("`{field}`: unknown directive `{key}`")));
        }

        if self.format.is_some() && (self.flatten.is_some() || self.join.is_some()) {
            return Err(DeskError::Mapping(format!("`{field}`: format only applies to plain columns")));
        }

        let directive = match (self.label, self.flatten, self.join) {
            (Some(label), None, None) => {
                if self.separator.is_some() {
                    return Err(DeskError::Mapping(format!("`{field}`: separator without join")));
                }
                match self.format {
                    None => Directive::Label(label),
                    Some(ColumnFormat::Date) => date_directive(&field, label),
                    Some(ColumnFormat::Age) => age_directive(&field, label, chrono::Local::now().date_naive()),
                }
            }
            (None, Some(nested), None) => Directive::Flatten(FieldMapping::from_entries(nested)?),
            (Some(label), None, Some(fields)) => Directive::Join {
                label,
                fields,
                separator: self.separator.unwrap_or_else(|| DEFAULT_JOIN_SEPARATOR.to_string()),
            },
            (None, None, Some(_)) => {
                return Err(DeskError::Mapping(format!("`{field}`: join needs a label")));
            }
            (None, None, None) => {
                return Err(DeskError::Mapping(format!("`{field}`: no directive")));
            }
            _ => {
                return Err(DeskError::Mapping(format!("`{field}`: conflicting directives")));
            }
        };
        Ok((field, directive))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn headers_follow_entry_order_and_splice_flatten() {
        let mapping = FieldMapping::new()
            .label("name", "Name")
            .flatten("group", FieldMapping::new().label("title", "Group").label("year", "Year"))
            .join("teacher", "Teacher", ["last_name", "first_name"])
            .compute("", "Age", |_| String::new());
        assert_eq!(mapping.headers(), vec!["Name", "Group", "Year", "Teacher", "Age"]);
    }

    #[test]
    fn loads_from_toml() {
        let mapping = FieldMapping::from_toml_str(
            r#"
            [[columns]]
            field = "name"
            label = "Name"

            [[columns]]
            field = "teacher"
            join = ["last_name", "first_name"]
            separator = ", "
            label = "Teacher"

            [[columns]]
            field = "group"
            flatten = [{ field = "title", label = "Group" }]
            "#,
        )
        .unwrap();

        assert_eq!(mapping.headers(), vec!["Name", "Teacher", "Group"]);
        match &mapping.entries()[1].1 {
            Directive::Join { separator, fields, .. } => {
                assert_eq!(separator, ", ");
                assert_eq!(fields, &vec!["last_name".to_string(), "first_name".to_string()]);
            }
            other => panic!("expected join, got {other:?}"),
        }
    }

    #[test]
    fn date_columns_render_in_display_format() {
        let mapping = FieldMapping::from_toml_str(
            r#"
            [[columns]]
            field = "name"
            label = "Name"

            [[columns]]
            field = "info.birth_date"
            label = "Born"
            format = "date"
            "#,
        )
        .unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let mapping = mapping.age("info.birth_date", "Age", today);
        assert_eq!(mapping.headers(), vec!["Name", "Born", "Age"]);

        let records = [
            json!({ "name": "Anna", "info": { "birth_date": "2012-03-16" } }),
            json!({ "name": "Boris", "info": { "birth_date": "14.03.2003" } }),
            json!({ "name": "Vera", "info": { "birth_date": "soon" } }),
        ];
        let cells: Vec<Vec<String>> = records
            .iter()
            .map(|record| {
                mapping.entries()[1..]
                    .iter()
                    .map(|(_, directive)| match directive {
                        Directive::Compute { compute, .. } => compute(record),
                        other => panic!("expected compute, got {other:?}"),
                    })
                    .collect()
            })
            .collect();

        assert_eq!(
            cells,
            vec![
                vec!["16.03.2012".to_string(), "11 лет".to_string()],
                vec!["14.03.2003".to_string(), "21 год".to_string()],
                vec!["soon".to_string(), String::new()],
            ]
        );
    }

    #[test]
    fn format_on_join_is_rejected() {
        let err = FieldMapping::from_json(&json!([
            { "field": "teacher", "label": "Teacher", "join": ["last_name"], "format": "date" }
        ]))
        .unwrap_err();
        assert!(matches!(err, DeskError::Mapping(ref msg) if msg.contains("format")), "{err}");
    }

    #[test]
    fn unknown_directive_fails_fast() {
        let err = FieldMapping::from_json(&json!([{ "field": "name", "lable": "Name" }])).unwrap_err();
        assert!(matches!(err, DeskError::Mapping(ref msg) if msg.contains("lable")), "{err}");
    }

    #[test]
    fn conflicting_directives_fail() {
        let err = FieldMapping::from_json(&json!([
            { "field": "group", "label": "Group", "flatten": [{ "field": "title", "label": "T" }] }
        ]))
        .unwrap_err();
        assert!(matches!(err, DeskError::Mapping(_)));
    }

    #[test]
    fn empty_flatten_and_join_are_rejected() {
        assert!(FieldMapping::new().flatten("group", FieldMapping::new()).validate().is_err());
        assert!(FieldMapping::new()
            .join("", "Name", Vec::<String>::new())
            .validate()
            .is_err());
        assert!(FieldMapping::from_json(&json!([{ "field": "group", "flatten": [] }])).is_err());
    }
}
