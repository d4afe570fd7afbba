//! Building a [`TableView`] from records and a [`FieldMapping`].

use super::mapping::{Directive, FieldMapping};
use crate::domain::record::{display_value, lookup, row_key};
use crate::domain::{Record, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// Placeholder rows shown while a list is loading.
pub const DEFAULT_SKELETON_ROWS: usize = 8;

/// Animation offset between consecutive skeleton rows.
pub const SKELETON_STAGGER_MS: u64 = 100;

/// Picks a presentational class for one cell from the row's record.
pub type ClassFn = Rc<dyn Fn(&Record) -> Option<String>>;

/// Presentation options for [`build_table`].
#[derive(Clone, Default)]
pub struct TableOptions {
    /// Field path → class picker for that column's cells.
    pub cell_classes: BTreeMap<String, ClassFn>,
    /// When set, render this many skeleton rows instead of data.
    pub skeleton: Option<usize>,
}

impl fmt::Debug for TableOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableOptions")
            .field("cell_classes", &self.cell_classes.keys().collect::<Vec<_>>())
            .field("skeleton", &self.skeleton)
            .finish()
    }
}

impl TableOptions {
    #[must_use]
    pub fn with_class(
        mut self,
        field: impl Into<String>,
        class: impl Fn(&Record) -> Option<String> + 'static,
    ) -> Self {
        self.cell_classes.insert(field.into(), Rc::new(class));
        self
    }

    /// Switches the table into its loading state with `rows` placeholders.
    #[must_use]
    pub const fn loading(mut self, rows: usize) -> Self {
        self.skeleton = Some(rows);
        self
    }
}

/// One rendered cell.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cell {
    pub text: String,
    pub class: Option<String>,
}

impl Cell {
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            class: None,
        }
    }
}

/// One data row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub row_key: String,
    pub cells: Vec<Cell>,
}

/// A loading placeholder row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkeletonRow {
    pub index: usize,
    pub animation_delay_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableBody {
    Rows(Vec<TableRow>),
    Skeleton(Vec<SkeletonRow>),
}

/// Headers plus either data rows or skeleton rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView {
    pub headers: Vec<String>,
    pub body: TableBody,
}

impl TableView {
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Data rows; empty while loading.
    #[must_use]
    pub fn rows(&self) -> &[TableRow] {
        match &self.body {
            TableBody::Rows(rows) => rows,
            TableBody::Skeleton(_) => &[],
        }
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.body, TableBody::Skeleton(_))
    }
}

/// Renders `records` through `mapping`.
///
/// One row per record in input order. Skeleton mode ignores the records.
///
/// # Errors
///
/// Returns [`DeskError::Mapping`](crate::domain::DeskError::Mapping) if the
/// mapping is malformed.
///
/// # Examples
///
/// ```
/// use classdesk::table::{build_table, FieldMapping, TableOptions};
/// use serde_json::json;
///
/// let records = vec![
///     json!({ "id": 1, "first": "Anna", "last": "Petrova" }),
///     json!({ "id": 2, "first": "Ivan", "last": "Orlov" }),
/// ];
/// let mapping = FieldMapping::new().join("", "Student", ["last", "first"]);
///
/// let view = build_table(&records, &mapping, &TableOptions::default()).unwrap();
/// assert_eq!(view.rows()[1].cells[0].text, "Orlov Ivan");
/// ```
pub fn build_table(records: &[Record], mapping: &FieldMapping, options: &TableOptions) -> Result<TableView> {
    let _span = tracing::debug_span!("build_table", records = records.len(), skeleton = ?options.skeleton).entered();
    mapping.validate()?;

    let headers = mapping.headers();
    let body = match options.skeleton {
        Some(count) => TableBody::Skeleton(
            (0..count)
                .map(|index| SkeletonRow {
                    index,
                    animation_delay_ms: index as u64 * SKELETON_STAGGER_MS,
                })
                .collect(),
        ),
        None => TableBody::Rows(
            records
                .iter()
                .map(|record| {
                    let mut cells = Vec::with_capacity(headers.len());
                    push_cells(record, record, mapping, "", options, &mut cells);
                    TableRow {
                        row_key: row_key(record),
                        cells,
                    }
                })
                .collect(),
        ),
    };

    Ok(TableView { headers, body })
}

fn push_cells(
    record: &Record,
    scope: &Value,
    mapping: &FieldMapping,
    prefix: &str,
    options: &TableOptions,
    out: &mut Vec<Cell>,
) {
    for (field, directive) in mapping.entries() {
        let path = match (prefix.is_empty(), field.is_empty()) {
            (true, _) => field.clone(),
            (false, true) => prefix.to_string(),
            (false, false) => format!("{prefix}.{field}"),
        };

        let text = match directive {
            Directive::Label(_) => lookup(scope, field).map(display_value).unwrap_or_default(),
            Directive::Flatten(nested) => {
                let inner = lookup(scope, field).unwrap_or(&Value::Null);
                push_cells(record, inner, nested, &path, options, out);
                continue;
            }
            Directive::Join { fields, separator, .. } => {
                let base = lookup(scope, field).unwrap_or(&Value::Null);
                fields
                    .iter()
                    .map(|name| base.get(name).map(display_value).unwrap_or_default())
                    .collect::<Vec<_>>()
                    .join(separator)
            }
            Directive::Compute { compute, .. } => compute(record),
        };

        let class = options.cell_classes.get(&path).and_then(|pick| pick(record));
        out.push(Cell { text, class });
    }
}
