//! Declarative description of one list screen.
//!
//! A [`PageConfig`] names the API resource behind the table, how records map
//! to columns, how search scores them, which filters sit above the table and
//! which actions each row offers. [`AppState`](super::AppState) turns it into
//! a running screen.

use crate::domain::record::{display_value, lookup};
use crate::domain::{Record, SelectOption};
use crate::search::SearchConfig;
use crate::select::{PinnedRow, SelectionMode};
use crate::table::view::DEFAULT_SKELETON_ROWS;
use crate::table::{FieldMapping, RowActions, TableOptions};
use std::time::Duration;

/// Quiet period before a typed search query is applied.
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Where a filter's options come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterSource {
    /// A fixed list known up front (weekdays, payment states).
    Static(Vec<SelectOption>),
    /// Options fetched from an API resource when the page mounts.
    Remote {
        resource: String,
        /// Field whose value becomes the option key.
        key_field: String,
        /// Field (dotted path allowed) shown as the option label.
        label_field: String,
    },
}

impl FilterSource {
    /// Builds options from fetched records. Records without a key are skipped.
    ///
    /// Static sources ignore `records` and return their fixed list.
    #[must_use]
    pub fn options_from(&self, records: &[Record]) -> Vec<SelectOption> {
        match self {
            Self::Static(options) => options.clone(),
            Self::Remote {
                key_field,
                label_field,
                ..
            } => records
                .iter()
                .filter_map(|record| {
                    let key = lookup(record, key_field).map(display_value).filter(|k| !k.is_empty())?;
                    let label = lookup(record, label_field).map_or_else(|| key.clone(), display_value);
                    Some(SelectOption::keyed(key, label))
                })
                .collect(),
        }
    }

    /// Initial options, before anything has been fetched.
    #[must_use]
    pub fn initial_options(&self) -> Vec<SelectOption> {
        match self {
            Self::Static(options) => options.clone(),
            Self::Remote { .. } => Vec::new(),
        }
    }
}

/// One filter control above the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpec {
    /// Query parameter name, both in the page URL and in API requests.
    pub id: String,
    pub placeholder: String,
    pub mode: SelectionMode,
    pub source: FilterSource,
    pub searchable: bool,
    pub pinned: Option<PinnedRow>,
}

impl FilterSpec {
    #[must_use]
    pub fn new(id: impl Into<String>, placeholder: impl Into<String>, mode: SelectionMode, source: FilterSource) -> Self {
        Self {
            id: id.into(),
            placeholder: placeholder.into(),
            mode,
            source,
            searchable: false,
            pinned: None,
        }
    }

    #[must_use]
    pub const fn searchable(mut self) -> Self {
        self.searchable = true;
        self
    }

    /// Adds a clickable row above the options that clears the filter.
    #[must_use]
    pub fn with_clear_row(mut self, label: impl Into<String>) -> Self {
        self.pinned = Some(PinnedRow {
            label: label.into(),
            clickable: true,
        });
        self
    }
}

/// Everything a list screen needs besides its live state.
#[derive(Debug, Clone)]
pub struct PageConfig {
    pub title: String,
    /// Resource path below the API base URL.
    pub resource: String,
    pub mapping: FieldMapping,
    /// Scoring rules; `None` derives them from the first loaded record.
    pub search: Option<SearchConfig>,
    pub filters: Vec<FilterSpec>,
    pub row_actions: RowActions,
    pub table_options: TableOptions,
    pub debounce: Duration,
    pub skeleton_rows: usize,
}

impl PageConfig {
    #[must_use]
    pub fn new(title: impl Into<String>, resource: impl Into<String>, mapping: FieldMapping) -> Self {
        Self {
            title: title.into(),
            resource: resource.into(),
            mapping,
            search: None,
            filters: Vec::new(),
            row_actions: RowActions::new(),
            table_options: TableOptions::default(),
            debounce: DEFAULT_SEARCH_DEBOUNCE,
            skeleton_rows: DEFAULT_SKELETON_ROWS,
        }
    }

    #[must_use]
    pub fn with_search(mut self, config: SearchConfig) -> Self {
        self.search = Some(config);
        self
    }

    #[must_use]
    pub fn with_filter(mut self, filter: FilterSpec) -> Self {
        self.filters.push(filter);
        self
    }

    #[must_use]
    pub fn with_row_actions(mut self, actions: RowActions) -> Self {
        self.row_actions = actions;
        self
    }

    #[must_use]
    pub fn with_table_options(mut self, options: TableOptions) -> Self {
        self.table_options = options;
        self
    }

    #[must_use]
    pub const fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    #[must_use]
    pub const fn with_skeleton_rows(mut self, rows: usize) -> Self {
        self.skeleton_rows = rows;
        self
    }

    /// Search rules for the current records, inferred from all of them when
    /// the page declares none.
    #[must_use]
    pub fn search_config(&self, records: &[Record]) -> SearchConfig {
        self.search
            .clone()
            .unwrap_or_else(|| SearchConfig::infer_all(records))
    }
}
