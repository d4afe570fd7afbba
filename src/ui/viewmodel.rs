//! View model types representing renderable UI state.
//!
//! View models are computed from [`AppState`](crate::app::AppState) by
//! `compute_viewmodel` and consumed by the renderer. They carry no behaviour,
//! only display-ready data with positions already resolved.

use crate::popup::Rect;
use crate::select::{PinnedRow, SelectControl};
use crate::table::TableView;

/// Complete UI view model for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UIViewModel {
    pub header: HeaderInfo,

    /// Filter trigger buttons, left to right.
    pub filters: Vec<FilterChip>,

    pub search_bar: SearchBarInfo,

    /// Headers plus the visible window of rows (or skeleton rows).
    pub table: TableView,

    /// Index of the selected row within the visible window.
    pub selected_index: Option<usize>,

    /// The open filter panel, drawn over the table.
    pub panel: Option<PanelView>,

    /// The open row action menu.
    pub row_menu: Option<MenuView>,

    /// Shown instead of the table body when nothing matches.
    pub empty_state: Option<EmptyState>,

    /// Last failure reported by the API.
    pub error: Option<String>,

    pub footer: FooterInfo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    pub title: String,
}

/// A filter trigger button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterChip {
    /// Selected labels or the placeholder.
    pub label: String,
    pub rect: Rect,
    pub open: bool,
    /// Something is selected.
    pub active: bool,
}

/// The page search box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBarInfo {
    pub query: String,
    pub focused: bool,
    /// Typed text has not been applied yet.
    pub pending: bool,
}

/// One row of an open filter panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelOption {
    pub label: String,
    pub selected: bool,
}

/// An open filter panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelView {
    pub rect: Rect,
    /// Search text, for searchable controls.
    pub search: Option<String>,
    pub pinned: Option<PinnedRow>,
    pub options: Vec<PanelOption>,
}

impl PanelView {
    /// Snapshot of an open, placed control. `None` while closed.
    #[must_use]
    pub fn from_control(control: &SelectControl) -> Option<Self> {
        if !control.is_open() {
            return None;
        }
        let rect = control.panel()?;
        Some(Self {
            rect,
            search: control.is_searchable().then(|| control.search().to_string()),
            pinned: control.pinned().cloned(),
            options: control
                .visible_options()
                .into_iter()
                .map(|option| PanelOption {
                    label: option.label().to_string(),
                    selected: control.is_selected(option),
                })
                .collect(),
        })
    }
}

/// An open row action menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuView {
    pub rect: Rect,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterInfo {
    /// Keybinding help text (e.g., "j/k: move  /: search  f: filters").
    pub keybindings: String,
}

/// Message shown when the table has no rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    pub message: String,
    pub subtitle: String,
}
