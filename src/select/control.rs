//! The dropdown selection control.
//!
//! A [`SelectControl`] owns its option list, the current [`SelectionState`],
//! an optional search box and pinned row, and the open/closed panel. Opening
//! the panel attaches an outside-click listener through a [`Dismissal`]
//! handle; closing it or dropping the control detaches it again.

use super::state::{SelectionMode, SelectionState};
use crate::domain::SelectOption;
use crate::popup::{anchor_below, Dismissal, NodeId, NodeTree, Rect, SharedListeners, Size};
use unicode_width::UnicodeWidthStr;

/// Separator between labels on the trigger button of a multi-select.
pub const LABEL_SEPARATOR: &str = ", ";

/// Extra row pinned above the options (for example "remove filter").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinnedRow {
    pub label: String,
    /// Non-clickable rows are rendered as a caption only.
    pub clickable: bool,
}

/// What a pick did to the control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    /// Nothing happened (index out of range, pinned row not clickable).
    Ignored,
    /// The selection changed.
    Changed,
    /// The pinned row was activated.
    Pinned,
}

/// A dropdown with single or multiple selection.
///
/// # Examples
///
/// ```
/// use classdesk::domain::SelectOption;
/// use classdesk::popup::ListenerRegistry;
/// use classdesk::select::{SelectControl, SelectionMode, SelectOutcome};
///
/// let mut groups = SelectControl::new(
///     vec![SelectOption::plain("5A"), SelectOption::plain("5B")],
///     SelectionMode::Single,
///     ListenerRegistry::shared(),
/// )
/// .with_placeholder("Group");
///
/// assert_eq!(groups.button_label(), "Group");
/// groups.toggle();
/// assert_eq!(groups.pick(1), SelectOutcome::Changed);
/// assert_eq!(groups.button_label(), "5B");
/// assert!(!groups.is_open());
/// ```
#[derive(Debug)]
pub struct SelectControl {
    options: Vec<SelectOption>,
    state: SelectionState,
    placeholder: String,
    searchable: bool,
    search: String,
    pinned: Option<PinnedRow>,
    open: bool,
    panel: Option<Rect>,
    host: Option<NodeId>,
    dismissal: Dismissal,
}

impl SelectControl {
    /// Creates a closed control with an empty selection.
    #[must_use]
    pub fn new(options: Vec<SelectOption>, mode: SelectionMode, listeners: SharedListeners) -> Self {
        Self {
            options,
            state: SelectionState::empty(mode),
            placeholder: String::new(),
            searchable: false,
            search: String::new(),
            pinned: None,
            open: false,
            panel: None,
            host: None,
            dismissal: Dismissal::new(listeners),
        }
    }

    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Shows a search box above the options.
    #[must_use]
    pub const fn searchable(mut self) -> Self {
        self.searchable = true;
        self
    }

    #[must_use]
    pub fn with_pinned(mut self, label: impl Into<String>, clickable: bool) -> Self {
        self.pinned = Some(PinnedRow {
            label: label.into(),
            clickable,
        });
        self
    }

    /// Binds the control to its trigger node for outside-click detection.
    #[must_use]
    pub const fn with_host(mut self, host: NodeId) -> Self {
        self.host = Some(host);
        self
    }

    /// Rebinds the control after the screen layout changed.
    pub fn set_host(&mut self, host: NodeId) {
        self.host = Some(host);
    }

    /// Text shown on the trigger button: selected labels or the placeholder.
    #[must_use]
    pub fn button_label(&self) -> String {
        if self.state.is_empty() {
            self.placeholder.clone()
        } else {
            self.state.labels().join(LABEL_SEPARATOR)
        }
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Opens or closes the panel. Opening clears the search text.
    pub fn toggle(&mut self) {
        self.set_open(!self.open);
    }

    pub fn close(&mut self) {
        self.set_open(false);
    }

    fn set_open(&mut self, open: bool) {
        if open && !self.open {
            self.search.clear();
        }
        if !open {
            self.panel = None;
        }
        self.open = open;
        self.dismissal.sync(open);
        tracing::debug!(open, placeholder = %self.placeholder, "select panel toggled");
    }

    #[must_use]
    pub const fn is_searchable(&self) -> bool {
        self.searchable
    }

    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Replaces the search text. Ignored for non-searchable controls.
    pub fn set_search(&mut self, text: impl Into<String>) {
        if self.searchable {
            self.search = text.into();
        }
    }

    pub fn push_search(&mut self, ch: char) {
        if self.searchable {
            self.search.push(ch);
        }
    }

    pub fn pop_search(&mut self) {
        self.search.pop();
    }

    /// Options whose label contains the search text (case-sensitive).
    #[must_use]
    pub fn visible_options(&self) -> Vec<&SelectOption> {
        self.options
            .iter()
            .filter(|option| option.label().contains(self.search.as_str()))
            .collect()
    }

    /// Selects the option at `index` in [`visible_options`](Self::visible_options).
    ///
    /// Single-select controls close after a pick; multi-select controls stay
    /// open so several options can be toggled in a row.
    pub fn pick(&mut self, index: usize) -> SelectOutcome {
        let Some(option) = self.visible_options().get(index).map(|o| (*o).clone()) else {
            return SelectOutcome::Ignored;
        };
        self.state.select(option);
        if self.state.mode() == SelectionMode::Single {
            self.close();
        }
        SelectOutcome::Changed
    }

    /// Activates the pinned row, clearing the selection.
    pub fn pick_pinned(&mut self) -> SelectOutcome {
        if !self.pinned.as_ref().is_some_and(|row| row.clickable) {
            return SelectOutcome::Ignored;
        }
        self.state.clear();
        self.close();
        SelectOutcome::Pinned
    }

    /// Handles a pointer press anywhere on screen.
    ///
    /// Closes the panel when `target` lies outside the control's container.
    /// Returns `true` if the panel was closed.
    pub fn pointer_down(&mut self, tree: &NodeTree, target: NodeId) -> bool {
        let Some(host) = self.host else {
            return false;
        };
        if self.dismissal.should_close(tree, host, target) {
            self.close();
            return true;
        }
        false
    }

    /// Size the open panel needs: widest row plus padding, one row per
    /// visible option plus the search box and pinned row.
    #[must_use]
    pub fn panel_size(&self) -> Size {
        let visible = self.visible_options();
        let widest = visible
            .iter()
            .map(|o| o.label().width())
            .chain(self.pinned.iter().map(|p| p.label.width()))
            .chain(std::iter::once(self.placeholder.width()))
            .max()
            .unwrap_or(0);
        let extra_rows = usize::from(self.searchable) + usize::from(self.pinned.is_some());
        Size::new(widest + 4, visible.len() + extra_rows + 2)
    }

    /// Anchors the panel below `trigger`, kept inside `viewport`.
    pub fn place(&mut self, trigger: Rect, panel_size: Size, viewport: Rect) -> Rect {
        let rect = anchor_below(trigger, panel_size, viewport);
        self.panel = Some(rect);
        rect
    }

    /// Where the panel was last placed, while open.
    #[must_use]
    pub const fn panel(&self) -> Option<Rect> {
        self.panel
    }

    #[must_use]
    pub const fn pinned(&self) -> Option<&PinnedRow> {
        self.pinned.as_ref()
    }

    #[must_use]
    pub const fn selection(&self) -> &SelectionState {
        &self.state
    }

    /// Restores a selection, for example from the page URL.
    pub fn set_selection(&mut self, state: SelectionState) {
        self.state = state;
    }

    #[must_use]
    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    /// Replaces the option list once it has been fetched.
    pub fn set_options(&mut self, options: Vec<SelectOption>) {
        self.options = options;
    }

    #[must_use]
    pub fn is_selected(&self, option: &SelectOption) -> bool {
        self.state.is_selected(option)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::popup::{ListenerRegistry, Point};
    use pretty_assertions::assert_eq;
    use std::rc::Rc;

    fn subjects() -> Vec<SelectOption> {
        vec![
            SelectOption::keyed("1", "Math"),
            SelectOption::keyed("2", "Physics"),
            SelectOption::keyed("3", "Maths club"),
        ]
    }

    #[test]
    fn placeholder_until_something_is_picked() {
        let mut control = SelectControl::new(subjects(), SelectionMode::Multiple, ListenerRegistry::shared())
            .with_placeholder("Subject");
        assert_eq!(control.button_label(), "Subject");

        control.toggle();
        control.pick(0);
        control.pick(1);
        assert_eq!(control.button_label(), "Math, Physics");
        assert!(control.is_open());
    }

    #[test]
    fn search_filters_case_sensitively() {
        let mut control =
            SelectControl::new(subjects(), SelectionMode::Single, ListenerRegistry::shared()).searchable();
        control.toggle();
        control.set_search("Math");
        let labels: Vec<_> = control.visible_options().into_iter().map(SelectOption::label).collect();
        assert_eq!(labels, vec!["Math", "Maths club"]);

        control.set_search("math");
        assert!(control.visible_options().is_empty());
    }

    #[test]
    fn reopening_clears_search() {
        let mut control =
            SelectControl::new(subjects(), SelectionMode::Single, ListenerRegistry::shared()).searchable();
        control.toggle();
        control.push_search('P');
        control.toggle();
        control.toggle();
        assert_eq!(control.search(), "");
        assert_eq!(control.visible_options().len(), 3);
    }

    #[test]
    fn pick_indexes_visible_options() {
        let mut control =
            SelectControl::new(subjects(), SelectionMode::Single, ListenerRegistry::shared()).searchable();
        control.toggle();
        control.set_search("club");
        assert_eq!(control.pick(0), SelectOutcome::Changed);
        assert_eq!(control.button_label(), "Maths club");
        assert_eq!(control.pick(5), SelectOutcome::Ignored);
    }

    #[test]
    fn pinned_row_clears_selection() {
        let mut control = SelectControl::new(subjects(), SelectionMode::Multiple, ListenerRegistry::shared())
            .with_pinned("Remove filter", true);
        control.toggle();
        control.pick(0);
        assert_eq!(control.pick_pinned(), SelectOutcome::Pinned);
        assert!(control.selection().is_empty());
        assert!(!control.is_open());

        let mut caption = SelectControl::new(subjects(), SelectionMode::Single, ListenerRegistry::shared())
            .with_pinned("Pick a subject", false);
        assert_eq!(caption.pick_pinned(), SelectOutcome::Ignored);
    }

    #[test]
    fn outside_pointer_closes_and_detaches() {
        let listeners = ListenerRegistry::shared();
        let mut tree = NodeTree::new(Rect::new(0, 0, 80, 24));
        let container = tree.insert(tree.root(), Rect::new(0, 0, 20, 10));
        let trigger = tree.insert(container, Rect::new(0, 0, 20, 1));

        let mut control = SelectControl::new(subjects(), SelectionMode::Single, Rc::clone(&listeners))
            .with_host(trigger);
        control.toggle();
        assert_eq!(listeners.borrow().count(), 1);

        assert!(!control.pointer_down(&tree, tree.hit_test(Point::new(2, 0))));
        assert!(control.is_open());

        assert!(control.pointer_down(&tree, tree.hit_test(Point::new(60, 20))));
        assert!(!control.is_open());
        assert_eq!(listeners.borrow().count(), 0);
    }

    #[test]
    fn panel_never_overflows_viewport() {
        let viewport = Rect::new(0, 0, 40, 12);
        let mut control = SelectControl::new(subjects(), SelectionMode::Single, ListenerRegistry::shared());
        control.toggle();
        let size = control.panel_size();
        for trigger in [Rect::new(0, 0, 10, 1), Rect::new(35, 11, 5, 1), Rect::new(30, 8, 10, 1)] {
            let panel = control.place(trigger, size, viewport);
            assert!(panel.right() <= viewport.right());
            assert!(panel.bottom() <= viewport.bottom());
        }
    }
}
