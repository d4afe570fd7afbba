//! Per-row action menus.
//!
//! Rows may carry a small popup menu ("Edit", "Delete", ...). The menu opens
//! at the pointer press that requested it, or under the row's menu button when
//! opened from the keyboard. It runs the chosen action against the row's
//! record and closes on any pointer press outside the table.

use crate::domain::record::row_key;
use crate::domain::Record;
use crate::popup::{anchor_below, clamp_to_viewport, Dismissal, NodeId, NodeTree, Point, Rect, SharedListeners, Size};
use std::fmt;
use std::rc::Rc;
use unicode_width::UnicodeWidthStr;

/// Callback run for a chosen row action.
pub type ActionFn = Rc<dyn Fn(&Record)>;

/// Ordered `(label, action)` pairs offered for every row.
#[derive(Clone, Default)]
pub struct RowActions {
    actions: Vec<(String, ActionFn)>,
}

impl fmt::Debug for RowActions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.labels()).finish()
    }
}

impl RowActions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, label: impl Into<String>, action: impl Fn(&Record) + 'static) -> Self {
        self.actions.push((label.into(), Rc::new(action)));
        self
    }

    #[must_use]
    pub fn labels(&self) -> Vec<&str> {
        self.actions.iter().map(|(label, _)| label.as_str()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Runs action `index` against `record`. Returns `false` if there is no
    /// such action.
    pub fn run(&self, index: usize, record: &Record) -> bool {
        match self.actions.get(index) {
            Some((label, action)) => {
                tracing::debug!(action = %label, row = %row_key(record), "running row action");
                action(record);
                true
            }
            None => false,
        }
    }

    /// Size of the popup listing these actions.
    #[must_use]
    pub fn menu_size(&self) -> Size {
        let widest = self.actions.iter().map(|(label, _)| label.width()).max().unwrap_or(0);
        Size::new(widest + 4, self.actions.len() + 2)
    }
}

/// Where a row menu opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAnchor {
    /// Top-left corner at a pointer position.
    Pointer(Point),
    /// Directly under the row's menu button.
    Below(Rect),
}

/// Which row's action menu is open, and where.
#[derive(Debug)]
pub struct RowMenu {
    open_row: Option<String>,
    rect: Option<Rect>,
    host: Option<NodeId>,
    dismissal: Dismissal,
}

impl RowMenu {
    #[must_use]
    pub fn new(listeners: SharedListeners) -> Self {
        Self {
            open_row: None,
            rect: None,
            host: None,
            dismissal: Dismissal::new(listeners),
        }
    }

    /// Opens the menu for `row_key`, or closes it if that row's menu is
    /// already open.
    ///
    /// `host` is the node of the menu button; the menu closes on presses
    /// outside its parent.
    pub fn toggle(
        &mut self,
        row_key: &str,
        host: NodeId,
        anchor: MenuAnchor,
        size: Size,
        viewport: Rect,
    ) -> Option<Rect> {
        if self.open_row.as_deref() == Some(row_key) {
            self.close();
            return None;
        }

        let rect = match anchor {
            MenuAnchor::Pointer(origin) => clamp_to_viewport(origin, size, viewport),
            MenuAnchor::Below(button) => anchor_below(button, size, viewport),
        };
        self.open_row = Some(row_key.to_string());
        self.rect = Some(rect);
        self.host = Some(host);
        self.dismissal.sync(true);
        tracing::debug!(row = row_key, ?rect, "row menu opened");
        Some(rect)
    }

    pub fn close(&mut self) {
        self.open_row = None;
        self.rect = None;
        self.host = None;
        self.dismissal.sync(false);
    }

    /// Rebinds the open menu to its button after the screen layout changed.
    pub fn set_host(&mut self, host: NodeId) {
        if self.open_row.is_some() {
            self.host = Some(host);
        }
    }

    #[must_use]
    pub fn open_row(&self) -> Option<&str> {
        self.open_row.as_deref()
    }

    #[must_use]
    pub const fn rect(&self) -> Option<Rect> {
        self.rect
    }

    /// Runs action `index` for the open row and closes the menu.
    ///
    /// Returns `false` if no menu is open, the row is no longer among
    /// `records`, or the index is out of range.
    pub fn choose(&mut self, actions: &RowActions, index: usize, records: &[Record]) -> bool {
        let Some(key) = self.open_row.take() else {
            return false;
        };
        let ran = records
            .iter()
            .find(|record| row_key(record) == key)
            .is_some_and(|record| actions.run(index, record));
        self.close();
        ran
    }

    /// Closes the menu when `target` lies outside the menu button's container.
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::popup::ListenerRegistry;
    use serde_json::json;
    use std::cell::RefCell;

    const VIEWPORT: Rect = Rect::new(0, 0, 80, 24);
    const BUTTON: Rect = Rect::new(78, 3, 2, 1);

    #[test]
    fn runs_action_for_the_open_row() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        let actions = RowActions::new()
            .with("Edit", |_| {})
            .with("Delete", move |r| log.borrow_mut().push(r["id"].clone()));

        let records = vec![json!({ "id": 1 }), json!({ "id": 2 })];
        let mut tree = NodeTree::new(VIEWPORT);
        let row = tree.insert(tree.root(), Rect::new(0, 3, 80, 1));
        let button = tree.insert(row, Rect::new(78, 3, 2, 1));

        let mut menu = RowMenu::new(ListenerRegistry::shared());
        menu.toggle("2", button, MenuAnchor::Below(BUTTON), actions.menu_size(), VIEWPORT);
        assert_eq!(menu.open_row(), Some("2"));

        assert!(menu.choose(&actions, 1, &records));
        assert_eq!(*seen.borrow(), vec![json!(2)]);
        assert_eq!(menu.open_row(), None);
    }

    #[test]
    fn opens_at_pointer_inside_viewport() {
        let actions = RowActions::new().with("Edit", |_| {}).with("Archive", |_| {});

        let tree = NodeTree::new(VIEWPORT);
        let mut menu = RowMenu::new(ListenerRegistry::shared());
        let rect = menu
            .toggle(
                "1",
                tree.root(),
                MenuAnchor::Pointer(Point::new(78, 22)),
                actions.menu_size(),
                VIEWPORT,
            )
            .unwrap();
        assert!(rect.right() <= 80);
        assert!(rect.bottom() <= 24);
    }

    #[test]
    fn keyboard_anchor_opens_under_the_button() {
        let actions = RowActions::new().with("Edit", |_| {});
        let tree = NodeTree::new(VIEWPORT);
        let mut menu = RowMenu::new(ListenerRegistry::shared());

        let rect = menu
            .toggle("1", tree.root(), MenuAnchor::Below(BUTTON), actions.menu_size(), VIEWPORT)
            .unwrap();
        assert_eq!(rect, Rect::new(72, BUTTON.bottom(), 8, 3));
    }

    #[test]
    fn toggling_same_row_closes_and_detaches() {
        let listeners = ListenerRegistry::shared();
        let tree = NodeTree::new(VIEWPORT);
        let mut menu = RowMenu::new(Rc::clone(&listeners));
        let anchor = MenuAnchor::Pointer(Point::new(5, 5));

        menu.toggle("1", tree.root(), anchor, Size::new(10, 3), VIEWPORT);
        menu.toggle("2", tree.root(), anchor, Size::new(10, 3), VIEWPORT);
        assert_eq!(listeners.borrow().count(), 1);
        assert_eq!(menu.open_row(), Some("2"));

        menu.toggle("2", tree.root(), anchor, Size::new(10, 3), VIEWPORT);
        assert_eq!(listeners.borrow().count(), 0);
    }

    #[test]
    fn outside_press_closes() {
        let mut tree = NodeTree::new(VIEWPORT);
        let row = tree.insert(tree.root(), Rect::new(0, 3, 80, 1));
        let button = tree.insert(row, Rect::new(78, 3, 2, 1));
        let header = tree.insert(tree.root(), Rect::new(0, 0, 80, 1));

        let mut menu = RowMenu::new(ListenerRegistry::shared());
        menu.toggle("1", button, MenuAnchor::Below(BUTTON), Size::new(10, 3), VIEWPORT);
        assert!(!menu.pointer_down(&tree, row));
        assert!(menu.pointer_down(&tree, header));
        assert_eq!(menu.open_row(), None);
    }
}
