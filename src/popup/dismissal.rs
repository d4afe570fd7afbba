//! Outside-click dismissal for popups.
//!
//! A popup (a select panel, a row action menu) must close when the user
//! points anywhere outside the component that owns it. The screen keeps a
//! [`NodeTree`] of component rectangles and one shared [`ListenerRegistry`]
//! standing in for document-level pointer listeners. Each popup owns a
//! [`Dismissal`] handle that holds at most one listener while the popup is
//! open.

use super::geometry::{Point, Rect};
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

/// Handle to a node in a [`NodeTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    rect: Rect,
    depth: usize,
}

/// Component hierarchy of a screen with the rectangle each component covers.
#[derive(Debug, Clone)]
pub struct NodeTree {
    nodes: Vec<Node>,
}

impl NodeTree {
    /// Creates a tree whose root covers the whole viewport.
    #[must_use]
    pub fn new(viewport: Rect) -> Self {
        Self {
            nodes: vec![Node {
                parent: None,
                rect: viewport,
                depth: 0,
            }],
        }
    }

    /// The root node.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Adds a child node.
    pub fn insert(&mut self, parent: NodeId, rect: Rect) -> NodeId {
        let depth = self.nodes.get(parent.0).map_or(0, |p| p.depth + 1);
        self.nodes.push(Node {
            parent: Some(parent),
            rect,
            depth,
        });
        NodeId(self.nodes.len() - 1)
    }

    /// Moves or resizes a node.
    pub fn set_rect(&mut self, id: NodeId, rect: Rect) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.rect = rect;
        }
    }

    /// The rectangle covered by a node.
    #[must_use]
    pub fn rect(&self, id: NodeId) -> Option<Rect> {
        self.nodes.get(id.0).map(|n| n.rect)
    }

    /// The parent of a node, `None` for the root.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0).and_then(|n| n.parent)
    }

    /// Returns `true` if `node` is `ancestor` or lies inside its subtree.
    #[must_use]
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Finds the node a pointer event at `point` targets.
    ///
    /// The deepest node containing the point wins; among nodes of equal depth
    /// the one inserted last (drawn on top) wins. Falls back to the root.
    #[must_use]
    pub fn hit_test(&self, point: Point) -> NodeId {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.rect.contains(point))
            .max_by_key(|(index, node)| (node.depth, *index))
            .map_or(self.root(), |(index, _)| NodeId(index))
    }
}

/// Identifier of an attached pointer listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// Document-level pointer listeners of one screen.
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    next: u64,
    active: BTreeSet<ListenerId>,
}

/// Registry shared by every popup on a screen.
pub type SharedListeners = Rc<RefCell<ListenerRegistry>>;

impl ListenerRegistry {
    /// Creates an empty registry ready to be shared.
    #[must_use]
    pub fn shared() -> SharedListeners {
        Rc::new(RefCell::new(Self::default()))
    }

    fn attach(&mut self) -> ListenerId {
        self.next += 1;
        let id = ListenerId(self.next);
        self.active.insert(id);
        id
    }

    fn detach(&mut self, id: ListenerId) {
        self.active.remove(&id);
    }

    /// Number of listeners currently attached.
    #[must_use]
    pub fn count(&self) -> usize {
        self.active.len()
    }
}

/// Outside-click listener bookkeeping for one popup.
///
/// The listener is attached on the closed → open transition and detached on
/// open → closed or when the handle is dropped, so reopening a popup never
/// accumulates listeners.
#[derive(Debug)]
pub struct Dismissal {
    listeners: SharedListeners,
    handle: Option<ListenerId>,
}

impl Dismissal {
    #[must_use]
    pub fn new(listeners: SharedListeners) -> Self {
        Self {
            listeners,
            handle: None,
        }
    }

    /// Brings the listener in line with the popup's open state.
    pub fn sync(&mut self, open: bool) {
        match (open, self.handle) {
            (true, None) => {
                let id = self.listeners.borrow_mut().attach();
                tracing::trace!(listener = ?id, "outside-click listener attached");
                self.handle = Some(id);
            }
            (false, Some(id)) => {
                self.listeners.borrow_mut().detach(id);
                tracing::trace!(listener = ?id, "outside-click listener detached");
                self.handle = None;
            }
            _ => {}
        }
    }

    /// Returns `true` while a listener is attached.
    #[must_use]
    pub const fn is_listening(&self) -> bool {
        self.handle.is_some()
    }

    /// Decides whether a pointer event on `target` should close the popup.
    ///
    /// Only fires while listening, and only for targets outside the parent
    /// container of `host` (the node the popup is attached to).
    #[must_use]
    pub fn should_close(&self, tree: &NodeTree, host: NodeId, target: NodeId) -> bool {
        if !self.is_listening() {
            return false;
        }
        let container = tree.parent(host).unwrap_or(host);
        !tree.contains(container, target)
    }
}

impl Drop for Dismissal {
    fn drop(&mut self) {
        self.sync(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen() -> (NodeTree, NodeId, NodeId, NodeId) {
        let mut tree = NodeTree::new(Rect::new(0, 0, 80, 24));
        let root = tree.root();
        let control = tree.insert(root, Rect::new(0, 0, 20, 10));
        let trigger = tree.insert(control, Rect::new(0, 0, 20, 1));
        let elsewhere = tree.insert(root, Rect::new(40, 0, 20, 10));
        (tree, control, trigger, elsewhere)
    }

    #[test]
    fn reopening_never_accumulates_listeners() {
        let listeners = ListenerRegistry::shared();
        let mut dismissal = Dismissal::new(Rc::clone(&listeners));

        for _ in 0..3 {
            dismissal.sync(true);
            dismissal.sync(true);
            assert_eq!(listeners.borrow().count(), 1);
            dismissal.sync(false);
            assert_eq!(listeners.borrow().count(), 0);
        }
    }

    #[test]
    fn drop_detaches() {
        let listeners = ListenerRegistry::shared();
        {
            let mut dismissal = Dismissal::new(Rc::clone(&listeners));
            dismissal.sync(true);
            assert_eq!(listeners.borrow().count(), 1);
        }
        assert_eq!(listeners.borrow().count(), 0);
    }

    #[test]
    fn closes_only_for_outside_targets() {
        let (tree, control, trigger, elsewhere) = screen();
        let mut dismissal = Dismissal::new(ListenerRegistry::shared());
        dismissal.sync(true);

        assert!(!dismissal.should_close(&tree, trigger, trigger));
        assert!(!dismissal.should_close(&tree, trigger, control));
        assert!(dismissal.should_close(&tree, trigger, elsewhere));
        assert!(dismissal.should_close(&tree, trigger, tree.root()));
    }

    #[test]
    fn closed_popup_ignores_events() {
        let (tree, _, trigger, elsewhere) = screen();
        let dismissal = Dismissal::new(ListenerRegistry::shared());
        assert!(!dismissal.should_close(&tree, trigger, elsewhere));
    }

    #[test]
    fn hit_test_prefers_deepest_node() {
        let (tree, control, trigger, elsewhere) = screen();
        assert_eq!(tree.hit_test(Point::new(3, 0)), trigger);
        assert_eq!(tree.hit_test(Point::new(3, 5)), control);
        assert_eq!(tree.hit_test(Point::new(45, 5)), elsewhere);
        assert_eq!(tree.hit_test(Point::new(70, 20)), tree.root());
    }
}
