//! Popup primitives shared by select panels and row action menus.
//!
//! - [`geometry`]: points, rectangles, anchored and clamped placement
//! - [`dismissal`]: component tree hit-testing and outside-click dismissal

pub mod dismissal;
pub mod geometry;

pub use dismissal::{Dismissal, ListenerRegistry, NodeId, NodeTree, SharedListeners};
pub use geometry::{anchor_below, clamp_to_viewport, Point, PointerTracker, Rect, Size};
