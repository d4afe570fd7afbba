//! Declarative tables.
//!
//! A list screen describes its columns once as a [`FieldMapping`] and hands
//! records to [`build_table`], which produces a [`TableView`] ready for the
//! renderer. Columns can be plain fields, nested objects spliced inline,
//! joins of sibling fields, or computed by a closure.
//!
//! - [`mapping`]: column declarations, in code or from configuration
//! - [`view`]: building rows and cells, loading skeletons, cell classes
//! - [`actions`]: per-row popup menus

pub mod actions;
pub mod mapping;
pub mod view;

pub use actions::{ActionFn, MenuAnchor, RowActions, RowMenu};
pub use mapping::{ComputeFn, Directive, FieldMapping, DEFAULT_JOIN_SEPARATOR};
pub use view::{
    build_table, Cell, ClassFn, SkeletonRow, TableBody, TableOptions, TableRow, TableView, DEFAULT_SKELETON_ROWS,
    SKELETON_STAGGER_MS,
};
