//! Dropdown selection controls.
//!
//! - [`state`]: what is selected, single or multiple
//! - [`control`]: the dropdown itself (search box, pinned row, panel)

pub mod control;
pub mod state;

pub use control::{PinnedRow, SelectControl, SelectOutcome, LABEL_SEPARATOR};
pub use state::{SelectionMode, SelectionState};
