//! Infrastructure layer for filesystem and environment interactions.
//!
//! Resolves where classdesk keeps its files: the persisted key/value state,
//! the log file, and paths given with a leading `~`.

pub mod paths;

pub use paths::{default_data_dir, expand_tilde};
