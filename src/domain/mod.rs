//! Domain layer for classdesk.
//!
//! This module contains the core data types shared by every component,
//! independent of rendering, storage, or transport concerns.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`record`]: Records as delivered by the API and their display helpers
//! - [`option`]: Options shown by selection controls
//!
//! # Examples
//!
//! ```
//! use classdesk::domain::{record, SelectOption};
//! use serde_json::json;
//!
//! let student = json!({ "id": 7, "name": "Anna" });
//! assert_eq!(record::row_key(&student), "7");
//!
//! let group = SelectOption::keyed("g1", "Group 1");
//! assert_eq!(group.label(), "Group 1");
//! ```

pub mod error;
pub mod option;
pub mod record;

pub use error::{DeskError, Result};
pub use option::SelectOption;
pub use record::Record;
