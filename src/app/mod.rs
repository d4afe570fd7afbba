//! Application layer coordinating page state, events, and actions.
//!
//! This module sits between the terminal front end (main.rs) and the
//! domain/select/table/worker layers. It implements the event-driven loop of
//! a list page: a table of API records with filters, a debounced search box
//! and per-row action menus.
//!
//! # Architecture
//!
//! The application layer follows a unidirectional data flow pattern:
//!
//! ```text
//! User Input → Events → Event Handler → State Mutations → Actions → Side Effects
//!                           ↑                                  ↓
//!                           └──────── Worker Responses ────────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`debounce`]: Timestamp-driven debouncing of search input
//! - [`filters`]: Filter values mirrored into the page URL
//! - [`handler`]: Event processing logic and state transition coordinator
//! - [`modes`]: Input focus and load state types
//! - [`page`]: Declarative page configuration
//! - [`runtime`]: Executes actions against the worker thread
//! - [`state`]: Central page state container and view model computation
//!
//! # Example
//!
//! ```rust
//! use classdesk::app::{handle_event, AppState, Event, PageConfig};
//! use classdesk::table::FieldMapping;
//! use classdesk::ui::Theme;
//!
//! let page = PageConfig::new("Groups", "groups", FieldMapping::new().label("title", "Title"));
//! let mut state = AppState::new(page, Theme::default());
//! let (_render, _actions) = handle_event(&mut state, &Event::KeyDown)?;
//! # Ok::<(), classdesk::DeskError>(())
//! ```

pub mod actions;
pub mod debounce;
pub mod filters;
pub mod handler;
pub mod modes;
pub mod page;
pub mod runtime;
pub mod state;

pub use actions::Action;
pub use debounce::Debouncer;
pub use filters::FilterState;
pub use handler::{handle_event, Event};
pub use modes::{InputMode, LoadState};
pub use page::{FilterSource, FilterSpec, PageConfig, DEFAULT_SEARCH_DEBOUNCE};
pub use runtime::Runtime;
pub use state::{AppState, HitTarget};
