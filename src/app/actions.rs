//! Actions representing side effects to be executed by the page runtime.
//!
//! The event handler never performs I/O itself. It returns a `Vec<Action>`
//! after each event, and the runtime executes them in order: posting fetches
//! to the worker thread and mirroring filter values into the page URL.
//!
//! # Example
//!
//! ```rust
//! use classdesk::app::Action;
//! use classdesk::worker::{ListTarget, WorkerMessage};
//!
//! let actions = vec![
//!     Action::PostToWorker(WorkerMessage::fetch_list(1, ListTarget::Records, "students".into(), vec![])),
//!     Action::PushUrl("day=%5B%22Mon%22%5D".into()),
//! ];
//! assert_eq!(actions.len(), 2);
//! ```

use crate::worker::WorkerMessage;

/// Commands produced by the event handler for the runtime to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Posts a message to the background fetch worker.
    PostToWorker(WorkerMessage),

    /// Replaces the query string of the page URL.
    ///
    /// Carries the encoded filter state without the leading `?`; an empty
    /// string clears the query.
    PushUrl(String),
}
