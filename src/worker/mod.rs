//! Background fetch worker.
//!
//! Network calls run on one worker thread so page state stays
//! single-threaded. Requests and responses are tagged with the page's
//! generation counter; see [`messages`].
//!
//! - `messages`: request/response protocol
//! - `handler`: message processing and the worker thread

pub mod handler;
pub mod messages;

pub use handler::{spawn, FetchWorker, WorkerHandle};
pub use messages::{ListTarget, WorkerMessage, WorkerResponse};
