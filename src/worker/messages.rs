//! Worker thread message types.
//!
//! Requests and responses between a page and its background fetch worker.
//! Every request carries the page's generation counter and every response
//! echoes it back, so a page can drop answers to requests it no longer cares
//! about (it re-fetched, or it was unmounted).

use crate::domain::Record;
use serde::{Deserialize, Serialize};

/// Which list on a page a fetch fills.
///
/// The main table is [`ListTarget::Records`]; option lists for filter
/// controls are keyed by filter id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ListTarget {
    Records,
    FilterOptions(String),
}

/// Generates builder methods that take the generation first.
macro_rules! worker_message_builders {
    (
        $(
            $builder_name:ident($variant:ident { $($field:ident: $ty:ty),* $(,)? })
        ),* $(,)?
    ) => {
        impl WorkerMessage {
            $(
                #[doc = concat!("Create a ", stringify!($variant), " message for `generation`")]
                #[must_use]
                pub fn $builder_name(generation: u64, $($field: $ty),*) -> Self {
                    Self::$variant {
                        generation,
                        $($field,)*
                    }
                }
            )*
        }
    };
}

worker_message_builders! {
    fetch_list(FetchList { target: ListTarget, resource: String, query: Vec<(String, String)> }),
    delete_record(DeleteRecord { resource: String, id: String }),
}

/// Messages sent from a page to its worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerMessage {
    /// Fetch a list resource with query parameters.
    FetchList {
        generation: u64,
        target: ListTarget,
        /// Resource path below the API base URL (`students`).
        resource: String,
        query: Vec<(String, String)>,
    },

    /// Delete one record of a resource.
    DeleteRecord {
        generation: u64,
        resource: String,
        id: String,
    },

    /// Stop the worker thread.
    Shutdown,
}

impl WorkerMessage {
    /// Generation this request belongs to; `None` for control messages.
    #[must_use]
    pub const fn generation(&self) -> Option<u64> {
        match self {
            Self::FetchList { generation, .. } | Self::DeleteRecord { generation, .. } => Some(*generation),
            Self::Shutdown => None,
        }
    }
}

/// Responses sent from the worker back to the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorkerResponse {
    /// A list was fetched.
    ListLoaded {
        generation: u64,
        target: ListTarget,
        records: Vec<Record>,
    },

    /// A record was deleted.
    RecordDeleted {
        generation: u64,
        resource: String,
        id: String,
    },

    /// The request failed.
    Error {
        generation: u64,
        /// The list the failed request was meant to fill, if any.
        target: Option<ListTarget>,
        /// Human-readable error message.
        message: String,
    },
}

impl WorkerResponse {
    #[must_use]
    pub const fn generation(&self) -> u64 {
        match self {
            Self::ListLoaded { generation, .. }
            | Self::RecordDeleted { generation, .. }
            | Self::Error { generation, .. } => *generation,
        }
    }
}
