//! Local persisted state.
//!
//! A string key/value store standing in for browser local storage, plus typed
//! accessors for the keys the dashboard uses.
//!
//! # Modules
//!
//! - `backend`: the [`KeyValueStore`] trait and an in-memory implementation
//! - `json`: JSON file implementation with atomic writes
//! - `settings`: auth tokens and mock latency keys

pub mod backend;
pub mod json;
pub mod settings;

pub use backend::{KeyValueStore, MemoryStore};
pub use json::JsonStorage;
pub use settings::{LatencyConfig, TokenStore};
