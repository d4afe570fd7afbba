//! Key/value store abstraction.
//!
//! Everything the dashboard keeps between runs (auth tokens, debug latency
//! knobs) is a string under a fixed key, the same model as browser local
//! storage. The [`KeyValueStore`] trait hides where those strings live so the
//! API client and the CLI can be tested against [`MemoryStore`].

use crate::domain::error::Result;
use std::collections::BTreeMap;

/// String key/value persistence.
///
/// # Implementations
///
/// - [`JsonStorage`](super::JsonStorage): JSON file with atomic writes (default)
/// - [`MemoryStore`]: in-process map, nothing persisted
///
/// # Examples
///
/// ```
/// use classdesk::storage::{KeyValueStore, MemoryStore};
///
/// let mut store = MemoryStore::default();
/// store.set("access_token", "abc")?;
/// assert_eq!(store.get("access_token").as_deref(), Some("abc"));
/// # Ok::<(), classdesk::domain::DeskError>(())
/// ```
pub trait KeyValueStore: Send {
    /// Returns the value stored under `key`.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be persisted.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the change cannot be persisted.
    fn remove(&mut self, key: &str) -> Result<()>;

    /// All stored keys in sorted order.
    fn keys(&self) -> Vec<String>;
}

/// Non-persistent store, used in tests and when no data directory exists.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }
}
