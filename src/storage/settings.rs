//! Typed access to the fixed persisted keys.

use crate::domain::error::{DeskError, Result};
use crate::storage::backend::KeyValueStore;

pub const ACCESS_TOKEN: &str = "access_token";
pub const REFRESH_TOKEN: &str = "refresh_token";
pub const MOCK_LATENCY_BASE: &str = "mock_latency_base";
pub const MOCK_LATENCY_VARIANCE: &str = "mock_latency_variance";

/// Auth tokens as persisted between runs.
///
/// Obtaining tokens (login) happens elsewhere; this type only carries them
/// to the API client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenStore {
    pub access: Option<String>,
    pub refresh: Option<String>,
}

impl TokenStore {
    #[must_use]
    pub fn with_access(token: impl Into<String>) -> Self {
        Self {
            access: Some(token.into()),
            refresh: None,
        }
    }

    /// Reads both tokens. Missing or empty values are `None`.
    #[must_use]
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let read = |key| store.get(key).filter(|v| !v.is_empty());
        Self {
            access: read(ACCESS_TOKEN),
            refresh: read(REFRESH_TOKEN),
        }
    }

    /// Writes both tokens, removing keys for tokens that are unset.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot persist the change.
    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<()> {
        for (key, value) in [(ACCESS_TOKEN, &self.access), (REFRESH_TOKEN, &self.refresh)] {
            match value {
                Some(token) => store.set(key, token)?,
                None => store.remove(key)?,
            }
        }
        Ok(())
    }

    /// Value for the `Authorization` header, if a token is stored.
    #[must_use]
    pub fn bearer(&self) -> Option<String> {
        self.access.as_ref().map(|token| format!("Bearer {token}"))
    }
}

/// Artificial latency applied by the mock API.
///
/// Each request waits `base_ms` plus a uniformly random extra in
/// `0..=variance_ms`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LatencyConfig {
    pub base_ms: u64,
    pub variance_ms: u64,
}

impl LatencyConfig {
    #[must_use]
    pub const fn new(base_ms: u64, variance_ms: u64) -> Self {
        Self { base_ms, variance_ms }
    }

    /// Reads the latency keys. Missing keys count as zero.
    ///
    /// # Errors
    ///
    /// Returns [`DeskError::Storage`] if a stored value is not a number.
    pub fn load(store: &dyn KeyValueStore) -> Result<Self> {
        let read = |key: &str| -> Result<u64> {
            store.get(key).map_or(Ok(0), |raw| {
                raw.trim()
                    .parse()
                    .map_err(|e| DeskError::Storage(format!("invalid `{key}` value {raw:?}: {e}")))
            })
        };
        Ok(Self {
            base_ms: read(MOCK_LATENCY_BASE)?,
            variance_ms: read(MOCK_LATENCY_VARIANCE)?,
        })
    }

    /// Writes the latency keys.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot persist the change.
    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<()> {
        store.set(MOCK_LATENCY_BASE, &self.base_ms.to_string())?;
        store.set(MOCK_LATENCY_VARIANCE, &self.variance_ms.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use pretty_assertions::assert_eq;

    #[test]
    fn tokens_round_trip_and_clear() {
        let mut store = MemoryStore::default();
        let tokens = TokenStore {
            access: Some("a".into()),
            refresh: Some("r".into()),
        };
        tokens.save(&mut store).unwrap();
        assert_eq!(TokenStore::load(&store), tokens);

        TokenStore::default().save(&mut store).unwrap();
        assert!(store.keys().is_empty());
    }

    #[test]
    fn bearer_header() {
        assert_eq!(TokenStore::with_access("xyz").bearer().as_deref(), Some("Bearer xyz"));
        assert_eq!(TokenStore::default().bearer(), None);
    }

    #[test]
    fn latency_defaults_to_zero_and_rejects_garbage() {
        let mut store = MemoryStore::default();
        assert_eq!(LatencyConfig::load(&store).unwrap(), LatencyConfig::default());

        LatencyConfig::new(300, 50).save(&mut store).unwrap();
        assert_eq!(LatencyConfig::load(&store).unwrap(), LatencyConfig::new(300, 50));

        store.set(MOCK_LATENCY_BASE, "fast").unwrap();
        assert!(matches!(LatencyConfig::load(&store), Err(DeskError::Storage(_))));
    }
}
