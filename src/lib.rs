//! Classdesk: presentation core for a school administration dashboard.
//!
//! Classdesk provides:
//! - Declarative tables driven by a field mapping (labels, nested paths,
//!   array flattening, row actions, CSS-like classes)
//! - Dropdown selection controls with search, pinned rows and
//!   outside-press dismissal
//! - Weighted search scoring over nested records
//! - Calendar and date helpers (month matrix, localized formatting,
//!   whole-unit differences)
//! - A page layer that fetches through a background worker and renders
//!   ANSI frames

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! The crate follows a layered architecture pattern:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  CLI (main.rs)                                      │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← Page state
//! │  - Event handling                                   │
//! │  - Action dispatching                               │
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ Core          │   │ Services      │
//! │ (ui/)         │   │ table/ select/│   │ worker/ api/  │
//! │ - Rendering   │   │ search/ dates/│   │ storage/      │
//! │ - Theming     │   │ popup/        │   │ - HTTP, mock  │
//! │ - Components  │   │               │   │ - Local state │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Infrastructure & Domain Layers                     │
//! │  - Platform paths (infrastructure/)                 │
//! │  - Error types (domain/error)                       │
//! │  - Records and options (domain/record, option)      │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │
//! │  - JSON log lines to a rotating file                │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Page state machine with event/action model
//! - [`table`]: Field mappings and the table view
//! - [`select`]: Selection state and the dropdown control
//! - [`search`]: Search configuration and scoring
//! - [`dates`]: Month matrix, date formatting and differences
//! - [`popup`]: Anchored placement and outside-press dismissal
//! - [`api`]: HTTP client boundary and the mock backend
//! - [`worker`]: Background thread that talks to the API
//! - [`storage`]: Key/value persistence (tokens, latency knobs)
//! - [`ui`]: Terminal rendering with theme support
//! - [`observability`]: Tracing subscriber setup
//!
//! # Configuration
//!
//! Classdesk reads an optional TOML file:
//!
//! ```toml
//! api_base_url = "https://school.example/api/"
//! theme = "catppuccin-latte"
//! trace_level = "debug"
//! search_debounce_ms = 250
//!
//! [mock]
//! enabled = true
//! base_ms = 200
//! variance_ms = 300
//! fixtures = "~/classdesk/fixtures.json"
//! ```
//!
//! # Example
//!
//! ```rust
//! use classdesk::app::PageConfig;
//! use classdesk::table::FieldMapping;
//! use classdesk::{handle_event, initialize, Config, Event};
//!
//! let page = PageConfig::new("Students", "students", FieldMapping::new().label("name", "Name"));
//! let mut state = initialize(&Config::default(), page);
//!
//! let (render, actions) = handle_event(&mut state, &Event::Mounted)?;
//! assert!(render);
//! assert!(!actions.is_empty());
//! # Ok::<(), classdesk::DeskError>(())
//! ```

pub mod api;
pub mod app;
pub mod dates;
pub mod domain;
pub mod infrastructure;
pub mod popup;
pub mod search;
pub mod select;
pub mod storage;
pub mod table;
pub mod worker;

pub mod ui;

pub mod observability;

pub use app::{handle_event, Action, AppState, Event, InputMode, PageConfig, Runtime};
pub use domain::{DeskError, Result};
pub use ui::Theme;

use api::{ApiClient, HttpTransport, MockApi, Transport, DEFAULT_TIMEOUT};
use domain::Record;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use storage::settings::{MOCK_LATENCY_BASE, MOCK_LATENCY_VARIANCE};
use storage::{KeyValueStore, LatencyConfig, TokenStore};

/// File inside the data directory that backs [`storage::JsonStorage`].
pub const STATE_FILE_NAME: &str = "state.json";

/// Mock backend settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MockConfig {
    /// Serve requests from memory instead of `api_base_url`.
    pub enabled: bool,
    pub base_ms: u64,
    pub variance_ms: u64,
    /// JSON file mapping collection names to record arrays.
    pub fixtures: Option<String>,
}

/// Application configuration, usually read from a TOML file.
///
/// Every field has a default, so an empty file is a valid configuration.
///
/// # Example
///
/// ```rust
/// use classdesk::Config;
///
/// let config = Config::from_toml_str("theme = \"catppuccin-latte\"\nskeleton_rows = 4")?;
/// assert_eq!(config.theme.as_deref(), Some("catppuccin-latte"));
/// assert_eq!(config.skeleton_rows, 4);
/// assert_eq!(config.search_debounce_ms, 300);
/// # Ok::<(), classdesk::DeskError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL every API path is joined onto.
    pub api_base_url: String,

    /// Where `state.json` and the log file live.
    ///
    /// A leading `~` is expanded. Default: the XDG data directory.
    pub data_dir: Option<String>,

    /// Built-in theme name to use.
    ///
    /// Options: `catppuccin-mocha`, `catppuccin-latte`, `catppuccin-frappe`,
    /// `catppuccin-macchiato`. Ignored if `theme_file` is set.
    pub theme: Option<String>,

    /// Path to a custom TOML theme file.
    ///
    /// Takes precedence over `theme`. See [`ui::theme`] for format.
    pub theme_file: Option<String>,

    /// Tracing level.
    ///
    /// Options: `trace`, `debug`, `info`, `warn`, `error`, or any
    /// `EnvFilter` directive. `RUST_LOG` wins when set. Default: `"info"`
    pub trace_level: Option<String>,

    /// Quiet period before a typed search query is applied.
    pub search_debounce_ms: u64,

    /// Placeholder rows drawn while a list is loading.
    pub skeleton_rows: usize,

    pub mock: MockConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000/api/".to_string(),
            data_dir: None,
            theme: None,
            theme_file: None,
            trace_level: None,
            search_debounce_ms: app::DEFAULT_SEARCH_DEBOUNCE.as_millis().try_into().unwrap_or(300),
            skeleton_rows: 8,
            mock: MockConfig::default(),
        }
    }
}

impl Config {
    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`DeskError::Config`] on invalid TOML or mistyped values.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| DeskError::Config(e.to_string()))
    }

    /// Reads and parses a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`DeskError::Config`] if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| DeskError::Config(format!("failed to read {}: {e}", path.display())))?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            DeskError::Config(message) => DeskError::Config(format!("{}: {message}", path.display())),
            other => other,
        })
    }

    /// Resolved data directory.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.as_deref().map_or_else(infrastructure::default_data_dir, |dir| {
            PathBuf::from(infrastructure::expand_tilde(dir))
        })
    }

    #[must_use]
    pub fn state_file(&self) -> PathBuf {
        self.data_dir().join(STATE_FILE_NAME)
    }

    #[must_use]
    pub const fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    /// Loads the theme: `theme_file`, then `theme`, then the default.
    ///
    /// Failures are logged and fall back to the default theme.
    #[must_use]
    pub fn theme(&self) -> Theme {
        self.theme_file.as_ref().map_or_else(
            || {
                self.theme.as_ref().map_or_else(Theme::default, |theme_name| {
                    Theme::from_name(theme_name).unwrap_or_else(|| {
                        tracing::debug!(theme_name = %theme_name, "failed to load theme, using default");
                        Theme::default()
                    })
                })
            },
            |theme_file| {
                Theme::from_file(infrastructure::expand_tilde(theme_file)).unwrap_or_else(|e| {
                    tracing::debug!(theme_file = %theme_file, error = %e, "failed to load theme from file, using default");
                    Theme::default()
                })
            },
        )
    }

    /// Mock latency: persisted knobs when either key is stored, otherwise
    /// the `[mock]` section.
    ///
    /// # Errors
    ///
    /// Returns [`DeskError::Storage`] if a stored value is not a number.
    pub fn latency(&self, store: &dyn KeyValueStore) -> Result<LatencyConfig> {
        if store.get(MOCK_LATENCY_BASE).is_some() || store.get(MOCK_LATENCY_VARIANCE).is_some() {
            return LatencyConfig::load(store);
        }
        Ok(LatencyConfig::new(self.mock.base_ms, self.mock.variance_ms))
    }

    /// Builds the API client, with stored tokens attached.
    ///
    /// The transport is the mock backend when `mock.enabled`, otherwise
    /// HTTP against `api_base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the fixtures cannot be loaded, a latency value is
    /// malformed, or the HTTP client cannot be built.
    pub fn client(&self, store: &dyn KeyValueStore) -> Result<ApiClient> {
        let transport: Box<dyn Transport> = if self.mock.enabled {
            let mut mock = MockApi::new(self.latency(store)?);
            if let Some(path) = &self.mock.fixtures {
                for (name, records) in load_fixtures(Path::new(&infrastructure::expand_tilde(path)))? {
                    mock = mock.with_collection(name, records);
                }
            }
            tracing::debug!("using mock backend");
            Box::new(mock)
        } else {
            Box::new(HttpTransport::new(DEFAULT_TIMEOUT)?)
        };
        Ok(ApiClient::new(self.api_base_url.clone(), transport, TokenStore::load(store)))
    }
}

fn load_fixtures(path: &Path) -> Result<BTreeMap<String, Vec<Record>>> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| DeskError::Config(format!("failed to read fixtures {}: {e}", path.display())))?;
    serde_json::from_str(&contents)
        .map_err(|e| DeskError::Config(format!("invalid fixtures {}: {e}", path.display())))
}

/// Creates the page state with the configured theme, debounce and
/// skeleton size.
///
/// # Example
///
/// ```rust
/// use classdesk::app::PageConfig;
/// use classdesk::table::FieldMapping;
/// use classdesk::{initialize, Config};
///
/// let config = Config {
///     skeleton_rows: 3,
///     ..Default::default()
/// };
/// let state = initialize(&config, PageConfig::new("Payments", "payments", FieldMapping::new()));
/// assert_eq!(state.page.skeleton_rows, 3);
/// ```
#[must_use]
pub fn initialize(config: &Config, page: PageConfig) -> AppState {
    let _span = tracing::debug_span!("initialize", resource = %page.resource).entered();

    let page = page
        .with_debounce(config.search_debounce())
        .with_skeleton_rows(config.skeleton_rows);
    AppState::new(page, config.theme())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(Config::from_toml_str("").unwrap(), Config::default());
    }

    #[test]
    fn mock_section_parses() {
        let config = Config::from_toml_str("[mock]\nenabled = true\nbase_ms = 200\nvariance_ms = 50\n").unwrap();
        assert!(config.mock.enabled);
        assert_eq!(config.latency(&MemoryStore::default()).unwrap(), LatencyConfig::new(200, 50));
    }

    #[test]
    fn bad_toml_is_a_config_error() {
        let err = Config::from_toml_str("skeleton_rows = \"many\"").unwrap_err();
        assert!(matches!(err, DeskError::Config(_)));
    }

    #[test]
    fn stored_latency_overrides_config() {
        let config = Config {
            mock: MockConfig {
                base_ms: 10,
                ..MockConfig::default()
            },
            ..Config::default()
        };
        let mut store = MemoryStore::default();
        LatencyConfig::new(500, 100).save(&mut store).unwrap();
        assert_eq!(config.latency(&store).unwrap(), LatencyConfig::new(500, 100));
    }

    #[test]
    fn explicit_data_dir_is_used() {
        let config = Config {
            data_dir: Some("/tmp/classdesk-test".to_string()),
            ..Config::default()
        };
        assert_eq!(config.state_file(), PathBuf::from("/tmp/classdesk-test/state.json"));
    }

    #[test]
    fn mock_client_serves_fixtures() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fixtures.json");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(br#"{"students": [{"id": 1, "name": "Anna"}]}"#).unwrap();

        let config = Config {
            mock: MockConfig {
                enabled: true,
                fixtures: Some(path.display().to_string()),
                ..MockConfig::default()
            },
            ..Config::default()
        };
        let client = config.client(&MemoryStore::default()).unwrap();
        let records = client.list("students", &[]).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn initialize_applies_config() {
        let config = Config {
            search_debounce_ms: 50,
            theme: Some("catppuccin-latte".to_string()),
            ..Config::default()
        };
        let state = initialize(&config, PageConfig::new("Students", "students", table::FieldMapping::new()));
        assert_eq!(state.page.debounce, Duration::from_millis(50));
        assert_eq!(state.theme.name, "catppuccin-latte");
    }
}
