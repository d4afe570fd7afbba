//! Structured logging to a rotating JSON file.
//!
//! # Architecture
//!
//! ```text
//! tracing macros → EnvFilter → fmt JSON layer → FileWriter → classdesk.log
//! ```
//!
//! # Features
//!
//! - **File-Based Output**: Events written to `<data_dir>/classdesk.log`
//! - **Automatic Rotation**: Files rotate at 10MB with 3-backup retention
//! - **JSON Lines**: One object per event, with the enclosing span
//!
//! # Configuration
//!
//! Level is controlled via:
//! 1. `RUST_LOG` environment variable (highest priority)
//! 2. `trace_level` config option
//! 3. Default: `"info"`
//!
//! # Modules
//!
//! - [`init`]: Tracing initialization and subscriber setup
//! - [`file_writer`]: Rotating file writer with size-based rotation

pub mod file_writer;
pub mod init;

pub use file_writer::FileWriter;
pub use init::{init_tracing, LOG_FILE_NAME};
