//! Relevance scoring for list-screen search.
//!
//! - [`config`]: declarative per-field rules ([`SearchConfig`])
//! - [`score`](mod@score): scoring one record and ranking a list

pub mod config;
pub mod score;

pub use config::{FieldRule, SearchConfig, TextRule};
pub use score::{rank, score, Score};
