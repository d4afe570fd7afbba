//! HTTP client boundary.
//!
//! - [`transport`]: the [`Transport`] trait and the reqwest implementation
//! - [`client`]: [`ApiClient`], auth headers and status handling
//! - [`mock`]: an in-memory backend with configurable latency

pub mod client;
pub mod mock;
pub mod transport;

pub use client::ApiClient;
pub use mock::MockApi;
pub use transport::{build_url, ApiRequest, ApiResponse, HttpTransport, Method, Transport, DEFAULT_TIMEOUT};
