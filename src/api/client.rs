//! The dashboard's API client.

use super::transport::{ApiRequest, Method, Transport};
use crate::domain::error::{DeskError, Result};
use crate::domain::Record;
use crate::storage::TokenStore;
use serde_json::Value;

/// Talks to the school backend through a [`Transport`].
///
/// Every request carries `Authorization: Bearer <token>` when an access
/// token is stored. Responses outside `200..300` become
/// [`DeskError::Api`]; list calls surface those errors instead of
/// pretending the list is empty.
///
/// # Examples
///
/// ```
/// use classdesk::api::{ApiClient, MockApi};
/// use classdesk::storage::{LatencyConfig, TokenStore};
/// use serde_json::json;
///
/// let mock = MockApi::new(LatencyConfig::default())
///     .with_collection("groups", vec![json!({ "id": 1, "title": "5A" })]);
/// let client = ApiClient::new("http://mock.local/", Box::new(mock), TokenStore::default());
///
/// let groups = client.list("groups", &[])?;
/// assert_eq!(groups[0]["title"], "5A");
/// # Ok::<(), classdesk::domain::DeskError>(())
/// ```
pub struct ApiClient {
    base_url: String,
    transport: Box<dyn Transport>,
    tokens: TokenStore,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("authorized", &self.tokens.access.is_some())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    #[must_use]
    pub fn new(base_url: impl Into<String>, transport: Box<dyn Transport>, tokens: TokenStore) -> Self {
        Self {
            base_url: base_url.into(),
            transport,
            tokens,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Replaces the tokens, for example after a refresh.
    pub fn set_tokens(&mut self, tokens: TokenStore) {
        self.tokens = tokens;
    }

    /// Sends `request` and parses the JSON body.
    ///
    /// An empty success body yields `Value::Null`.
    ///
    /// # Errors
    ///
    /// - [`DeskError::Transport`] if the transport failed
    /// - [`DeskError::Api`] for statuses outside `200..300`
    /// - [`DeskError::Json`] if a success body is not JSON
    pub fn send(&self, request: ApiRequest) -> Result<Value> {
        let mut request = request;
        if let Some(bearer) = self.tokens.bearer() {
            request.headers.push(("Authorization".to_string(), bearer));
        }

        let _span = tracing::debug_span!("api_request", method = request.method.as_str(), path = %request.path)
            .entered();
        let response = self.transport.send(&self.base_url, &request)?;

        if !response.is_success() {
            tracing::warn!(status = response.status, "API request failed");
            return Err(DeskError::Api {
                status: response.status,
                body: response.body,
            });
        }
        if response.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&response.body)?)
    }

    /// `GET path` with query parameters.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub fn get(&self, path: &str, query: &[(String, String)]) -> Result<Value> {
        self.send(ApiRequest::new(Method::Get, path).with_query(query))
    }

    /// Fetches a list resource.
    ///
    /// Accepts a bare JSON array or a paginated `{"results": [...]}` object.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send); additionally [`DeskError::Transport`] when the
    /// body is neither shape.
    pub fn list(&self, resource: &str, query: &[(String, String)]) -> Result<Vec<Record>> {
        match self.get(resource, query)? {
            Value::Array(items) => Ok(items),
            Value::Object(mut page) => match page.remove("results") {
                Some(Value::Array(items)) => Ok(items),
                _ => Err(DeskError::Transport(format!("`{resource}` did not return a list"))),
            },
            _ => Err(DeskError::Transport(format!("`{resource}` did not return a list"))),
        }
    }

    /// `POST path` with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub fn post(&self, path: &str, body: Value) -> Result<Value> {
        self.send(ApiRequest::new(Method::Post, path).with_body(body))
    }

    /// `PATCH path` with a partial JSON body.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub fn patch(&self, path: &str, body: Value) -> Result<Value> {
        self.send(ApiRequest::new(Method::Patch, path).with_body(body))
    }

    /// `DELETE path`.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub fn delete(&self, path: &str) -> Result<()> {
        self.send(ApiRequest::new(Method::Delete, path)).map(drop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::transport::ApiResponse;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    /// Replies with a canned response and remembers what it was sent.
    struct Canned {
        response: ApiResponse,
        seen: Arc<Mutex<Vec<ApiRequest>>>,
    }

    impl Transport for Canned {
        fn send(&self, _base_url: &str, request: &ApiRequest) -> Result<ApiResponse> {
            self.seen.lock().unwrap().push(request.clone());
            Ok(self.response.clone())
        }
    }

    fn client(status: u16, body: &str, tokens: TokenStore) -> (ApiClient, Arc<Mutex<Vec<ApiRequest>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let transport = Canned {
            response: ApiResponse::new(status, body),
            seen: Arc::clone(&seen),
        };
        (ApiClient::new("http://x/", Box::new(transport), tokens), seen)
    }

    #[test]
    fn attaches_bearer_token() {
        let (client, seen) = client(200, "[]", TokenStore::with_access("tok"));
        client.list("students", &[]).unwrap();
        let request = &seen.lock().unwrap()[0];
        assert_eq!(request.header("authorization"), Some("Bearer tok"));
    }

    #[test]
    fn anonymous_requests_have_no_auth_header() {
        let (client, seen) = client(200, "[]", TokenStore::default());
        client.list("students", &[]).unwrap();
        assert_eq!(seen.lock().unwrap()[0].header("Authorization"), None);
    }

    #[test]
    fn error_status_surfaces_from_lists() {
        let (client, _) = client(403, "forbidden", TokenStore::default());
        match client.list("payments", &[]) {
            Err(DeskError::Api { status, body }) => {
                assert_eq!(status, 403);
                assert_eq!(body, "forbidden");
            }
            other => panic!("expected API error, got {other:?}"),
        }
    }

    #[test]
    fn paginated_lists_are_unwrapped() {
        let (client, _) = client(200, r#"{"count": 1, "results": [{"id": 3}]}"#, TokenStore::default());
        assert_eq!(client.list("groups", &[]).unwrap(), vec![json!({ "id": 3 })]);
    }

    #[test]
    fn non_list_body_is_rejected() {
        let (client, _) = client(200, r#"{"id": 3}"#, TokenStore::default());
        assert!(matches!(client.list("groups", &[]), Err(DeskError::Transport(_))));
    }

    #[test]
    fn empty_success_body_is_null() {
        let (client, _) = client(204, "", TokenStore::default());
        assert_eq!(client.get("ping", &[]).unwrap(), Value::Null);
        client.delete("students/1").unwrap();
    }
}
