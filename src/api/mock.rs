//! In-memory stand-in for the school backend.
//!
//! Serves list/detail/create/update/delete over named collections, with an
//! artificial delay taken from an explicit [`LatencyConfig`]. Used by the
//! demo CLI and by page tests.

use super::transport::{ApiRequest, ApiResponse, Method, Transport};
use crate::domain::error::Result;
use crate::domain::record::{display_value, lookup, row_key};
use crate::domain::Record;
use crate::storage::LatencyConfig;
use rand::Rng;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::Duration;

/// Mock backend holding records per collection name.
///
/// List requests filter on query parameters: a record matches when the
/// display value at each parameter's field path equals one of the values
/// given for it.
#[derive(Debug, Default)]
pub struct MockApi {
    latency: LatencyConfig,
    collections: Mutex<BTreeMap<String, Vec<Record>>>,
}

impl MockApi {
    #[must_use]
    pub fn new(latency: LatencyConfig) -> Self {
        Self {
            latency,
            collections: Mutex::new(BTreeMap::new()),
        }
    }

    #[must_use]
    pub fn with_collection(mut self, name: impl Into<String>, records: Vec<Record>) -> Self {
        if let Ok(collections) = self.collections.get_mut() {
            collections.insert(name.into(), records);
        }
        self
    }

    /// Delay for the next request: base plus a random share of the variance.
    #[must_use]
    pub fn delay(&self) -> Duration {
        let jitter = if self.latency.variance_ms == 0 {
            0
        } else {
            rand::thread_rng().gen_range(0..=self.latency.variance_ms)
        };
        Duration::from_millis(self.latency.base_ms.saturating_add(jitter))
    }

    fn handle(collections: &mut BTreeMap<String, Vec<Record>>, request: &ApiRequest) -> ApiResponse {
        let mut segments = request.path.trim_end_matches('/').splitn(2, '/');
        let name = segments.next().unwrap_or_default();
        let id = segments.next();

        let Some(records) = collections.get_mut(name) else {
            return not_found(&request.path);
        };

        match (request.method, id) {
            (Method::Get, None) => {
                let mut wanted: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
                for (field, value) in &request.query {
                    wanted.entry(field.as_str()).or_default().push(value.as_str());
                }
                let matching: Vec<&Record> = records
                    .iter()
                    .filter(|record| {
                        wanted.iter().all(|(field, values)| {
                            let actual = lookup(record, field).map(display_value).unwrap_or_default();
                            values.contains(&actual.as_str())
                        })
                    })
                    .collect();
                ok(200, &json!(matching))
            }
            (Method::Get, Some(id)) => match records.iter().find(|r| row_key(r) == id) {
                Some(record) => ok(200, record),
                None => not_found(&request.path),
            },
            (Method::Post, None) => {
                let mut record = request.body.clone().unwrap_or_else(|| json!({}));
                if let Some(fields) = record.as_object_mut() {
                    if !fields.contains_key("id") {
                        let next = records.iter().filter_map(|r| r["id"].as_u64()).max().unwrap_or(0) + 1;
                        fields.insert("id".to_string(), json!(next));
                    }
                } else {
                    return ApiResponse::new(400, "body must be an object");
                }
                records.push(record.clone());
                ok(201, &record)
            }
            (Method::Patch, Some(id)) => {
                let Some(record) = records.iter_mut().find(|r| row_key(r) == id) else {
                    return not_found(&request.path);
                };
                if let (Some(target), Some(Value::Object(changes))) = (record.as_object_mut(), &request.body) {
                    for (field, value) in changes {
                        target.insert(field.clone(), value.clone());
                    }
                }
                ok(200, record)
            }
            (Method::Delete, Some(id)) => {
                let before = records.len();
                records.retain(|r| row_key(r) != id);
                if records.len() == before {
                    not_found(&request.path)
                } else {
                    ApiResponse::new(204, "")
                }
            }
            _ => ApiResponse::new(405, format!("{} not allowed on {}", request.method.as_str(), request.path)),
        }
    }
}

fn ok(status: u16, body: &Value) -> ApiResponse {
    ApiResponse::new(status, body.to_string())
}

fn not_found(path: &str) -> ApiResponse {
    ApiResponse::new(404, format!("no such resource: {path}"))
}

impl Transport for MockApi {
    fn send(&self, _base_url: &str, request: &ApiRequest) -> Result<ApiResponse> {
        let delay = self.delay();
        tracing::debug!(
            method = request.method.as_str(),
            path = %request.path,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            "mock request"
        );
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }

        let mut collections = self
            .collections
            .lock()
            .map_err(|_| crate::domain::DeskError::Transport("mock API state poisoned".to_string()))?;
        Ok(Self::handle(&mut collections, request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClient;
    use crate::domain::DeskError;
    use crate::storage::TokenStore;
    use pretty_assertions::assert_eq;

    fn client() -> ApiClient {
        let mock = MockApi::new(LatencyConfig::default()).with_collection(
            "students",
            vec![
                json!({ "id": 1, "name": "Anna", "group": { "title": "5A" } }),
                json!({ "id": 2, "name": "Boris", "group": { "title": "5B" } }),
                json!({ "id": 3, "name": "Vera", "group": { "title": "5A" } }),
            ],
        );
        ApiClient::new("http://mock/", Box::new(mock), TokenStore::default())
    }

    fn names(records: &[Record]) -> Vec<&str> {
        records.iter().filter_map(|r| r["name"].as_str()).collect()
    }

    #[test]
    fn delay_saturates_on_huge_latency() {
        let mock = MockApi::new(LatencyConfig::new(u64::MAX - 1, 10));
        assert!(mock.delay() >= Duration::from_millis(u64::MAX - 1));

        let fixed = MockApi::new(LatencyConfig::new(40, 0));
        assert_eq!(fixed.delay(), Duration::from_millis(40));
    }

    #[test]
    fn filters_by_query() {
        let client = client();
        let query = vec![("group.title".to_string(), "5A".to_string())];
        assert_eq!(names(&client.list("students", &query).unwrap()), vec!["Anna", "Vera"]);

        let any_of = vec![("id".to_string(), "1".to_string()), ("id".to_string(), "2".to_string())];
        assert_eq!(names(&client.list("students", &any_of).unwrap()), vec!["Anna", "Boris"]);
    }

    #[test]
    fn create_update_delete() {
        let client = client();
        let created = client.post("students", json!({ "name": "Gleb" })).unwrap();
        assert_eq!(created["id"], 4);

        let updated = client.patch("students/4", json!({ "name": "Gleb K." })).unwrap();
        assert_eq!(updated["name"], "Gleb K.");

        client.delete("students/4").unwrap();
        assert!(matches!(client.get("students/4", &[]), Err(DeskError::Api { status: 404, .. })));
    }

    #[test]
    fn unknown_collection_is_not_found() {
        assert!(matches!(client().list("teachers", &[]), Err(DeskError::Api { status: 404, .. })));
    }

    #[test]
    fn delay_stays_within_configured_range() {
        let mock = MockApi::new(LatencyConfig::new(20, 10));
        for _ in 0..50 {
            let delay = mock.delay();
            assert!(delay >= Duration::from_millis(20) && delay <= Duration::from_millis(30));
        }
        assert_eq!(MockApi::default().delay(), Duration::ZERO);
    }
}
