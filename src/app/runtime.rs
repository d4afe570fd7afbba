//! Drives one page: feeds events to the handler and executes its actions.
//!
//! ```text
//! Event ──▶ handle_event ──▶ Vec<Action> ──▶ worker / URL
//!   ▲                                           │
//!   └──────────── WorkerResponse ◀──────────────┘
//! ```

use super::{handle_event, Action, AppState, Event};
use crate::domain::Result;
use crate::worker::WorkerHandle;
use std::time::{Duration, Instant};

/// A page wired to its fetch worker and URL.
#[derive(Debug)]
pub struct Runtime {
    pub state: AppState,
    worker: WorkerHandle,
    /// Query string of the page URL, without the leading `?`.
    url: String,
}

impl Runtime {
    #[must_use]
    pub const fn new(state: AppState, worker: WorkerHandle) -> Self {
        Self {
            state,
            worker,
            url: String::new(),
        }
    }

    /// Current page URL query.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Handles one event and executes the resulting actions in order.
    ///
    /// Returns `true` if the screen should be redrawn.
    ///
    /// # Errors
    ///
    /// Returns an error if the handler rejects the event or the worker
    /// thread is gone.
    pub fn dispatch(&mut self, event: &Event) -> Result<bool> {
        let (render, actions) = handle_event(&mut self.state, event)?;
        tracing::trace!(event = event.kind(), render, action_count = actions.len(), "event handled");
        for action in actions {
            self.execute(action)?;
        }
        Ok(render)
    }

    fn execute(&mut self, action: Action) -> Result<()> {
        match action {
            Action::PostToWorker(message) => {
                tracing::debug!(generation = ?message.generation(), "posting to worker");
                self.worker.post(message)
            }
            Action::PushUrl(query) => {
                tracing::debug!(query = %query, "url updated");
                self.url = query;
                Ok(())
            }
        }
    }

    /// Waits up to `timeout` for worker responses, applies every response
    /// that arrived, then advances the page clock.
    ///
    /// # Errors
    ///
    /// Returns [`DeskError::Worker`](crate::domain::DeskError::Worker) if the
    /// worker thread is gone.
    pub fn pump(&mut self, timeout: Duration) -> Result<bool> {
        let mut render = false;
        if let Some(response) = self.worker.recv_timeout(timeout)? {
            render |= self.dispatch(&Event::WorkerResponse(response))?;
            while let Some(response) = self.worker.try_recv()? {
                render |= self.dispatch(&Event::WorkerResponse(response))?;
            }
        }
        render |= self.dispatch(&Event::Tick(Instant::now()))?;
        Ok(render)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiClient, MockApi};
    use crate::app::modes::LoadState;
    use crate::app::page::PageConfig;
    use crate::storage::{LatencyConfig, TokenStore};
    use crate::table::FieldMapping;
    use crate::ui::Theme;
    use crate::worker;
    use serde_json::json;

    fn runtime() -> Runtime {
        let mock = MockApi::new(LatencyConfig::default()).with_collection(
            "students",
            vec![json!({ "id": 1, "name": "Anna" }), json!({ "id": 2, "name": "Boris" })],
        );
        let client = ApiClient::new("http://mock/", Box::new(mock), TokenStore::default());
        let page = PageConfig::new("Students", "students", FieldMapping::new().label("name", "Name"));
        Runtime::new(AppState::new(page, Theme::default()), worker::spawn(client).unwrap())
    }

    #[test]
    fn mount_loads_records_through_worker() {
        let mut runtime = runtime();
        runtime.dispatch(&Event::Mounted).unwrap();
        assert_eq!(runtime.state.load_state, LoadState::Loading);

        for _ in 0..50 {
            runtime.pump(Duration::from_millis(20)).unwrap();
            if runtime.state.load_state == LoadState::Loaded {
                break;
            }
        }
        assert_eq!(runtime.state.records.len(), 2);
        assert_eq!(runtime.url(), "");
    }
}
