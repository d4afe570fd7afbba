//! The fetch worker and its thread.
//!
//! [`FetchWorker`] turns [`WorkerMessage`]s into API calls. [`spawn`] runs
//! it on a dedicated thread reached through `mpsc` channels so the page's
//! event loop never blocks on the network.

use crate::api::ApiClient;
use crate::domain::error::{DeskError, Result};
use crate::worker::{ListTarget, WorkerMessage, WorkerResponse};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread::JoinHandle;
use std::time::Duration;

/// Executes worker messages against an [`ApiClient`].
#[derive(Debug)]
pub struct FetchWorker {
    client: ApiClient,
}

impl FetchWorker {
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Standardizes logging and error mapping for one API call.
    fn handle_api_result<T, F>(
        operation: &str,
        generation: u64,
        target: Option<ListTarget>,
        result: Result<T>,
        on_success: F,
    ) -> WorkerResponse
    where
        F: FnOnce(T) -> WorkerResponse,
    {
        match result {
            Ok(value) => {
                tracing::debug!(operation, generation, "API call succeeded");
                on_success(value)
            }
            Err(e) => {
                tracing::warn!(operation, generation, error = %e, "API call failed");
                WorkerResponse::Error {
                    generation,
                    target,
                    message: format!("{operation}: {e}"),
                }
            }
        }
    }

    /// Processes one request. Returns `None` for [`WorkerMessage::Shutdown`].
    pub fn handle_message(&mut self, message: WorkerMessage) -> Option<WorkerResponse> {
        let _guard = tracing::debug_span!("worker_handle_message", generation = ?message.generation()).entered();

        match message {
            WorkerMessage::FetchList {
                generation,
                target,
                resource,
                query,
            } => {
                let result = self.client.list(&resource, &query);
                Some(Self::handle_api_result(
                    "fetch list",
                    generation,
                    Some(target.clone()),
                    result,
                    |records| {
                        tracing::debug!(count = records.len(), resource = %resource, "list loaded");
                        WorkerResponse::ListLoaded {
                            generation,
                            target,
                            records,
                        }
                    },
                ))
            }
            WorkerMessage::DeleteRecord { generation, resource, id } => {
                let result = self.client.delete(&format!("{resource}/{id}"));
                Some(Self::handle_api_result("delete record", generation, None, result, |()| {
                    WorkerResponse::RecordDeleted { generation, resource, id }
                }))
            }
            WorkerMessage::Shutdown => None,
        }
    }
}

/// Page-side end of a running worker thread.
///
/// Dropping the handle asks the thread to stop and waits for it.
#[derive(Debug)]
pub struct WorkerHandle {
    sender: Sender<WorkerMessage>,
    receiver: Receiver<WorkerResponse>,
    thread: Option<JoinHandle<()>>,
}

/// Starts a worker thread serving requests through `client`.
///
/// # Errors
///
/// Returns [`DeskError::Worker`] if the OS refuses to spawn the thread.
pub fn spawn(client: ApiClient) -> Result<WorkerHandle> {
    let (request_tx, request_rx) = mpsc::channel::<WorkerMessage>();
    let (response_tx, response_rx) = mpsc::channel::<WorkerResponse>();

    let thread = std::thread::Builder::new()
        .name("classdesk-fetch".to_string())
        .spawn(move || {
            let mut worker = FetchWorker::new(client);
            tracing::debug!("fetch worker started");
            for message in request_rx {
                let Some(response) = worker.handle_message(message) else {
                    break;
                };
                if response_tx.send(response).is_err() {
                    break;
                }
            }
            tracing::debug!("fetch worker stopped");
        })
        .map_err(|e| DeskError::Worker(format!("failed to spawn worker thread: {e}")))?;

    Ok(WorkerHandle {
        sender: request_tx,
        receiver: response_rx,
        thread: Some(thread),
    })
}

impl WorkerHandle {
    /// Queues a request.
    ///
    /// # Errors
    ///
    /// Returns [`DeskError::Worker`] if the worker thread has exited.
    pub fn post(&self, message: WorkerMessage) -> Result<()> {
        self.sender
            .send(message)
            .map_err(|_| DeskError::Worker("worker thread is gone".to_string()))
    }

    /// Returns a finished response without blocking.
    ///
    /// # Errors
    ///
    /// Returns [`DeskError::Worker`] if the worker thread has exited.
    pub fn try_recv(&self) -> Result<Option<WorkerResponse>> {
        match self.receiver.try_recv() {
            Ok(response) => Ok(Some(response)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(DeskError::Worker("worker thread is gone".to_string())),
        }
    }

    /// Waits up to `timeout` for the next response.
    ///
    /// # Errors
    ///
    /// Returns [`DeskError::Worker`] if the worker thread has exited.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<WorkerResponse>> {
        match self.receiver.recv_timeout(timeout) {
            Ok(response) => Ok(Some(response)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(DeskError::Worker("worker thread is gone".to_string())),
        }
    }
}

impl Drop for WorkerHandle {
    fn drop(&mut self) {
        let _ = self.sender.send(WorkerMessage::Shutdown);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                tracing::error!("fetch worker panicked");
            }
        }
    }
}
