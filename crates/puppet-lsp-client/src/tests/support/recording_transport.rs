//! Recording transport used in tests.

use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::jsonrpc::{JsonRpcRequest, RequestId};
use crate::transport::{ClientTransport, TransportError};

/// Test double that records every request sent through it.
#[derive(Clone, Default)]
pub struct RecordingTransport {
    shared: Arc<Mutex<RecordingState>>,
}

impl RecordingTransport {
    /// Creates a transport that accepts every request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a handle that can be used to inspect and steer the transport.
    pub fn handle(&self) -> TransportHandle {
        TransportHandle {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl ClientTransport for RecordingTransport {
    fn send_client_request(&mut self, request: JsonRpcRequest) -> Result<(), TransportError> {
        with_state(&self.shared, |state| {
            if state.disconnected {
                return Err(TransportError::Disconnected);
            }
            state.sent.push(request);
            Ok(())
        })
    }
}

/// Handle that exposes recorded requests for assertions.
#[derive(Clone)]
pub struct TransportHandle {
    shared: Arc<Mutex<RecordingState>>,
}

impl TransportHandle {
    /// Every request sent so far, oldest first.
    pub fn sent(&self) -> Vec<JsonRpcRequest> {
        with_state(&self.shared, |state| state.sent.clone())
    }

    /// Number of requests sent for `method`.
    pub fn count(&self, method: &str) -> usize {
        with_state(&self.shared, |state| {
            state
                .sent
                .iter()
                .filter(|request| request.method == method)
                .count()
        })
    }

    /// The most recent request for `method`.
    pub fn last(&self, method: &str) -> Option<JsonRpcRequest> {
        with_state(&self.shared, |state| {
            state
                .sent
                .iter()
                .rev()
                .find(|request| request.method == method)
                .cloned()
        })
    }

    /// Id and params of the most recent request for `method`.
    pub fn last_params(&self, method: &str) -> Option<(RequestId, Value)> {
        self.last(method)
            .and_then(|request| request.params.map(|params| (request.id, params)))
    }

    /// Makes every later send fail as if the connection had dropped.
    pub fn disconnect(&self) {
        with_state(&self.shared, |state| state.disconnected = true);
    }
}

fn with_state<R, F>(shared: &Arc<Mutex<RecordingState>>, action: F) -> R
where
    F: FnOnce(&mut RecordingState) -> R,
{
    let mut guard = shared.lock().unwrap_or_else(|poison| poison.into_inner());
    action(&mut guard)
}

#[derive(Debug, Default)]
struct RecordingState {
    sent: Vec<JsonRpcRequest>,
    disconnected: bool,
}
