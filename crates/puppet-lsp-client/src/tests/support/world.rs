//! BDD test world wrapping a client session and its transport.

use puppet_lsp_config::Config;
use serde_json::Value;

use crate::errors::LanguageClientError;
use crate::jsonrpc::{JsonRpcError, JsonRpcResponse, RequestId};
use crate::registry::RegistrationAttempt;
use crate::LanguageClient;

use super::recording_transport::{RecordingTransport, TransportHandle};

/// Shared state exercised by BDD step implementations.
pub struct TestWorld {
    /// Client session under test.
    pub client: LanguageClient<RecordingTransport>,
    /// Handle on the requests the client sent.
    pub transport: TransportHandle,
    /// Number of requests sent before the most recent `when` step.
    pub sent_before: usize,
    /// Last error observed while exercising the client.
    pub last_error: Option<LanguageClientError>,
}

impl Default for TestWorld {
    fn default() -> Self {
        let transport = RecordingTransport::new();
        let handle = transport.handle();
        Self {
            client: LanguageClient::new(transport, &Config::default()),
            transport: handle,
            sent_before: 0,
            last_error: None,
        }
    }
}

impl TestWorld {
    /// Records the outcome of a client operation.
    pub fn record<T>(&mut self, outcome: Result<T, LanguageClientError>) {
        self.last_error = outcome.err();
    }

    /// Marks the start of a step whose sends should be counted.
    pub fn checkpoint(&mut self) {
        self.sent_before = self.transport.sent().len();
    }

    /// Requests sent since the last checkpoint.
    pub fn sent_since_checkpoint(&self) -> usize {
        self.transport.sent().len() - self.sent_before
    }

    /// Answers the latest `request_method` request with `result`.
    pub fn answer(&mut self, request_method: &str, result: Value) {
        let id = self.latest_id(request_method);
        let outcome = self
            .client
            .handle_response(&JsonRpcResponse::success(id, result));
        self.record(outcome);
    }

    /// Answers the latest `request_method` request with an error and no result.
    pub fn reject(&mut self, request_method: &str) {
        let id = self.latest_id(request_method);
        let response = JsonRpcResponse::failure(id, JsonRpcError::new(-32603, "rejected"));
        let outcome = self.client.handle_response(&response);
        self.record(outcome);
    }

    /// The single recorded attempt for `method`.
    pub fn only_attempt(&self, method: &str) -> RegistrationAttempt {
        let attempts = self.client.capability_registrations(method);
        assert_eq!(attempts.len(), 1, "expected one attempt, got {attempts:?}");
        attempts
            .into_iter()
            .next()
            .unwrap_or_else(|| panic!("no attempt recorded for {method}"))
    }

    fn latest_id(&self, request_method: &str) -> RequestId {
        match self.transport.last(request_method) {
            Some(request) => request.id,
            None => panic!("no {request_method} request was sent"),
        }
    }
}
