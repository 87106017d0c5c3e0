//! Per-session language client state and inbound message routing.

use std::collections::HashMap;

use lsp_types::DidChangeConfigurationParams;
use puppet_lsp_config::Config;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::capability::ClientCapabilityStore;
use crate::errors::LanguageClientError;
use crate::jsonrpc::{JsonRpcResponse, RequestId};
use crate::registry::{CapabilityRegistry, RegistrationAttempt};
use crate::request::{ClientRequest, DID_CHANGE_CONFIGURATION_METHOD};
use crate::settings::ClientSettings;
use crate::transport::ClientTransport;

/// Tracing target for client operations.
pub(crate) const CLIENT_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::client");

/// State the server keeps about one connected editor client.
///
/// All mutation goes through `&mut self`, so a session is driven by a single
/// message loop. Sessions share nothing; run one client per connection.
pub struct LanguageClient<T> {
    transport: T,
    pub(crate) capabilities: ClientCapabilityStore,
    pub(crate) registry: CapabilityRegistry,
    pub(crate) settings: ClientSettings,
    configuration_section: String,
    outstanding: HashMap<RequestId, ClientRequest>,
    next_request_id: RequestId,
}

impl<T: ClientTransport> LanguageClient<T> {
    /// Builds a client that sends requests through `transport`.
    #[must_use]
    pub fn new(transport: T, config: &Config) -> Self {
        Self {
            transport,
            capabilities: ClientCapabilityStore::default(),
            registry: CapabilityRegistry::new(),
            settings: ClientSettings::new(config.format_on_type()),
            configuration_section: config.configuration_section().to_owned(),
            outstanding: HashMap::new(),
            next_request_id: 1,
        }
    }

    /// Stores the capabilities the client declared in `initialize`.
    pub fn initialize_session(&mut self, capabilities: Value) {
        self.capabilities.replace(capabilities);
        debug!(target: CLIENT_TARGET, "client capabilities replaced");
    }

    /// Handles the client's `initialized` notification.
    ///
    /// Registers for configuration change notifications when the client
    /// allows it; otherwise the client is expected to push settings.
    ///
    /// # Errors
    ///
    /// Returns an error when the registration request cannot be sent.
    pub fn initialized(&mut self) -> Result<(), LanguageClientError> {
        info!(target: CLIENT_TARGET, "client has received initialisation");
        if self
            .capabilities
            .supports_dynamic_registration(DID_CHANGE_CONFIGURATION_METHOD)
        {
            self.register_capability(
                DID_CHANGE_CONFIGURATION_METHOD,
                Some(Value::Object(serde_json::Map::new())),
            )?;
        } else {
            debug!(
                target: CLIENT_TARGET,
                "client does not support didChangeConfiguration dynamic registration; \
                 relying on pushed configuration"
            );
        }
        Ok(())
    }

    /// Handles a `workspace/didChangeConfiguration` notification.
    ///
    /// Clients that only signal a change send `null` settings; those are
    /// answered with a configuration pull.
    ///
    /// # Errors
    ///
    /// Returns an error when a resulting request cannot be sent.
    pub fn did_change_configuration(
        &mut self,
        params: &DidChangeConfigurationParams,
    ) -> Result<(), LanguageClientError> {
        if params.settings.is_null() {
            return self.send_configuration_request().map(|_| ());
        }
        self.apply_settings(&params.settings)
    }

    /// Routes a response to the handler of the request it answers.
    ///
    /// Responses with an unknown or missing id are logged and dropped.
    ///
    /// # Errors
    ///
    /// Propagates failures from the selected handler.
    pub fn handle_response(&mut self, response: &JsonRpcResponse) -> Result<(), LanguageClientError> {
        let Some(id) = response.id else {
            warn!(target: CLIENT_TARGET, "dropping response without an id");
            return Ok(());
        };
        let Some(original) = self.outstanding.remove(&id) else {
            warn!(
                target: CLIENT_TARGET,
                request_id = id,
                "dropping response for unknown request"
            );
            return Ok(());
        };

        debug!(
            target: CLIENT_TARGET,
            request_id = id,
            method = original.method(),
            "routing response"
        );

        match &original {
            ClientRequest::RegisterCapability(_) => self.on_register_response(response, &original),
            ClientRequest::UnregisterCapability(_) => {
                self.on_unregister_response(response, &original)
            }
            ClientRequest::Configuration(_) => self.on_configuration_response(response),
        }
    }

    /// Attempts recorded for `method`; see [`CapabilityRegistry::attempts_for`].
    #[must_use]
    pub fn capability_registrations(&self, method: &str) -> Vec<RegistrationAttempt> {
        self.registry.attempts_for(method)
    }

    /// Looks up a client capability by key path.
    #[must_use]
    pub fn client_capability(&self, path: &[&str]) -> Option<&Value> {
        self.capabilities.capability(path)
    }

    /// Whether on-type formatting is currently enabled.
    #[must_use]
    pub const fn format_on_type(&self) -> bool {
        self.settings.format_on_type()
    }

    /// The request sent with `id`, while it awaits a response.
    #[must_use]
    pub fn outstanding_request(&self, id: RequestId) -> Option<&ClientRequest> {
        self.outstanding.get(&id)
    }

    /// Number of requests awaiting a response.
    #[must_use]
    pub fn outstanding_count(&self) -> usize {
        self.outstanding.len()
    }

    pub(crate) fn configuration_section(&self) -> &str {
        &self.configuration_section
    }

    /// Sends `request` and remembers it until its response arrives.
    pub(crate) fn send(&mut self, request: ClientRequest) -> Result<RequestId, LanguageClientError> {
        let id = self.next_request_id;
        let message = request.to_jsonrpc(id)?;
        self.transport
            .send_client_request(message)
            .map_err(|source| LanguageClientError::transport(request.method(), source))?;

        debug!(
            target: CLIENT_TARGET,
            method = request.method(),
            request_id = id,
            "sent client request"
        );
        self.next_request_id += 1;
        self.outstanding.insert(id, request);
        Ok(id)
    }
}
