//! Dynamic capability (de)registration.
//!
//! Register requests always carry a single registration so that a failed
//! response maps onto exactly one attempt. Unregister requests may batch every
//! live attempt of one method.

use lsp_types::{
    ConfigurationItem, ConfigurationParams, Registration, RegistrationParams, Unregistration,
    UnregistrationParams,
};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::client::LanguageClient;
use crate::errors::LanguageClientError;
use crate::jsonrpc::{JsonRpcResponse, RequestId};
use crate::registry::RegistrationId;
use crate::request::{
    ClientRequest, DID_CHANGE_CONFIGURATION_METHOD, REGISTER_CAPABILITY_METHOD,
    UNREGISTER_CAPABILITY_METHOD,
};
use crate::transport::ClientTransport;

/// Tracing target for registration bookkeeping.
pub(crate) const REGISTRATION_TARGET: &str =
    concat!(env!("CARGO_PKG_NAME"), "::registration");

impl<T: ClientTransport> LanguageClient<T> {
    /// Asks the client to register `method` and returns the new attempt id.
    ///
    /// The attempt is pending until [`Self::handle_response`] sees the answer.
    /// Registering while another attempt is pending is allowed but logged.
    ///
    /// # Errors
    ///
    /// Returns an error when the request cannot be sent; the attempt is then
    /// discarded.
    pub fn register_capability(
        &mut self,
        method: &str,
        options: Option<Value>,
    ) -> Result<RegistrationId, LanguageClientError> {
        let id = RegistrationId::generate();
        info!(
            target: REGISTRATION_TARGET,
            method,
            id = %id,
            "attempting to dynamically register capability"
        );

        if self.registry.has_pending(method) {
            warn!(
                target: REGISTRATION_TARGET,
                method,
                "a dynamic registration or deregistration is already in progress"
            );
        }

        self.registry.record_attempt(method, id.clone());
        let request = ClientRequest::RegisterCapability(RegistrationParams {
            registrations: vec![Registration {
                id: id.to_string(),
                method: method.to_owned(),
                register_options: options,
            }],
        });

        if let Err(error) = self.send(request) {
            self.registry.remove(method, id.as_str());
            return Err(error);
        }
        Ok(id)
    }

    /// Asks the client to drop every live registration of `method`.
    ///
    /// Attempts the client already rejected are skipped. When nothing is left
    /// to undo no request is sent.
    ///
    /// # Errors
    ///
    /// Returns an error when the request cannot be sent; the targeted
    /// attempts then return to their previous state.
    pub fn unregister_capability(&mut self, method: &str) -> Result<(), LanguageClientError> {
        let Some(attempts) = self.registry.attempts_mut(method) else {
            debug!(target: REGISTRATION_TARGET, method, "no registrations to deregister");
            return Ok(());
        };

        let mut unregisterations = Vec::new();
        let mut previous_states = Vec::new();
        for attempt in attempts.iter_mut() {
            let Some(id) = attempt.id().map(RegistrationId::to_string) else {
                continue;
            };
            if attempt.is_pending() {
                warn!(
                    target: REGISTRATION_TARGET,
                    method,
                    id = %id,
                    "a dynamic registration or deregistration is already in progress"
                );
            }
            if attempt.is_rejected() {
                continue;
            }
            previous_states.push((id.clone(), attempt.state()));
            attempt.mark_pending();
            unregisterations.push(Unregistration {
                id,
                method: method.to_owned(),
            });
        }

        if unregisterations.is_empty() {
            debug!(target: REGISTRATION_TARGET, method, "nothing to deregister");
            return Ok(());
        }

        let request = ClientRequest::UnregisterCapability(UnregistrationParams { unregisterations });
        if let Err(error) = self.send(request) {
            for (id, state) in previous_states {
                self.registry.set_state(method, &id, state);
            }
            return Err(error);
        }
        Ok(())
    }

    /// Pulls the workspace settings section from the client.
    ///
    /// # Errors
    ///
    /// Returns an error when the request cannot be sent.
    pub fn send_configuration_request(&mut self) -> Result<RequestId, LanguageClientError> {
        let request = ClientRequest::Configuration(ConfigurationParams {
            items: vec![ConfigurationItem {
                scope_uri: None,
                section: Some(self.configuration_section().to_owned()),
            }],
        });
        self.send(request)
    }

    /// Applies the client's answer to a `client/registerCapability` request.
    ///
    /// A response without a `result` member marks each registration rejected.
    /// Otherwise each becomes registered, and a successful
    /// `workspace/didChangeConfiguration` registration pulls the current
    /// settings.
    ///
    /// # Errors
    ///
    /// Returns [`LanguageClientError::UnexpectedResponse`] when `original` is
    /// not a register request, or a send error from the configuration pull.
    pub fn on_register_response(
        &mut self,
        response: &JsonRpcResponse,
        original: &ClientRequest,
    ) -> Result<(), LanguageClientError> {
        let ClientRequest::RegisterCapability(params) = original else {
            return Err(LanguageClientError::unexpected_response(
                REGISTER_CAPABILITY_METHOD,
                original.method(),
            ));
        };

        if !response.has_result() {
            for registration in &params.registrations {
                warn!(
                    target: REGISTRATION_TARGET,
                    method = %registration.method,
                    id = %registration.id,
                    "client rejected dynamic registration"
                );
                self.registry
                    .mark_complete(&registration.method, &registration.id, false);
            }
            return Ok(());
        }

        for registration in &params.registrations {
            info!(
                target: REGISTRATION_TARGET,
                method = %registration.method,
                id = %registration.id,
                "successfully dynamically registered capability"
            );
            self.registry
                .mark_complete(&registration.method, &registration.id, true);

            if registration.method == DID_CHANGE_CONFIGURATION_METHOD {
                self.send_configuration_request()?;
            }
        }
        Ok(())
    }

    /// Applies the client's answer to a `client/unregisterCapability` request.
    ///
    /// On success every targeted attempt is forgotten. On failure attempts
    /// that were registered stay registered, and the rest are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`LanguageClientError::UnexpectedResponse`] when `original` is
    /// not an unregister request.
    pub fn on_unregister_response(
        &mut self,
        response: &JsonRpcResponse,
        original: &ClientRequest,
    ) -> Result<(), LanguageClientError> {
        let ClientRequest::UnregisterCapability(params) = original else {
            return Err(LanguageClientError::unexpected_response(
                UNREGISTER_CAPABILITY_METHOD,
                original.method(),
            ));
        };

        if !response.has_result() {
            for unregistration in &params.unregisterations {
                warn!(
                    target: REGISTRATION_TARGET,
                    method = %unregistration.method,
                    id = %unregistration.id,
                    "client rejected dynamic deregistration"
                );
                self.registry
                    .settle_failed_unregistration(&unregistration.method, &unregistration.id);
            }
            return Ok(());
        }

        for unregistration in &params.unregisterations {
            info!(
                target: REGISTRATION_TARGET,
                method = %unregistration.method,
                id = %unregistration.id,
                "successfully dynamically unregistered capability"
            );
            self.registry
                .remove(&unregistration.method, &unregistration.id);
        }
        Ok(())
    }
}
