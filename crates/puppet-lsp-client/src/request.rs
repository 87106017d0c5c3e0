//! Requests the server sends to the editor client.

use lsp_types::notification::{DidChangeConfiguration, Notification};
use lsp_types::request::{
    OnTypeFormatting, RegisterCapability, Request, UnregisterCapability, WorkspaceConfiguration,
};
use lsp_types::{ConfigurationParams, RegistrationParams, UnregistrationParams};

use crate::errors::LanguageClientError;
use crate::jsonrpc::{JsonRpcRequest, RequestId};

/// `client/registerCapability`.
pub const REGISTER_CAPABILITY_METHOD: &str = RegisterCapability::METHOD;
/// `client/unregisterCapability`.
pub const UNREGISTER_CAPABILITY_METHOD: &str = UnregisterCapability::METHOD;
/// `workspace/configuration`.
pub const CONFIGURATION_METHOD: &str = WorkspaceConfiguration::METHOD;
/// `workspace/didChangeConfiguration`; registering it triggers a settings pull.
pub const DID_CHANGE_CONFIGURATION_METHOD: &str = DidChangeConfiguration::METHOD;
/// `textDocument/onTypeFormatting`, toggled by the `formatOnType` setting.
pub const ON_TYPE_FORMATTING_METHOD: &str = OnTypeFormatting::METHOD;

/// A request awaiting a response from the client.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientRequest {
    /// Registers exactly one capability.
    RegisterCapability(RegistrationParams),
    /// Unregisters one or more attempts of a single capability.
    UnregisterCapability(UnregistrationParams),
    /// Pulls workspace settings.
    Configuration(ConfigurationParams),
}

impl ClientRequest {
    /// JSON-RPC method name of the request.
    #[must_use]
    pub const fn method(&self) -> &'static str {
        match self {
            Self::RegisterCapability(_) => REGISTER_CAPABILITY_METHOD,
            Self::UnregisterCapability(_) => UNREGISTER_CAPABILITY_METHOD,
            Self::Configuration(_) => CONFIGURATION_METHOD,
        }
    }

    /// Encodes the request as a JSON-RPC message with the given id.
    pub(crate) fn to_jsonrpc(&self, id: RequestId) -> Result<JsonRpcRequest, LanguageClientError> {
        let params = match self {
            Self::RegisterCapability(params) => serde_json::to_value(params),
            Self::UnregisterCapability(params) => serde_json::to_value(params),
            Self::Configuration(params) => serde_json::to_value(params),
        }
        .map_err(|source| LanguageClientError::encode(self.method(), source))?;
        Ok(JsonRpcRequest::with_id(id, self.method(), Some(params)))
    }
}
