//! Dynamic capability registration core of the Puppet language client.
//!
//! The server talks to an editor client that may let it register and
//! unregister capabilities at runtime. This crate keeps track of those
//! registrations per session, reconciles them against responses that arrive
//! out of band, and turns pushed or pulled workspace settings into
//! (de)registration requests. Sending bytes is left to a
//! [`ClientTransport`] implementation supplied by the caller.

mod capability;
mod client;
mod coordinator;
mod errors;
mod jsonrpc;
mod registry;
mod request;
mod settings;
pub mod telemetry;
mod transport;
pub mod tree;

pub use capability::ClientCapabilityStore;
pub use client::LanguageClient;
pub use errors::LanguageClientError;
pub use jsonrpc::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, RequestId};
pub use registry::{CapabilityRegistry, RegistrationAttempt, RegistrationId, RegistrationState};
pub use request::{
    CONFIGURATION_METHOD, ClientRequest, DID_CHANGE_CONFIGURATION_METHOD,
    ON_TYPE_FORMATTING_METHOD, REGISTER_CAPABILITY_METHOD, UNREGISTER_CAPABILITY_METHOD,
};
pub use settings::{ClientSettings, FORMAT_ON_TYPE_KEYS, on_type_formatting_options};
pub use transport::{ClientTransport, TransportError};

#[cfg(test)]
mod tests;
