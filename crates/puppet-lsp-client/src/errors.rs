//! Error types surfaced by the language client.

use thiserror::Error;

use crate::transport::TransportError;

/// Errors returned by [`crate::LanguageClient`].
#[derive(Debug, Error)]
pub enum LanguageClientError {
    /// A response was handed to the handler for a different request kind.
    ///
    /// This is a routing bug; the registry is left untouched.
    #[error("response to a '{actual}' request was routed to the '{expected}' handler")]
    UnexpectedResponse {
        /// Method the handler accepts.
        expected: &'static str,
        /// Method of the request the response belongs to.
        actual: &'static str,
    },

    /// The transport refused an outgoing request.
    #[error("failed to send '{method}' request: {source}")]
    Transport {
        /// Method of the request that could not be sent.
        method: &'static str,
        /// Underlying transport failure.
        #[source]
        source: TransportError,
    },

    /// Request parameters could not be encoded as JSON.
    #[error("failed to encode '{method}' parameters: {source}")]
    Encode {
        /// Method of the request being built.
        method: &'static str,
        /// Underlying serialisation failure.
        #[source]
        source: serde_json::Error,
    },
}

impl LanguageClientError {
    pub(crate) const fn unexpected_response(expected: &'static str, actual: &'static str) -> Self {
        Self::UnexpectedResponse { expected, actual }
    }

    pub(crate) const fn transport(method: &'static str, source: TransportError) -> Self {
        Self::Transport { method, source }
    }

    pub(crate) const fn encode(method: &'static str, source: serde_json::Error) -> Self {
        Self::Encode { method, source }
    }
}
