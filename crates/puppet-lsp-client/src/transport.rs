//! The seam through which requests leave the client.

use std::io;

use thiserror::Error;

use crate::jsonrpc::JsonRpcRequest;

/// Sends server-initiated requests to the editor client.
///
/// Sending is fire-and-forget: the response arrives later as an independent
/// inbound message and is handed back through
/// [`LanguageClient::handle_response`](crate::LanguageClient::handle_response).
pub trait ClientTransport {
    /// Queues `request` for delivery to the client.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] when the request could not be queued.
    fn send_client_request(&mut self, request: JsonRpcRequest) -> Result<(), TransportError>;
}

impl<T: ClientTransport + ?Sized> ClientTransport for Box<T> {
    fn send_client_request(&mut self, request: JsonRpcRequest) -> Result<(), TransportError> {
        (**self).send_client_request(request)
    }
}

impl<T: ClientTransport + ?Sized> ClientTransport for &mut T {
    fn send_client_request(&mut self, request: JsonRpcRequest) -> Result<(), TransportError> {
        (**self).send_client_request(request)
    }
}

/// Errors reported by [`ClientTransport`] implementations.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The connection to the client has been closed.
    #[error("client connection is closed")]
    Disconnected,

    /// I/O error while writing the message.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The message could not be serialised for the wire.
    #[error("failed to encode message: {0}")]
    Encode(#[from] serde_json::Error),
}
