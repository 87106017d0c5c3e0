//! JSON-RPC 2.0 message types exchanged with the editor client.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Identifier correlating a server-to-client request with its response.
pub type RequestId = i64;

/// A JSON-RPC 2.0 request sent from the server to the client.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonRpcRequest {
    /// Protocol version, always "2.0".
    pub jsonrpc: &'static str,
    /// Identifier used to correlate the response.
    pub id: RequestId,
    /// The method to invoke on the client.
    pub method: String,
    /// Optional parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    /// Creates a request with a specific ID.
    #[must_use]
    pub fn with_id(id: RequestId, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            method: method.into(),
            params,
        }
    }
}

/// A JSON-RPC 2.0 response received from the client.
///
/// `result` distinguishes a missing member from an explicit `null`: the
/// registration methods answer success with `"result": null`, so only a
/// response without the member at all counts as a failure.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JsonRpcResponse {
    /// Protocol version.
    #[serde(default)]
    pub jsonrpc: String,
    /// Request identifier this response corresponds to.
    pub id: Option<RequestId>,
    /// The result member, `Some(Value::Null)` when sent as `null`.
    #[serde(default, deserialize_with = "present_member")]
    pub result: Option<Value>,
    /// The error on failure.
    #[serde(default)]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    /// Builds a successful response carrying `result`.
    #[must_use]
    pub fn success(id: RequestId, result: Value) -> Self {
        Self {
            jsonrpc: String::from("2.0"),
            id: Some(id),
            result: Some(result),
            error: None,
        }
    }

    /// Builds an error response without a `result` member.
    #[must_use]
    pub fn failure(id: RequestId, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: String::from("2.0"),
            id: Some(id),
            result: None,
            error: Some(error),
        }
    }

    /// Whether the response carried a `result` member, even a `null` one.
    #[must_use]
    pub const fn has_result(&self) -> bool {
        self.result.is_some()
    }
}

/// A JSON-RPC 2.0 error object.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JsonRpcError {
    /// Error code.
    pub code: i64,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional data.
    #[serde(default)]
    pub data: Option<Value>,
}

impl JsonRpcError {
    /// Builds an error without additional data.
    #[must_use]
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }
}

fn present_member<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}
