//! Shared fixtures and helpers for client tests.

mod recording_transport;
mod world;

use puppet_lsp_config::Config;
use rstest::fixture;
use serde_json::{Value, json};

use crate::LanguageClient;

pub use recording_transport::{RecordingTransport, TransportHandle};
pub use world::TestWorld;

/// Client capabilities allowing dynamic registration of everything we use.
pub fn dynamic_capabilities() -> Value {
    json!({
        "textDocument": {"onTypeFormatting": {"dynamicRegistration": true}},
        "workspace": {"didChangeConfiguration": {"dynamicRegistration": true}}
    })
}

/// Client capabilities without dynamic registration support.
pub fn static_capabilities() -> Value {
    json!({
        "textDocument": {"onTypeFormatting": {"dynamicRegistration": false}},
        "workspace": {"didChangeConfiguration": {}}
    })
}

/// Settings tree pushing the given on-type formatting flag.
pub fn format_on_type_settings(enable: bool) -> Value {
    json!({"puppet": {"editorService": {"formatOnType": {"enable": enable}}}})
}

/// A client with default configuration and a handle on its transport.
#[fixture]
pub fn client() -> (LanguageClient<RecordingTransport>, TransportHandle) {
    let transport = RecordingTransport::new();
    let handle = transport.handle();
    (LanguageClient::new(transport, &Config::default()), handle)
}
