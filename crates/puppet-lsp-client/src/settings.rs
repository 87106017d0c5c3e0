//! Reconciles client-pushed settings with the locally cached copy.

use lsp_types::DocumentOnTypeFormattingOptions;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::client::{CLIENT_TARGET, LanguageClient};
use crate::errors::LanguageClientError;
use crate::jsonrpc::JsonRpcResponse;
use crate::request::ON_TYPE_FORMATTING_METHOD;
use crate::transport::ClientTransport;
use crate::tree;

/// Keys below the configuration section that hold the on-type formatting flag.
pub const FORMAT_ON_TYPE_KEYS: [&str; 3] = ["editorService", "formatOnType", "enable"];

/// Last applied values of the settings the server acts on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClientSettings {
    format_on_type: bool,
}

impl ClientSettings {
    /// Creates a snapshot with the supplied initial values.
    #[must_use]
    pub const fn new(format_on_type: bool) -> Self {
        Self { format_on_type }
    }

    /// Whether on-type formatting is enabled.
    #[must_use]
    pub const fn format_on_type(&self) -> bool {
        self.format_on_type
    }
}

/// Registration options sent with `textDocument/onTypeFormatting`.
#[must_use]
pub fn on_type_formatting_options() -> DocumentOnTypeFormattingOptions {
    DocumentOnTypeFormattingOptions {
        first_trigger_character: String::from(">"),
        more_trigger_character: None,
    }
}

impl<T: ClientTransport> LanguageClient<T> {
    /// Applies a settings tree rooted above the configuration section.
    ///
    /// A missing or non-boolean `formatOnType.enable` leaves the cached
    /// value alone. A changed value is always cached; the capability is only
    /// (un)registered when the client supports dynamic registration for it.
    ///
    /// # Errors
    ///
    /// Returns an error when a (de)registration request cannot be sent. The
    /// cached value is updated regardless.
    pub fn apply_settings(&mut self, settings: &Value) -> Result<(), LanguageClientError> {
        let mut path = vec![self.configuration_section()];
        path.extend(FORMAT_ON_TYPE_KEYS);
        let Some(enable) = tree::lookup_bool(settings, &path) else {
            debug!(target: CLIENT_TARGET, "settings do not set formatOnType");
            return Ok(());
        };
        if enable == self.settings.format_on_type {
            return Ok(());
        }

        let outcome = if self
            .capabilities
            .supports_dynamic_registration(ON_TYPE_FORMATTING_METHOD)
        {
            self.toggle_on_type_formatting(enable)
        } else {
            Ok(())
        };

        debug!(target: CLIENT_TARGET, format_on_type = enable, "settings applied");
        self.settings.format_on_type = enable;
        outcome
    }

    /// Applies the answer to a `workspace/configuration` pull.
    ///
    /// The first item holds the requested section and is applied as if the
    /// client had pushed `{ <section>: item }`. Error responses are logged and
    /// otherwise ignored.
    ///
    /// # Errors
    ///
    /// Propagates failures from [`Self::apply_settings`].
    pub fn on_configuration_response(
        &mut self,
        response: &JsonRpcResponse,
    ) -> Result<(), LanguageClientError> {
        if let Some(error) = &response.error {
            warn!(
                target: CLIENT_TARGET,
                code = error.code,
                message = %error.message,
                "configuration request failed"
            );
            return Ok(());
        }

        let Some(section) = response
            .result
            .as_ref()
            .and_then(Value::as_array)
            .and_then(|items| items.first())
        else {
            debug!(target: CLIENT_TARGET, "configuration response carried no settings");
            return Ok(());
        };

        let mut settings = Map::new();
        settings.insert(self.configuration_section().to_owned(), section.clone());
        self.apply_settings(&Value::Object(settings))
    }

    fn toggle_on_type_formatting(&mut self, enable: bool) -> Result<(), LanguageClientError> {
        if !enable {
            return self.unregister_capability(ON_TYPE_FORMATTING_METHOD);
        }
        let options = serde_json::to_value(on_type_formatting_options())
            .map_err(|source| LanguageClientError::encode(ON_TYPE_FORMATTING_METHOD, source))?;
        self.register_capability(ON_TYPE_FORMATTING_METHOD, Some(options))
            .map(|_| ())
    }
}
