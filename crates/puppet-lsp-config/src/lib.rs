//! Shared configuration for the Puppet language client.
//!
//! Values are layered by `ortho_config`: built-in defaults, then a TOML file
//! (`--config-path` or `PUPPET_LSP_CONFIG_PATH`), then `PUPPET_LSP_*`
//! environment variables, then command-line flags.

mod defaults;
mod logging;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

pub use defaults::{
    DEFAULT_CONFIGURATION_SECTION, DEFAULT_LOG_FILTER, default_configuration_section,
    default_format_on_type, default_log_filter, default_log_filter_string, default_log_format,
};
pub use logging::{LogFormat, LogFormatParseError};

/// Runtime configuration for a language client session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "PUPPET_LSP")]
pub struct Config {
    /// `tracing` filter expression, e.g. `info` or `puppet_lsp_client=debug`.
    #[serde(default = "defaults::default_log_filter_string")]
    pub log_filter: String,
    /// Output format for log events.
    #[serde(default = "defaults::default_log_format")]
    pub log_format: LogFormat,
    /// Section requested through `workspace/configuration`.
    #[serde(default = "defaults::default_configuration_section")]
    pub configuration_section: String,
    /// Initial value of the on-type formatting setting.
    #[serde(default = "defaults::default_format_on_type")]
    pub format_on_type: bool,
}

impl Config {
    /// Filter expression handed to the telemetry subscriber.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Selected log output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Section name used when pulling workspace configuration.
    #[must_use]
    pub fn configuration_section(&self) -> &str {
        &self.configuration_section
    }

    /// Initial on-type formatting value before any client settings arrive.
    #[must_use]
    pub const fn format_on_type(&self) -> bool {
        self.format_on_type
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            configuration_section: default_configuration_section(),
            format_on_type: default_format_on_type(),
        }
    }
}
