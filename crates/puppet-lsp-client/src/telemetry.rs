//! Log output for processes that embed the language client.
//!
//! Events are written to stderr; stdout belongs to the protocol stream.

use std::io::{self, IsTerminal};

use once_cell::sync::OnceCell;
use puppet_lsp_config::{Config, LogFormat};
use tracing::Subscriber;
use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::filter::{EnvFilter, ParseError};
use tracing_subscriber::fmt::{self, time::UtcTime};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{Layer, Registry};

static INSTALLED_FORMAT: OnceCell<LogFormat> = OnceCell::new();

/// Evidence that the process-wide subscriber is installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TelemetryHandle {
    format: LogFormat,
}

impl TelemetryHandle {
    /// Output format chosen by the call that installed the subscriber.
    #[must_use]
    pub const fn format(&self) -> LogFormat {
        self.format
    }
}

/// Errors raised while setting up log output.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The configured filter expression does not parse.
    #[error("invalid log filter '{filter}': {source}")]
    Filter {
        /// The rejected expression.
        filter: String,
        /// Parser failure.
        #[source]
        source: ParseError,
    },
    /// Something else in the process installed a subscriber first.
    #[error("another tracing subscriber is already installed: {0}")]
    AlreadyInstalled(#[source] SetGlobalDefaultError),
}

/// Installs the global subscriber described by `config` once per process.
///
/// Later calls ignore `config` and report the format already in use.
///
/// # Examples
///
/// ```rust
/// use puppet_lsp_client::telemetry;
/// use puppet_lsp_config::{Config, LogFormat};
///
/// # fn main() -> Result<(), telemetry::TelemetryError> {
/// let handle = telemetry::initialise(&Config::default())?;
/// assert_eq!(handle.format(), LogFormat::Json);
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns [`TelemetryError`] when the filter is invalid or another
/// subscriber is already installed.
pub fn initialise(config: &Config) -> Result<TelemetryHandle, TelemetryError> {
    INSTALLED_FORMAT
        .get_or_try_init(|| {
            tracing::subscriber::set_global_default(subscriber(config)?)
                .map_err(TelemetryError::AlreadyInstalled)?;
            Ok(config.log_format())
        })
        .map(|format| TelemetryHandle { format: *format })
}

/// Builds the subscriber for `config` without installing it.
///
/// # Errors
///
/// Returns [`TelemetryError::Filter`] when the filter does not parse.
pub fn subscriber(config: &Config) -> Result<impl Subscriber + Send + Sync, TelemetryError> {
    let filter =
        EnvFilter::try_new(config.log_filter()).map_err(|source| TelemetryError::Filter {
            filter: config.log_filter().to_owned(),
            source,
        })?;
    Ok(Registry::default().with(output_layer(config.log_format()).with_filter(filter)))
}

fn output_layer(format: LogFormat) -> Box<dyn Layer<Registry> + Send + Sync> {
    let layer = fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_timer(UtcTime::rfc_3339())
        .with_target(true);
    match format {
        LogFormat::Json => layer.json().flatten_event(true).boxed(),
        LogFormat::Compact => layer.compact().boxed(),
    }
}
