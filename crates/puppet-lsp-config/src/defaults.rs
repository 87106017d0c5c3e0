//! Built-in defaults shared by the configuration layers.

/// Default log filter expression.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Workspace configuration section requested from the client.
pub const DEFAULT_CONFIGURATION_SECTION: &str = "puppet";

/// Default log filter expression.
#[must_use]
pub fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format.
#[must_use]
pub fn default_log_format() -> crate::logging::LogFormat {
    crate::logging::LogFormat::Json
}

/// Owned configuration section name used by serde.
#[must_use]
pub fn default_configuration_section() -> String {
    DEFAULT_CONFIGURATION_SECTION.to_owned()
}

/// On-type formatting stays off until the client asks for it.
#[must_use]
pub const fn default_format_on_type() -> bool {
    false
}
