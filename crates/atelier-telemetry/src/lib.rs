//! Log setup for the relay
//!
//! Installs a `tracing-subscriber` registry with an `EnvFilter` and a `fmt`
//! layer, in plain text or one JSON object per line.

use atelier_config::{LogFormat, TelemetryConfig};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Pick the filter directive: explicit override first, then configuration
pub fn resolve_filter<'a>(config: &'a TelemetryConfig, override_filter: Option<&'a str>) -> &'a str {
    override_filter
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .unwrap_or(config.log_filter.as_str())
}

/// Initialize global logging
///
/// `override_filter` (from the command line or `ATELIER_LOG`) takes
/// precedence over the configured filter. An unparsable filter falls back
/// to `info`.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed
pub fn init(config: &TelemetryConfig, override_filter: Option<&str>) -> anyhow::Result<()> {
    let directive = resolve_filter(config, override_filter);
    let filter = EnvFilter::try_new(directive).unwrap_or_else(|e| {
        eprintln!("invalid log filter '{directive}' ({e}), falling back to 'info'");
        EnvFilter::new("info")
    });

    let registry = tracing_subscriber::registry().with(filter);

    let result = match config.log_format {
        LogFormat::Text => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false),
            )
            .try_init(),
    };

    result.map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))
}
