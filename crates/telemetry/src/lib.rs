//! Tracing bootstrap shared by the server and CLI binaries.

use booklens_kernel::settings::{LogFormat, TelemetrySettings};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber. `RUST_LOG` wins over the configured filter.
///
/// Events are written to stderr; stdout belongs to command output.
pub fn init(settings: &TelemetrySettings) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.filter))
        .map_err(|e| anyhow::anyhow!("invalid log filter '{}': {}", settings.filter, e))?;

    let registry = tracing_subscriber::registry().with(filter);

    let result = match settings.log_format {
        LogFormat::Pretty => registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };

    // A subscriber installed earlier (tests, embedding) is not an error.
    if result.is_err() {
        tracing::debug!(target: "booklens-telemetry", "global subscriber already installed");
    }

    tracing::info!(
        target: "booklens-telemetry",
        format = ?settings.log_format,
        "telemetry initialized"
    );
    Ok(())
}
