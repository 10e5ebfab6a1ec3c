use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

use crate::config::ObservabilityConfig;
use crate::constants::NETWORK_NAME;
use crate::workflow::TransferRequest;

/// Initialize structured logging.
///
/// `RUST_LOG` wins over the configured level when set. Logs go to stderr so
/// status lines on stdout stay machine-readable.
pub fn init_telemetry(observability: &ObservabilityConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&observability.log_level))?;

    if observability.json_logs {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_writer(std::io::stderr),
            )
            .with(filter)
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .with(filter)
            .try_init()?;
    }

    tracing::debug!("focus-recover telemetry initialized");
    Ok(())
}

/// Generate a correlation ID linking every log line of one run
pub fn generate_correlation_id() -> String {
    Uuid::new_v4().to_string()
}

/// Span covering one transfer run. Request values stay out of the logs.
pub fn create_transfer_span(correlation_id: &str, request: &TransferRequest) -> tracing::Span {
    tracing::info_span!(
        "transfer_workflow",
        correlation.id = correlation_id,
        network = NETWORK_NAME,
        include_eth = request.include_residual_balance(),
    )
}
