use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, LoggingConfig};

/// Install the global subscriber
///
/// Output goes to stderr; stdout is reserved for the dashboard and copied secrets.
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let (json, compact) = match config.format {
        LogFormat::Json => (
            Some(fmt::layer().json().with_writer(std::io::stderr)),
            None,
        ),
        LogFormat::Pretty => (
            None,
            Some(
                fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            ),
        ),
    };

    if let Err(e) = tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(compact)
        .try_init()
    {
        eprintln!("Logging already initialized: {}", e);
        return;
    }

    tracing::debug!(
        "Logging initialized with level: {} ({:?})",
        config.level,
        config.format
    );
}
