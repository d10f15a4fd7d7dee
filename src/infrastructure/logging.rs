use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, LoggingConfig};

/// Install the global subscriber. `RUST_LOG` wins over the configured level;
/// `verbose` raises the configured level to `debug`.
pub fn init_logging(config: &LoggingConfig, verbose: bool) {
    let level = effective_level(config, verbose);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // try_init: a second call (tests, repeated runs) keeps the first subscriber
    let result = match config.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).without_time())
            .try_init(),
    };

    if result.is_ok() {
        tracing::debug!("Logging initialized with level: {}", level);
    }
}

fn effective_level(config: &LoggingConfig, verbose: bool) -> &str {
    if verbose {
        "debug"
    } else {
        &config.level
    }
}
