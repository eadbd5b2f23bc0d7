//! Console logging for a digest run. `RUST_LOG` overrides the crate default.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const QUIET_FILTER: &str = "bestseller_digest=info";
const VERBOSE_FILTER: &str = "bestseller_digest=debug,info";

pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        VERBOSE_FILTER
    } else {
        QUIET_FILTER
    }
}

/// Compact single-line output, or JSON lines when a scheduler collects stdout.
pub fn init_logger(verbose: bool, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));
    let layer = fmt::layer().with_target(false);

    // Only the first call installs a subscriber; later calls are ignored.
    let result = if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(layer.json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(layer.compact())
            .try_init()
    };

    if let Err(e) = result {
        tracing::debug!("Logger already initialised: {}", e);
    }
}
