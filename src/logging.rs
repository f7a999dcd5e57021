use std::sync::Once;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

static INIT: Once = Once::new();

pub const LOG_ENV: &str = "AIRSAT_LOG";
const DEFAULT_FILTER: &str = "airsat_ipa=info";

/// Installs the global subscriber. `AIRSAT_LOG` takes an `EnvFilter`
/// directive (e.g. `airsat_ipa=debug`); invalid or missing values fall back
/// to `airsat_ipa=info`. Safe to call more than once.
pub fn init_logging() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .with(filter)
            .init();
    });
}
