use std::sync::Once;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::DEFAULT_LOG_FILTER;

static INIT_TRACING: Once = Once::new();

/// Pick the log filter: an explicit directive string first, then `RUST_LOG`,
/// then [`DEFAULT_LOG_FILTER`]. An unparsable explicit filter falls through and
/// its parse error is returned alongside.
pub fn build_filter(explicit: Option<&str>) -> (EnvFilter, Option<String>) {
    let mut rejected = None;
    if let Some(directives) = explicit {
        match EnvFilter::try_new(directives) {
            Ok(filter) => return (filter, None),
            Err(e) => rejected = Some(format!("{:?}: {}", directives, e)),
        }
    }
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    (filter, rejected)
}

/// Install the global tracing subscriber once; later calls are ignored.
pub fn init_tracing(explicit: Option<&str>) {
    INIT_TRACING.call_once(|| {
        let (filter, rejected) = build_filter(explicit);
        let shown = filter.to_string();

        if tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init()
            .is_err()
        {
            warn!("a tracing subscriber was already installed; keeping it");
            return;
        }
        info!("render gateway logging with filter {}", shown);
        if let Some(reason) = rejected {
            warn!("ignored invalid log filter {}", reason);
        }
    });
}
