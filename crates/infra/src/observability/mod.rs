//! Tracing subscriber setup
//!
//! Library code only emits `tracing` events; the host application installs a
//! subscriber once at startup.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber
///
/// `RUST_LOG` takes precedence over `default_filter` (for example
/// `"wastewise_infra=info,wastewise_core=info"`). With `json` set, events are
/// written as one JSON object per line.
///
/// Returns `false` if a global subscriber was already installed.
pub fn init_tracing(default_filter: &str, json: bool) -> bool {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = if json {
        registry.with(tracing_subscriber::fmt::layer().json()).try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };
    result.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_reports_existing_subscriber() {
        init_tracing("wastewise_infra=debug", false);
        assert!(!init_tracing("wastewise_infra=debug", true));
    }
}
