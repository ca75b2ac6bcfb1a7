use std::sync::Once;

use tracing_subscriber::{EnvFilter, fmt};

static TRACING_INIT: Once = Once::new();

/// Install the global tracing subscriber, writing to stderr.
///
/// `RUST_LOG` wins when set; otherwise the crate logs at `info`, or `debug`
/// when `verbose` is on. Later calls are no-ops.
pub fn init_tracing(verbose: bool) {
    TRACING_INIT.call_once(|| {
        let default_level = if verbose { "debug" } else { "info" };
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("expense_tracker={default_level}")));

        // Another subscriber may already be installed (e.g. by a test harness).
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_twice_does_not_panic() {
        super::init_tracing(false);
        super::init_tracing(true);
    }
}
