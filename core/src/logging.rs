//! Tracing initialisation for the command-line tools.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding the log filter, e.g. `ALSTREAM_LOG=alstream_core=debug`.
pub const LOG_ENV: &str = "ALSTREAM_LOG";

static INIT: Once = Once::new();

/// Install the stderr subscriber. Later calls are no-ops.
///
/// Falls back to `info` for this workspace's crates when [`LOG_ENV`] is
/// unset or unparsable.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
            EnvFilter::new("alstream_core=info,alstream_launch=info,alstream_tradeoff=info")
        });

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true),
            )
            .with(filter)
            .init();
    });
}
