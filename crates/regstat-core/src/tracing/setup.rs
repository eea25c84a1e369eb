//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Initialize the regstat tracing/logging system.
///
/// Reads `REGSTAT_LOG` for per-subsystem log levels, e.g.
/// `REGSTAT_LOG=regstat_storage=debug,regstat_analysis=info`.
///
/// Falls back to `regstat=info` if `REGSTAT_LOG` is not set or is invalid.
/// Idempotent.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("REGSTAT_LOG")
            .unwrap_or_else(|_| EnvFilter::new("regstat=info"));

        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .try_init();
    });
}
