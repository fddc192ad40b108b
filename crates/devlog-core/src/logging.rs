//! Structured logging with `tracing`.
//!
//! Every devlog surface logs to stderr only. Standard output belongs to
//! command results and to the context block injected at session start, so a
//! stray log line there would corrupt what the assistant reads.

use tracing_subscriber::EnvFilter;

/// Default minimum level when neither `RUST_LOG` nor settings override it.
pub const DEFAULT_LEVEL: &str = "warn";

/// Build the filter: `RUST_LOG` wins, then `level`, then [`DEFAULT_LEVEL`].
pub fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
}

/// Initialize the global tracing subscriber with stderr output only.
///
/// Call once at application startup. Subsequent calls are no-ops.
///
/// # Arguments
///
/// * `level` - Minimum log level to display, e.g. `"warn"` or `"devlog_events=debug"`.
pub fn init_subscriber(level: &str) {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(build_filter(level))
        .with_target(true)
        .with_writer(std::io::stderr)
        .compact();

    // no-op if a global default is already set
    let _ = subscriber.try_init();
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
