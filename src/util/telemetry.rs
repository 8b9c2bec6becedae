//! Telemetry helpers for structured logging and tracing.

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "dungeon_queue=info";

/// Initialize tracing/telemetry. Users can install their own subscriber; this
/// helper installs an env-based subscriber if none is set, falling back to
/// [`DEFAULT_FILTER`].
pub fn init_tracing() {
    if tracing::dispatcher::has_been_set() {
        return;
    }
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
