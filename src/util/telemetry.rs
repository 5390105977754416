//! Telemetry helpers for structured logging.
//!
//! The queue core logs every best-effort persistence failure through
//! `tracing`; embedding applications that have not installed their own
//! subscriber can call [`init_tracing`] once at startup.

/// Initialize tracing/telemetry. Embedders can install their own subscriber;
/// this helper installs a default env-filtered subscriber if none is set.
pub fn init_tracing() {
    if tracing::dispatcher::has_been_set() {
        return;
    }
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
