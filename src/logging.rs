/// Initializes tracing for normal runs. The log level comes from the
/// RUST_LOG environment variable (e.g. RUST_LOG=sprig=trace).
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}

/// Initializes tracing for tests: trace-level output, routed through the
/// test writer so it only shows up alongside failures. Safe to call from
/// every test; only the first call does anything.
#[cfg(test)]
pub fn init_test_logging() {
    static TRACING_INIT: std::sync::Once = std::sync::Once::new();
    TRACING_INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("trace")
            .with_test_writer()
            .try_init()
            .ok();
    });
}
