use tracing_subscriber::EnvFilter;

/// Logs to stderr so that stdout only carries the request preview.
pub fn setup_tracing() {
    let filter = EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
