use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Logs go to stderr; stdout carries the report.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = std::env::var("LZRGUN_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .map_or_else(
            |_| EnvFilter::new(default),
            |value| EnvFilter::try_new(value).unwrap_or_else(|_| EnvFilter::new(default)),
        );

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set global default subscriber: {}", err);
    }
}
