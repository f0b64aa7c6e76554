mod commands;
mod handlers;

pub use commands::{Cli, Commands, ServeArgs};
pub use handlers::{handle_init, handle_serve};

use tracing_subscriber::EnvFilter;

pub const DEFAULT_LOG_FILTER: &str = "info";

/// Install the global subscriber. `--log-filter` wins over `RUST_LOG`,
/// which wins over [`DEFAULT_LOG_FILTER`].
pub fn init_logging(cli_filter: Option<&str>) {
    let filter = match cli_filter {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
