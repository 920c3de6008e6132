// src/utils/logging.rs
use tracing_subscriber::{fmt, EnvFilter};

/// Sets up the logging framework using tracing_subscriber.
/// Filters come from `RUST_LOG` when it is set; otherwise `default_level`
/// is applied to this crate only, keeping reqwest/hyper chatter out.
pub fn setup_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("warn,{}={}", env!("CARGO_CRATE_NAME"), default_level))
    });

    fmt().with_env_filter(filter).with_target(false).init();

    tracing::debug!("Logging setup complete (default level: {}).", default_level);
}
