use tracing_subscriber::EnvFilter;

/// Default filter used when `RUST_LOG` is not set.
const DEFAULT_FILTER: &str = "info";

/// Install the global `tracing` subscriber.
///
/// `verbosity` raises the default level: 0 = info, 1 = debug, 2+ = trace.
/// `RUST_LOG` always wins when present.
pub fn init(verbosity: u8) {
    let default = match verbosity {
        0 => DEFAULT_FILTER,
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
