use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "SKT_LOG";

/// Logs go to stderr so stdout stays readable. `SKT_LOG` wins over `--verbose`.
pub fn init(verbose: bool) {
    let fallback = if verbose { "skt=debug,info" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
