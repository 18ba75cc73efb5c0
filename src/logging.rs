//! Sets up `tracing` output for the console.
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "warn,chat_commands=info";
const VERBOSE_FILTER: &str = "info,chat_commands=debug";

/// Picks the filter: `--verbose` wins, then `RUST_LOG`, then the default.
fn filter(verbose: bool) -> EnvFilter {
    if verbose {
        return EnvFilter::new(VERBOSE_FILTER);
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the global subscriber, writing to stderr so command output on
/// stdout stays clean. Calling it twice is harmless.
pub fn init(verbose: bool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
