//! Logging setup for the command-line tool.
//!
//! Library code only emits `tracing` events; installing a subscriber is left
//! to the binary. Logs go to stderr so that generated options, catalogs and
//! JSON stay alone on stdout.

use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive, e.g. `lhcbdata=debug`.
pub const LOG_ENV: &str = "LHCBDATA_LOG";

/// Installs the global subscriber.
///
/// The filter comes from [`LOG_ENV`] when set; otherwise `debug` with
/// `verbose`, `warn` without. Returns `false` if a subscriber was already
/// installed.
pub fn init_logging(verbose: bool) -> bool {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}
