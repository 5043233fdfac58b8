//! Logging setup
//!
//! Logs go to stderr so they never interleave with the prompt on stdout.

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::EnvFilter;

/// Installs the global tracing subscriber
///
/// The default level is `warn`, or `debug` when `verbose` is set. `RUST_LOG`
/// overrides both.
///
/// # Errors
/// Returns an error if a global subscriber is already installed.
pub fn init(verbose: bool) -> Result<(), TryInitError> {
    let default_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };

    let env_filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish()
        .try_init()
}
