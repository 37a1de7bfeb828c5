//! Diagnostic logging setup.
//!
//! Library crates only emit `tracing` events; the binary installs a
//! subscriber here. The filter comes from `SYLLOGE_LOG` when set, otherwise
//! from the command-line verbosity. Logs go to stderr so they never mix with
//! the dialog on stdout.

use std::io;

use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive.
pub const LOG_ENV: &str = "SYLLOGE_LOG";

/// Maps `-q`/`-v` counts to a default filter directive.
///
/// `quiet` wins over `verbose`.
#[must_use]
pub fn default_directive(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Installs the global subscriber.
///
/// Does nothing if a subscriber is already installed.
pub fn init(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}
