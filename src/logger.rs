//! Diagnostic logging
//!
//! Logs go to stderr through a `tracing` subscriber so that reports written
//! to stdout stay machine-readable. `--verbose` turns on debug output for
//! this crate, `--quiet` limits it to errors, and otherwise `RUST_LOG` is
//! honoured with a warn-level fallback.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const VERBOSE_FILTER: &str = "cruiser=debug";
const QUIET_FILTER: &str = "cruiser=error";
const DEFAULT_FILTER: &str = "cruiser=warn";

/// Pick the filter for the given verbosity flags. `verbose` wins over `quiet`.
pub fn build_filter(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Install the global subscriber.
///
/// Returns false when a subscriber was already installed, which happens when
/// the library is driven more than once in the same process (tests).
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) -> bool {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    tracing_subscriber::registry()
        .with(build_filter(verbose, quiet))
        .with(fmt_layer)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_wins_over_quiet() {
        let filter = build_filter(true, true);
        assert_eq!(filter.to_string(), VERBOSE_FILTER);
    }

    #[test]
    fn test_quiet_filter() {
        assert_eq!(build_filter(false, true).to_string(), QUIET_FILTER);
    }

    #[test]
    fn test_second_init_is_refused() {
        init_logger(false, false, true);
        assert!(!init_logger(false, false, true));
    }
}
