//! Logging setup for the fob-infer CLI.
//!
//! Logs go to stderr so that table output on stdout stays machine readable.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const VERBOSE_FILTER: &str = "fob_infer=debug,fob_infer_cli=debug";
const QUIET_FILTER: &str = "fob_infer=error,fob_infer_cli=error";
const DEFAULT_FILTER: &str = "fob_infer=info,fob_infer_cli=info";

/// Initialize the tracing subscriber.
///
/// The level is picked in this order:
/// 1. `--verbose`: debug for the fob-infer crates
/// 2. `--quiet`: errors only
/// 3. `RUST_LOG`
/// 4. info for the fob-infer crates
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let filter = filter_for(verbose, quiet);

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

fn filter_for(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The global subscriber can only be installed once per process, so these
    // only check that the directives parse.

    #[test]
    fn verbose_filter_parses() {
        assert!(EnvFilter::try_new(VERBOSE_FILTER).is_ok());
    }

    #[test]
    fn quiet_and_default_filters_parse() {
        assert!(EnvFilter::try_new(QUIET_FILTER).is_ok());
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
    }
}
