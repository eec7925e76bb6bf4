//! Tracing setup shared by the binaries.

use tracing_subscriber::EnvFilter;

use crate::progress;

/// Debug output from the HTTP and HTML stacks drowns the per-track lines.
const VERBOSE_FILTER: &str = "debug,hyper=info,hyper_util=info,reqwest=info,html5ever=info,selectors=info";

/// Default filter for the `-v` / `-q` flags. `-v` wins over `-q`.
pub fn level_for(verbose: bool, quiet: bool) -> &'static str {
    if verbose {
        VERBOSE_FILTER
    } else if quiet {
        "error"
    } else {
        "info"
    }
}

/// Install the stderr subscriber. `RUST_LOG` overrides the flags.
///
/// Verbose and quiet runs are log-only: progress bars stay hidden.
pub fn init(verbose: bool, quiet: bool) {
    progress::set_log_only(verbose || quiet);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(level_for(verbose, quiet))),
        )
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .init();
}
