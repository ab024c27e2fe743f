//! Structured logging initialization for the payload camera CLI.
//!
//! Diagnostics always go to stderr so that robot-mode JSON on stdout stays
//! machine-parseable.

use std::io::{self, IsTerminal};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Initialize the tracing subscriber based on CLI flags and environment.
///
/// * `robot_mode` - emit JSON log lines for machine consumption
/// * `verbose` - verbosity level: 0 = info, 1 = debug, 2+ = trace
/// * `quiet` - only errors
///
/// `RUST_LOG` overrides the default filter (e.g.
/// `aircam=debug,libloading=warn`).
pub fn init_logging(robot_mode: bool, verbose: u8, quiet: bool) {
    let default_directive = if quiet {
        "aircam=error"
    } else {
        match verbose {
            0 => "aircam=info",
            1 => "aircam=debug",
            _ => "aircam=trace",
        }
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    if robot_mode {
        let fmt_layer = fmt::layer()
            .json()
            .with_target(true)
            .with_file(false)
            .with_line_number(false)
            .with_thread_ids(false)
            .with_span_events(FmtSpan::NONE)
            .with_writer(io::stderr);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    } else if io::stderr().is_terminal() {
        let fmt_layer = fmt::layer()
            .with_target(false)
            .with_file(false)
            .with_line_number(false)
            .with_thread_ids(false)
            .with_span_events(FmtSpan::NONE)
            .with_writer(io::stderr);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    } else {
        // Piped or redirected stderr gets compact plain output.
        let fmt_layer = fmt::layer()
            .with_ansi(false)
            .with_target(false)
            .with_file(false)
            .with_line_number(false)
            .with_thread_ids(false)
            .with_span_events(FmtSpan::NONE)
            .compact()
            .with_writer(io::stderr);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}
