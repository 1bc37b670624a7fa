//! Tracing subscriber setup.
//!
//! `RUST_LOG` overrides the defaults:
//! ```bash
//! RUST_LOG=lite_core=debug lite unpack report.b3d
//! RUST_LOG=lite_archive=trace,lite_core=debug lite inspect report.b3d
//! ```

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Library crates below `lite_core` only surface warnings, such as cleanup failures.
const LIBRARY_DIRECTIVES: &str = "lite_fs=warn,lite_archive=warn";

fn default_filter() -> EnvFilter {
    let level = if cfg!(debug_assertions) { "debug" } else { "info" };
    EnvFilter::new(format!("lite={level},lite_core={level},{LIBRARY_DIRECTIVES}"))
}

/// Compact output without file and line.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter());

    let subscriber = tracing_subscriber::registry().with(filter).with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_file(false)
            .with_line_number(false)
            .compact(),
    );

    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Everything from the workspace crates, with file, line and thread ids.
pub fn init_verbose() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("lite=trace,lite_core=trace,lite_archive=trace,lite_fs=trace")
    });

    let subscriber = tracing_subscriber::registry().with(filter).with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true),
    );

    let _ = tracing::subscriber::set_global_default(subscriber);
}
