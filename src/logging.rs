//! Logging setup for hosts embedding placeview.
//!
//! Everything in the crate logs through `tracing`. Nothing is printed until
//! the host installs a subscriber, either its own or the one below.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install a compact fmt subscriber filtered by `RUST_LOG`.
///
/// Falls back to `placeview=info`, or `placeview=debug` when `verbose`.
/// Logs go to stderr so they do not interleave with the rendered frame.
/// Does nothing if a global subscriber is already set.
pub fn init_logging(verbose: bool) {
    let default_filter = if verbose { "placeview=debug" } else { "placeview=info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init();
}
