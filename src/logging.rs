//! Sets up where log messages go and which are kept.

use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Install a global subscriber that writes log messages to stderr.
///
/// `filter` uses the `RUST_LOG` directive syntax, e.g. `info` or
/// `finance_tracker=debug`. Invalid directives are ignored, falling back to
/// `info` if none remain.
///
/// Stdout is left free for the output of the command line interface.
/// Calling this function more than once has no further effect.
pub fn setup_logging(filter: &str) {
    let env_filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .parse_lossy(filter);

    let stderr_log = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(env_filter);

    // Errors if a global subscriber is already set.
    let _ = tracing_subscriber::registry().with(stderr_log).try_init();
}
