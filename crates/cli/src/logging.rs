use crate::config::LoggingConfig;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Layer};

/// Build the env filter: `RUST_LOG` wins, otherwise the most verbose level
/// enabled in the config.
fn build_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.levels.filter_directive()))
}

/// Install the global subscriber. Logs go to stderr so stdout stays clean for
/// results.
pub fn init_logging(config: &LoggingConfig) {
    let filter = build_filter(config);

    let show_file = config.format.location.show_file;
    let show_line = config.format.location.show_line;

    // Use Layer::boxed() to unify the types of the if/else branches
    let fmt_layer = if !config.format.show_time {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(show_file)
            .with_file(show_file)
            .with_line_number(show_line)
            .without_time()
            .boxed()
    } else {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(show_file)
            .with_file(show_file)
            .with_line_number(show_line)
            .boxed()
    };

    // try_init: tests may have installed a subscriber already
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
