use std::io::Write;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::LogConfig;

const LEVEL_FILTER: LevelFilter = if cfg!(debug_assertions) {
    LevelFilter::DEBUG
} else {
    LevelFilter::INFO
};

fn env_filter() -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LEVEL_FILTER.into())
        .from_env_lossy()
}

/// Installs the global subscriber: stderr always, plus a daily rolling `touchspot.log` when
/// file logging is enabled. `RUST_LOG` overrides the build-dependent default level.
pub fn init_log(config: &LogConfig) {
    std::panic::set_hook(Box::new(move |info| {
        tracing::error!("Touchspot panicked: {}", info);
        let _ = writeln!(std::io::stderr(), "Touchspot panicked: {}", info);
    }));

    let file_layer = config.file.then(|| {
        let file_appender = tracing_appender::rolling::daily(&config.directory, "touchspot.log");
        tracing_subscriber::fmt::layer()
            .with_writer(file_appender)
            .with_ansi(false)
            .with_filter(env_filter())
    });

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_thread_names(true)
                .with_filter(env_filter()),
        )
        .with(file_layer)
        .init();
}
