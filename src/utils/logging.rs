use std::{path::Path, sync::LazyLock};

use anyhow::Result;
use tracing::level_filters::LevelFilter;
use tracing_appender::rolling::Rotation;
use tracing_subscriber::{
    fmt::{format::FmtSpan, writer::MakeWriterExt},
    EnvFilter,
};

pub const LOG_FILE_PREFIX: &str = "daylog";
const KEPT_LOG_FILES: usize = 7;

#[derive(Debug, Clone, Copy, Default)]
pub struct LogOptions {
    /// Overrides `RUST_LOG`.
    pub level: Option<LevelFilter>,
    /// Mirror the log on stderr. Stdout carries command output only.
    pub console: bool,
}

/// Installs the global subscriber. Logs always go to a daily rolling file under
/// `application_data_path/logs`.
pub fn enable_logging(application_data_path: &Path, options: LogOptions) -> Result<()> {
    let appender = tracing_appender::rolling::Builder::new()
        .rotation(Rotation::DAILY)
        .max_log_files(KEPT_LOG_FILES)
        .filename_prefix(LOG_FILE_PREFIX)
        .build(application_data_path.join("logs"))?;

    let console = options.console;
    let stderr = std::io::stderr.with_filter(move |_| console);

    let level = match options.level {
        Some(level) => level.to_string(),
        None => std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!(
            "{}={level}",
            env!("CARGO_PKG_NAME").replace('-', "_"),
        )))
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(stderr.and(appender))
        .pretty()
        .init();
    Ok(())
}

pub static TEST_LOGGING: LazyLock<()> = LazyLock::new(|| {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::TRACE)
        .with_test_writer()
        .pretty()
        .init()
});
