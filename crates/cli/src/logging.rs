use std::path::Path;
use thiserror::Error;
use tracing::subscriber::DefaultGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter};

/// e.g. `10/18/2026 03:04:05 PM`
const TIMESTAMP_FORMAT: &str = "%m/%d/%Y %I:%M:%S %p";

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("log file path has no file name: {0}")]
    InvalidPath(String),

    #[error("failed to open log file: {0}")]
    Appender(#[from] InitError),
}

/// Logging state of one run: every event goes to stdout and is appended to
/// the log file, both timestamped and leveled.
///
/// The subscriber is installed as the default for the current thread only
/// while this value is alive.
pub struct LoggingContext {
    _guard: DefaultGuard,
}

impl LoggingContext {
    pub fn init(log_file: &Path) -> Result<Self, LoggingError> {
        let file_name = log_file
            .file_name()
            .ok_or_else(|| LoggingError::InvalidPath(log_file.display().to_string()))?;
        let directory = log_file
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let file_appender = RollingFileAppender::builder()
            .rotation(Rotation::NEVER)
            .filename_prefix(file_name.to_string_lossy().into_owned())
            .build(directory)?;

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let timer = ChronoLocal::new(TIMESTAMP_FORMAT.to_string());

        let subscriber = tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_timer(timer.clone())
                    .with_target(false)
                    .with_writer(std::io::stdout),
            )
            .with(
                fmt::layer()
                    .with_timer(timer)
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(file_appender),
            );

        Ok(Self {
            _guard: tracing::subscriber::set_default(subscriber),
        })
    }
}
