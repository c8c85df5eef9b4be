//! Node Error Types

use serial_link::LinkError;
use telemetry_scheduler::SchedulerError;
use thiserror::Error;

/// Startup and runtime errors of the host process
#[derive(Debug, Error)]
pub enum NodeError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid log level: {0}")]
    LogLevel(String),

    #[error("Logging setup failed: {0}")]
    Logging(#[from] tracing::subscriber::SetGlobalDefaultError),

    #[error("Serial port error: {0}")]
    Serial(#[from] tokio_serial::Error),

    #[error("Serial link error: {0}")]
    Link(#[from] LinkError),

    #[error("Scheduler error: {0}")]
    Scheduler(#[from] SchedulerError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
