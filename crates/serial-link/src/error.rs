//! Serial Link Error Types

use thiserror::Error;

/// Errors starting or stopping the interrupt context
#[derive(Debug, Error)]
pub enum LinkError {
    /// The interrupt worker thread could not be started
    #[error("Failed to start serial interrupt worker: {0}")]
    Spawn(#[from] std::io::Error),

    /// The interrupt worker panicked
    #[error("Serial interrupt worker panicked")]
    WorkerPanicked,
}
