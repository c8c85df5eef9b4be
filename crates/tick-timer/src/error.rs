//! Timer Error Types

use thiserror::Error;

/// Errors raised when validating a timer configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimerError {
    /// No prescaler brings the interval within the 16-bit period register
    #[error("{ms}ms does not fit a 16-bit timer with any prescaler")]
    Unsatisfiable { ms: u16 },

    /// A zero-length period would expire continuously
    #[error("Timer interval must be at least 1ms")]
    ZeroDuration,
}
