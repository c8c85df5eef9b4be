//! Scheduler Error Types

use thiserror::Error;
use tick_timer::TimerError;

/// Configuration errors detected before the loop starts
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    /// An interval shorter than one tick would never fire
    #[error("{task} interval {interval_ms}ms is shorter than the {tick_ms}ms tick")]
    ZeroThreshold {
        task: &'static str,
        interval_ms: u16,
        tick_ms: u16,
    },

    /// The tick period itself is zero
    #[error("Tick period must be at least 1ms")]
    ZeroTickPeriod,

    /// The tick or workload interval cannot be programmed into a timer
    #[error("Timer configuration error: {0}")]
    Timer(#[from] TimerError),
}
