//! Tick Timer
//!
//! Converts millisecond intervals into 16-bit prescaled timer configurations
//! and provides the blocking wait primitives the scheduler loop runs on.

mod bank;
mod clock;
mod error;
mod prescaler;

pub use bank::{PeriodWait, TimerBank, TimerId};
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use error::TimerError;
pub use prescaler::{Prescaler, TimerConfig};

/// Instruction cycle frequency (72 MHz)
pub const FCY_HZ: u64 = 72_000_000;

/// Maximum value of a 16-bit period register
pub const TIMER_MAX_COUNT: u32 = 0xFFFF;
