//! Telemetry Scheduler
//!
//! The fixed-period main loop: on every tick it runs the simulated workload,
//! services inbound commands, samples the magnetometer and streams averaged
//! readings and the heading angle at their own cadences.

mod cadence;
mod config;
mod error;
mod indicators;
mod scheduler;
mod source;

pub use cadence::Cadence;
pub use config::SchedulerConfig;
pub use error::SchedulerError;
pub use indicators::{Indicators, LedIndicators};
pub use scheduler::{Scheduler, TickReport};
pub use source::MagSource;

/// Timer channel driving the main tick
pub const TICK_TIMER: tick_timer::TimerId = tick_timer::TimerId::Timer1;

/// Timer channel used for the simulated workload delay
pub const WORKLOAD_TIMER: tick_timer::TimerId = tick_timer::TimerId::Timer2;
