//! Scheduler configuration

use frame_protocol::SampleRate;
use serde::Deserialize;

use crate::error::SchedulerError;

/// Timing of the main loop and its periodic tasks
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Main tick period (ms)
    pub tick_period_ms: u16,
    /// Heartbeat indicator toggle interval (ms)
    pub heartbeat_interval_ms: u16,
    /// Magnetometer acquisition interval (ms)
    pub acquire_interval_ms: u16,
    /// Heading frame interval (ms)
    pub heading_interval_ms: u16,
    /// Simulated algorithm workload per tick (ms)
    pub workload_ms: u16,
    /// Data frame rate at startup
    pub default_rate: SampleRate,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_period_ms: 10,
            heartbeat_interval_ms: 500,
            acquire_interval_ms: 40, // 25 Hz, the sensor's output data rate
            heading_interval_ms: 200,
            workload_ms: 7,
            default_rate: SampleRate::DEFAULT,
        }
    }
}

/// Tick thresholds derived from a [`SchedulerConfig`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Thresholds {
    pub ticks_per_second: u16,
    pub heartbeat: u16,
    pub acquire: u16,
    pub heading: u16,
}

impl SchedulerConfig {
    pub(crate) fn thresholds(&self) -> Result<Thresholds, SchedulerError> {
        let tick = self.tick_period_ms;
        if tick == 0 {
            return Err(SchedulerError::ZeroTickPeriod);
        }

        let ticks_for = |task: &'static str, interval_ms: u16| {
            let ticks = interval_ms / tick;
            if ticks == 0 {
                Err(SchedulerError::ZeroThreshold {
                    task,
                    interval_ms,
                    tick_ms: tick,
                })
            } else {
                Ok(ticks)
            }
        };

        let ticks_per_second = 1000 / tick;
        let fastest = SampleRate::VALID_HZ.iter().copied().max().unwrap_or(1) as u16;
        if ticks_per_second < fastest {
            return Err(SchedulerError::ZeroThreshold {
                task: "data send",
                interval_ms: 1000 / fastest,
                tick_ms: tick,
            });
        }

        Ok(Thresholds {
            ticks_per_second,
            heartbeat: ticks_for("heartbeat", self.heartbeat_interval_ms)?,
            acquire: ticks_for("acquisition", self.acquire_interval_ms)?,
            heading: ticks_for("heading send", self.heading_interval_ms)?,
        })
    }
}
