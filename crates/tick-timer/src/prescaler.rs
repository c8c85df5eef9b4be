//! Prescaler Selection

use std::time::Duration;

use crate::error::TimerError;
use crate::{FCY_HZ, TIMER_MAX_COUNT};

/// Clock dividers available to a 16-bit timer, smallest first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prescaler {
    /// 1:1
    Div1,
    /// 1:8
    Div8,
    /// 1:64
    Div64,
    /// 1:256
    Div256,
}

impl Prescaler {
    /// Search order used when selecting a divider
    pub const ALL: [Prescaler; 4] = [
        Prescaler::Div1,
        Prescaler::Div8,
        Prescaler::Div64,
        Prescaler::Div256,
    ];

    /// Division factor
    pub fn divisor(&self) -> u32 {
        match self {
            Prescaler::Div1 => 1,
            Prescaler::Div8 => 8,
            Prescaler::Div64 => 64,
            Prescaler::Div256 => 256,
        }
    }

    /// TCKPS register bits
    pub fn tckps(&self) -> u8 {
        match self {
            Prescaler::Div1 => 0b00,
            Prescaler::Div8 => 0b01,
            Prescaler::Div64 => 0b10,
            Prescaler::Div256 => 0b11,
        }
    }
}

/// Period register setting for one timer channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerConfig {
    /// Selected clock divider
    pub prescaler: Prescaler,
    /// Period register value (prescaled cycles)
    pub period_counts: u16,
}

impl TimerConfig {
    /// Pick the first prescaler whose prescaled cycle count fits the period register
    pub fn for_duration(ms: u16) -> Result<Self, TimerError> {
        if ms == 0 {
            return Err(TimerError::ZeroDuration);
        }

        let required_cycles = ms as u64 * (FCY_HZ / 1000);

        Prescaler::ALL
            .iter()
            .find_map(|&prescaler| {
                let counts = required_cycles / prescaler.divisor() as u64;
                (counts <= TIMER_MAX_COUNT as u64).then_some(Self {
                    prescaler,
                    period_counts: counts as u16,
                })
            })
            .ok_or(TimerError::Unsatisfiable { ms })
    }

    /// Real time covered by one period at the instruction clock
    pub fn period(&self) -> Duration {
        let cycles = self.period_counts as u64 * self.prescaler.divisor() as u64;
        Duration::from_nanos(cycles * 1_000_000_000 / FCY_HZ)
    }
}
