//! Timer Bank Implementation

use std::time::Duration;
use tracing::{trace, warn};

use crate::clock::Clock;
use crate::prescaler::TimerConfig;

/// Hardware timer channels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerId {
    Timer1,
    Timer2,
    Timer3,
    Timer4,
}

impl TimerId {
    fn index(self) -> usize {
        match self {
            TimerId::Timer1 => 0,
            TimerId::Timer2 => 1,
            TimerId::Timer3 => 2,
            TimerId::Timer4 => 3,
        }
    }
}

/// Outcome of waiting for a period boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodWait {
    /// The boundary was still ahead; the caller blocked until it
    Waited,
    /// The boundary had already passed on entry; returned without blocking
    Overrun,
}

impl PeriodWait {
    /// Whether the previous period's work overran the boundary
    pub fn is_overrun(&self) -> bool {
        matches!(self, PeriodWait::Overrun)
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Channel {
    config: Option<TimerConfig>,
    /// Next time the period flag gets raised, `None` while stopped
    next_boundary: Option<Duration>,
}

/// Four independent periodic timers sharing one time source
pub struct TimerBank<C: Clock> {
    clock: C,
    channels: [Channel; 4],
}

impl<C: Clock> TimerBank<C> {
    /// Create a bank with every channel stopped
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            channels: [Channel::default(); 4],
        }
    }

    /// Configure and start a periodic channel
    ///
    /// An interval no prescaler can represent leaves the channel untouched.
    pub fn configure(&mut self, id: TimerId, ms: u16) {
        let config = match TimerConfig::for_duration(ms) {
            Ok(config) => config,
            Err(e) => {
                warn!("{:?} left unchanged: {}", id, e);
                return;
            }
        };

        trace!(
            "{:?}: PR={} prescaler 1:{}",
            id,
            config.period_counts,
            config.prescaler.divisor()
        );
        self.channels[id.index()] = Channel {
            config: Some(config),
            next_boundary: Some(self.clock.now() + config.period()),
        };
    }

    /// Wait for the channel's next period boundary
    ///
    /// Returns [`PeriodWait::Overrun`] without blocking when the boundary had
    /// already passed; the pending flag is consumed and the channel keeps its
    /// original phase. A stopped channel also reports an overrun.
    pub fn wait_period(&mut self, id: TimerId) -> PeriodWait {
        let channel = &mut self.channels[id.index()];
        let (Some(config), Some(boundary)) = (channel.config, channel.next_boundary) else {
            warn!("{:?} is not running", id);
            return PeriodWait::Overrun;
        };
        let period = config.period();
        let now = self.clock.now();

        if now >= boundary {
            let missed = ((now - boundary).as_nanos() / period.as_nanos()) as u32;
            channel.next_boundary = Some(boundary + period * (missed + 1));
            return PeriodWait::Overrun;
        }

        self.clock.sleep_until(boundary);
        channel.next_boundary = Some(boundary + period);
        PeriodWait::Waited
    }

    /// One-shot delay that restarts `id` with a fresh interval and stops it afterwards
    pub fn wait_ms(&mut self, id: TimerId, ms: u16) {
        let Ok(config) = TimerConfig::for_duration(ms) else {
            warn!("{:?} cannot delay {}ms", id, ms);
            return;
        };

        let deadline = self.clock.now() + config.period();
        self.clock.sleep_until(deadline);
        self.channels[id.index()] = Channel {
            config: Some(config),
            next_boundary: None,
        };
    }

    /// Configuration currently loaded in a channel
    pub fn config(&self, id: TimerId) -> Option<TimerConfig> {
        self.channels[id.index()].config
    }

    /// Whether a channel is counting
    pub fn is_running(&self, id: TimerId) -> bool {
        self.channels[id.index()].next_boundary.is_some()
    }
}
