//! Diagnostic indicators

use tracing::{debug, trace};

/// The two status outputs driven by the loop
pub trait Indicators {
    /// Periodic "alive" blink
    fn toggle_heartbeat(&mut self);

    /// Flipped whenever a tick overran its period
    fn toggle_overrun(&mut self);
}

/// Indicator state kept in memory and mirrored to the log
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedIndicators {
    pub heartbeat: bool,
    pub overrun: bool,
    /// Overrun toggles since startup
    pub overrun_count: u32,
}

impl LedIndicators {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Indicators for LedIndicators {
    fn toggle_heartbeat(&mut self) {
        self.heartbeat = !self.heartbeat;
        trace!("Heartbeat LED {}", if self.heartbeat { "on" } else { "off" });
    }

    fn toggle_overrun(&mut self) {
        self.overrun = !self.overrun;
        self.overrun_count = self.overrun_count.wrapping_add(1);
        debug!("Tick deadline missed ({} so far)", self.overrun_count);
    }
}
