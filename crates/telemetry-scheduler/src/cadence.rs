//! Per-task tick counters

/// Counts ticks for one periodic task and fires when its threshold is reached
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cadence {
    count: u16,
}

impl Cadence {
    /// Create a counter at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one tick; returns true (and restarts) once `threshold` ticks have passed
    pub fn tick(&mut self, threshold: u16) -> bool {
        self.count = self.count.wrapping_add(1);
        if self.count >= threshold {
            self.count = 0;
            true
        } else {
            false
        }
    }

    /// Ticks counted since the last firing
    pub fn count(&self) -> u16 {
        self.count
    }
}
