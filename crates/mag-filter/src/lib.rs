//! Magnetometer Filtering
//!
//! Fixed-window moving average over the three magnetometer axes and the
//! heading angle derived from the averaged field.

mod sample;
mod window;

pub use sample::MagSample;
pub use window::AverageWindow;

/// Samples kept by the moving-average window
pub const MAG_AVG_WINDOW: usize = 5;
