//! Sensor acquisition interface

use mag_filter::MagSample;

/// Blocking, bounded-duration read of one magnetometer sample
pub trait MagSource {
    fn acquire_raw_sample(&mut self) -> MagSample;
}

impl<F> MagSource for F
where
    F: FnMut() -> MagSample,
{
    fn acquire_raw_sample(&mut self) -> MagSample {
        self()
    }
}
