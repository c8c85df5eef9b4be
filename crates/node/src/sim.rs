//! Simulated magnetometer for running without hardware

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use mag_filter::MagSample;
use telemetry_scheduler::MagSource;
use tracing::info;

/// Horizontal field strength in sensor counts
const HORIZONTAL_COUNTS: f32 = 400.0;

/// Vertical field component in sensor counts
const VERTICAL_COUNTS: f32 = -250.0;

/// Largest 13-bit reading magnitude
const MAX_COUNTS: i32 = 4095;

/// Magnetometer on a slowly turning platform
///
/// Produces the sensor's raw register bytes so every reading goes through the
/// same decoding as real hardware. Noise is pseudo-random but deterministic.
#[derive(Debug, Clone)]
pub struct SimulatedMagnetometer {
    step_deg: f32,
    angle_deg: f32,
    noise_counts: u16,
    reads: u64,
}

impl SimulatedMagnetometer {
    /// Half a degree per reading with a few counts of noise
    pub fn new() -> Self {
        info!("Using simulated magnetometer");
        Self::with_rotation(0.5).with_noise(3)
    }

    /// Noise-free sensor turning `step_deg` per reading
    pub fn with_rotation(step_deg: f32) -> Self {
        Self {
            step_deg,
            angle_deg: 0.0,
            noise_counts: 0,
            reads: 0,
        }
    }

    /// Add up to `noise_counts` of noise per axis
    pub fn with_noise(mut self, noise_counts: u16) -> Self {
        self.noise_counts = noise_counts;
        self
    }

    /// Heading of the next reading
    pub fn angle_degrees(&self) -> f32 {
        self.angle_deg
    }

    /// Read the six data registers (X, Y, Z as LSB/MSB pairs)
    pub fn read_registers(&mut self) -> [u8; 6] {
        let angle = self.angle_deg.to_radians();
        let x = encode(HORIZONTAL_COUNTS * angle.cos() + self.noise(0));
        let y = encode(HORIZONTAL_COUNTS * angle.sin() + self.noise(1));
        let z = encode(VERTICAL_COUNTS + self.noise(2));

        self.reads = self.reads.wrapping_add(1);
        self.angle_deg = (self.angle_deg + self.step_deg).rem_euclid(360.0);

        [x[0], x[1], y[0], y[1], z[0], z[1]]
    }

    fn noise(&self, axis: u8) -> f32 {
        if self.noise_counts == 0 {
            return 0.0;
        }
        let mut hasher = DefaultHasher::new();
        self.reads.hash(&mut hasher);
        axis.hash(&mut hasher);
        let span = 2 * self.noise_counts as u64 + 1;
        ((hasher.finish() % span) as i64 - self.noise_counts as i64) as f32
    }
}

impl Default for SimulatedMagnetometer {
    fn default() -> Self {
        Self::new()
    }
}

impl MagSource for SimulatedMagnetometer {
    fn acquire_raw_sample(&mut self) -> MagSample {
        MagSample::from_registers(self.read_registers())
    }
}

/// 13-bit reading left-aligned in a little-endian register pair
fn encode(counts: f32) -> [u8; 2] {
    let counts = (counts.round() as i32).clamp(-MAX_COUNTS - 1, MAX_COUNTS) as i16;
    (counts << 3).to_le_bytes()
}
