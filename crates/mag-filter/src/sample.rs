//! Magnetometer sample

use serde::{Deserialize, Serialize};

/// One reading of the three magnetometer axes
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MagSample {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl MagSample {
    /// Create a sample from axis values
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Decode the six data registers (X, Y, Z as LSB/MSB pairs)
    ///
    /// Each axis is a 13-bit signed value left-aligned in 16 bits; the low
    /// three bits of every LSB are not part of the reading.
    pub fn from_registers(raw: [u8; 6]) -> Self {
        let axis = |lsb: u8, msb: u8| i16::from_le_bytes([lsb & 0xF8, msb]) as f32 / 8.0;
        Self {
            x: axis(raw[0], raw[1]),
            y: axis(raw[2], raw[3]),
            z: axis(raw[4], raw[5]),
        }
    }

    /// Heading of the horizontal field in degrees, (-180, 180]
    pub fn heading_degrees(&self) -> f32 {
        self.y.atan2(self.x).to_degrees()
    }
}
