//! Command Decoding

use std::fmt;

use serde::Deserialize;
use tracing::debug;

use crate::delimiter::SEPARATOR;
use crate::error::CommandError;
use crate::parser::Command;

/// Magnetometer output rate accepted by the `RATE` command
///
/// A rate of 0 disables the data frame entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "i32")]
pub struct SampleRate(u8);

impl SampleRate {
    /// Every rate a peer may request, in Hz
    pub const VALID_HZ: [u8; 6] = [0, 1, 2, 4, 5, 10];

    /// Rate at power-up (5 Hz)
    pub const DEFAULT: SampleRate = SampleRate(5);

    /// Rate in Hz
    pub fn hz(&self) -> u8 {
        self.0
    }

    /// Whether data frames are sent at all
    pub fn is_enabled(&self) -> bool {
        self.0 > 0
    }

    /// Ticks between data frames, `None` when disabled
    pub fn ticks_per_send(&self, ticks_per_second: u16) -> Option<u16> {
        self.is_enabled().then(|| ticks_per_second / self.0 as u16)
    }
}

impl Default for SampleRate {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<i32> for SampleRate {
    type Error = CommandError;

    fn try_from(hz: i32) -> Result<Self, Self::Error> {
        Self::VALID_HZ
            .iter()
            .find(|&&valid| valid as i32 == hz)
            .map(|&valid| SampleRate(valid))
            .ok_or(CommandError::InvalidRate(hz))
    }
}

impl fmt::Display for SampleRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Hz", self.0)
    }
}

/// Commands understood by the telemetry loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    /// `$RATE,<hz>*`: change the data frame rate
    SetRate(SampleRate),
}

impl Request {
    /// Type token of the rate command
    pub const RATE: &'static str = "RATE";

    /// Interpret a parsed frame
    ///
    /// Unknown types decode to `Ok(None)` and are meant to be ignored.
    pub fn decode(command: &Command<'_>) -> Result<Option<Self>, CommandError> {
        if command.is(Self::RATE) {
            let hz = extract_integer(command.payload());
            return SampleRate::try_from(hz).map(|rate| Some(Request::SetRate(rate)));
        }

        debug!(
            "Ignoring frame type {:?}",
            String::from_utf8_lossy(command.kind())
        );
        Ok(None)
    }
}

/// Parse an optionally signed decimal integer up to the next separator
///
/// Known limitation: there is no overflow or digit validation. Arithmetic
/// wraps, and a non-digit byte contributes `byte - b'0'` as if it were a
/// digit, so malformed input yields an unspecified value rather than an error.
pub fn extract_integer(field: &[u8]) -> i32 {
    let (sign, digits) = match field.first() {
        Some(b'-') => (-1i32, &field[1..]),
        Some(b'+') => (1, &field[1..]),
        _ => (1, field),
    };

    digits
        .iter()
        .take_while(|&&b| b != SEPARATOR)
        .fold(0i32, |number, &b| {
            number
                .wrapping_mul(10)
                .wrapping_add((b as i32).wrapping_sub(b'0' as i32))
        })
        .wrapping_mul(sign)
}

/// Index of the field after the one starting at `i`, or the end of `msg`
pub fn next_value(msg: &[u8], mut i: usize) -> usize {
    while i < msg.len() && msg[i] != SEPARATOR {
        i += 1;
    }
    if i < msg.len() {
        i += 1;
    }
    i
}
