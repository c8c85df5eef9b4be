//! Outbound Frame Formatting

use core::fmt::Write;

use heapless::String;
use mag_filter::MagSample;

/// Sent in reply to a rejected command
pub const ERROR_FRAME: &[u8] = b"$ERR,1*";

/// Capacity of a `$MAG` frame
pub const MAG_FRAME_LEN: usize = 64;

/// Capacity of a `$YAW` frame
pub const HEADING_FRAME_LEN: usize = 32;

/// `$MAG,<x>,<y>,<z>*` with two decimals; `None` if it would exceed 64 bytes
pub fn mag_frame(sample: &MagSample) -> Option<String<MAG_FRAME_LEN>> {
    let mut frame = String::new();
    write!(frame, "$MAG,{:.2},{:.2},{:.2}*", sample.x, sample.y, sample.z).ok()?;
    Some(frame)
}

/// `$YAW,<angle>*\n` with two decimals; `None` if it would exceed 32 bytes
pub fn heading_frame(degrees: f32) -> Option<String<HEADING_FRAME_LEN>> {
    let mut frame = String::new();
    write!(frame, "$YAW,{:.2}*\n", degrees).ok()?;
    Some(frame)
}
