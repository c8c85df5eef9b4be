//! Telemetry Frame Protocol
//!
//! NMEA-style ASCII framing shared by both directions of the serial link:
//! `$TYPE,PAYLOAD*` (or `$TYPE*`). Inbound frames carry commands, outbound
//! frames carry averaged magnetometer readings and the heading angle.

mod command;
mod error;
mod outbound;
mod parser;

pub use command::{extract_integer, next_value, Request, SampleRate};
pub use error::CommandError;
pub use outbound::{heading_frame, mag_frame, ERROR_FRAME, HEADING_FRAME_LEN, MAG_FRAME_LEN};
pub use parser::{Command, FrameParser, ParserState};

/// Frame delimiters
pub mod delimiter {
    /// Start of frame
    pub const START: u8 = b'$';
    /// Separates the type from the payload and payload fields from each other
    pub const SEPARATOR: u8 = b',';
    /// End of frame
    pub const TERMINATOR: u8 = b'*';
}

/// Longest accepted type token
pub const MAX_TYPE_LEN: usize = 6;

/// Longest accepted payload
pub const MAX_PAYLOAD_LEN: usize = 100;
