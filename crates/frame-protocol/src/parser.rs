//! Streaming Frame Parser

use crate::delimiter::{SEPARATOR, START, TERMINATOR};
use crate::{MAX_PAYLOAD_LEN, MAX_TYPE_LEN};

/// Position of the parser inside a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    /// Discarding bytes until `$`
    AwaitStart,
    /// Accumulating the type token
    ReadType,
    /// Accumulating the payload
    ReadPayload,
}

/// A complete frame, borrowed from the parser until the next byte is fed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command<'a> {
    kind: &'a [u8],
    payload: &'a [u8],
}

impl<'a> Command<'a> {
    /// Type token bytes
    pub fn kind(&self) -> &'a [u8] {
        self.kind
    }

    /// Payload bytes (empty for `$TYPE*`)
    pub fn payload(&self) -> &'a [u8] {
        self.payload
    }

    /// Whether the type token equals `name`
    pub fn is(&self, name: &str) -> bool {
        self.kind == name.as_bytes()
    }
}

/// Byte-at-a-time `$TYPE,PAYLOAD*` reassembler
///
/// Oversized type or payload fields drop the frame silently and return to
/// [`ParserState::AwaitStart`].
#[derive(Debug, Clone)]
pub struct FrameParser {
    state: ParserState,
    kind: [u8; MAX_TYPE_LEN],
    kind_len: usize,
    payload: [u8; MAX_PAYLOAD_LEN],
    payload_len: usize,
}

impl FrameParser {
    /// Create a parser waiting for a start marker
    pub fn new() -> Self {
        Self {
            state: ParserState::AwaitStart,
            kind: [0; MAX_TYPE_LEN],
            kind_len: 0,
            payload: [0; MAX_PAYLOAD_LEN],
            payload_len: 0,
        }
    }

    /// Current state
    pub fn state(&self) -> ParserState {
        self.state
    }

    /// Feed one byte; returns the frame it completes, if any
    pub fn feed(&mut self, byte: u8) -> Option<Command<'_>> {
        match self.state {
            ParserState::AwaitStart => {
                if byte == START {
                    self.state = ParserState::ReadType;
                    self.kind_len = 0;
                }
            }
            ParserState::ReadType => {
                if byte == SEPARATOR {
                    self.state = ParserState::ReadPayload;
                    self.payload_len = 0;
                } else if byte == TERMINATOR {
                    self.payload_len = 0;
                    return Some(self.complete());
                } else if self.kind_len == MAX_TYPE_LEN {
                    self.state = ParserState::AwaitStart;
                    self.kind_len = 0;
                } else {
                    self.kind[self.kind_len] = byte;
                    self.kind_len += 1;
                }
            }
            ParserState::ReadPayload => {
                if byte == TERMINATOR {
                    return Some(self.complete());
                } else if self.payload_len == MAX_PAYLOAD_LEN {
                    self.state = ParserState::AwaitStart;
                    self.payload_len = 0;
                } else {
                    self.payload[self.payload_len] = byte;
                    self.payload_len += 1;
                }
            }
        }
        None
    }

    fn complete(&mut self) -> Command<'_> {
        self.state = ParserState::AwaitStart;
        Command {
            kind: &self.kind[..self.kind_len],
            payload: &self.payload[..self.payload_len],
        }
    }
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::new()
    }
}
