//! UART hardware interface consumed by the interrupt handlers

use std::collections::VecDeque;

/// Byte-level access to the UART peripheral
///
/// Only the interrupt context calls into a transport.
pub trait Transport {
    /// Hand one byte to the transmit FIFO
    fn send_byte(&mut self, byte: u8);

    /// Take one received byte if the peripheral has any
    fn try_receive_byte(&mut self) -> Option<u8>;

    /// Whether the transmit FIFO cannot accept another byte
    fn tx_full(&self) -> bool {
        false
    }
}

/// In-memory UART for tests and simulation
#[derive(Debug, Default)]
pub struct MemoryTransport {
    /// Bytes waiting to be "received"
    pub rx: VecDeque<u8>,
    /// Bytes "sent" on the wire
    pub tx: Vec<u8>,
    /// Transmit FIFO depth; `None` never fills
    pub fifo_depth: Option<usize>,
}

impl MemoryTransport {
    /// Create an empty transport with an unbounded FIFO
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue bytes as if they arrived on the wire
    pub fn inject(&mut self, bytes: &[u8]) {
        self.rx.extend(bytes.iter().copied());
    }

    /// Empty the "sent" bytes, as the remote end reading the wire
    pub fn take_sent(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.tx)
    }
}

impl Transport for MemoryTransport {
    fn send_byte(&mut self, byte: u8) {
        self.tx.push(byte);
    }

    fn try_receive_byte(&mut self) -> Option<u8> {
        self.rx.pop_front()
    }

    fn tx_full(&self) -> bool {
        self.fifo_depth.map_or(false, |depth| self.tx.len() >= depth)
    }
}
