//! Shared Byte Channel

use std::sync::{Condvar, Mutex, PoisonError};
use std::time::Duration;

use ring_buffer::{CriticalCell, RingBuffer};
use tracing::trace;

use crate::{RX_BUFFER_SIZE, TX_BUFFER_SIZE};

/// Bytes taken from the inbound buffer in one critical section
pub type InboundBatch = heapless::Vec<u8, RX_BUFFER_SIZE>;

/// Sticky overflow flags of both directions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverflowStatus {
    /// The receive interrupt evicted bytes the main loop had not read yet
    pub inbound: bool,
    /// The main loop evicted bytes the transmit interrupt had not sent yet
    pub outbound: bool,
}

/// UART byte channel shared by the main loop and the interrupt context
#[derive(Default)]
pub struct SerialLink {
    inbound: CriticalCell<RingBuffer<u8, RX_BUFFER_SIZE>>,
    outbound: CriticalCell<RingBuffer<u8, TX_BUFFER_SIZE>>,
    /// Transmit interrupt request flag
    tx_request: Mutex<bool>,
    tx_wake: Condvar,
}

impl SerialLink {
    /// Create a link with empty buffers
    pub fn new() -> Self {
        Self::default()
    }

    // Main loop side

    /// Take every byte received so far
    ///
    /// The receive interrupt is held off only while copying out, not while
    /// the caller processes the bytes.
    pub fn drain_inbound(&self) -> InboundBatch {
        self.inbound.with(|inbound| {
            let mut batch = InboundBatch::new();
            // The ring holds one byte less than the batch, so every push fits
            while let Some(byte) = inbound.read() {
                if batch.push(byte).is_err() {
                    break;
                }
            }
            batch
        })
    }

    /// Queue a frame for transmission and kick the transmit interrupt
    ///
    /// Never blocks; if the frame does not fit, the oldest unsent bytes are
    /// evicted.
    pub fn transmit(&self, bytes: &[u8]) {
        self.outbound.with(|outbound| {
            for &byte in bytes {
                outbound.write(byte);
            }
        });
        trace!("Queued {} bytes for transmit", bytes.len());
        self.request_tx();
    }

    /// Sticky overflow flags of both buffers
    pub fn overflow_status(&self) -> OverflowStatus {
        OverflowStatus {
            inbound: self.inbound.with(|b| b.has_overflowed()),
            outbound: self.outbound.with(|b| b.has_overflowed()),
        }
    }

    // Interrupt side

    /// Store a byte delivered by the receive interrupt
    pub fn isr_receive(&self, byte: u8) {
        self.inbound.with(|inbound| inbound.write(byte));
    }

    /// Take the next byte for the transmit interrupt
    pub fn isr_next_outbound(&self) -> Option<u8> {
        self.outbound.with(|outbound| outbound.read())
    }

    /// Whether the transmit buffer still holds unsent bytes
    pub fn outbound_pending(&self) -> bool {
        !self.outbound.with(|outbound| outbound.is_empty())
    }

    /// Raise the transmit interrupt request
    pub fn request_tx(&self) {
        *self.tx_request.lock().unwrap_or_else(PoisonError::into_inner) = true;
        self.tx_wake.notify_one();
    }

    /// Wait up to `timeout` for a transmit request, consuming it
    pub fn wait_tx_request(&self, timeout: Duration) -> bool {
        let requested = self.tx_request.lock().unwrap_or_else(PoisonError::into_inner);
        let (mut requested, _) = self
            .tx_wake
            .wait_timeout_while(requested, timeout, |requested| !*requested)
            .unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *requested)
    }
}
