//! Serial Link
//!
//! Bridges the UART interrupt context and the main loop through two bounded
//! byte buffers: inbound (written by the receive interrupt, drained by the
//! main loop) and outbound (filled by the main loop, drained by the transmit
//! interrupt).

mod error;
mod isr;
mod link;
mod transport;

pub use error::LinkError;
pub use isr::{on_receive, on_transmit, IsrWorker};
pub use link::{InboundBatch, OverflowStatus, SerialLink};
pub use transport::{MemoryTransport, Transport};

/// Receive buffer slots
pub const RX_BUFFER_SIZE: usize = 32;

/// Transmit buffer slots
pub const TX_BUFFER_SIZE: usize = 128;

/// Default UART baud rate
pub const DEFAULT_BAUD_RATE: u32 = 115_200;
