//! Fixed-Capacity Ring Buffer
//!
//! Provides the overwrite-oldest circular buffer used on both directions of
//! the serial link, and the critical-section cell that guards state shared
//! with the interrupt context.

mod buffer;
mod critical;

pub use buffer::RingBuffer;
pub use critical::CriticalCell;
