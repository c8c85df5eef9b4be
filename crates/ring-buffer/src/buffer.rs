//! Ring Buffer Implementation

/// Circular buffer over `N` slots that overwrites the oldest element when full
///
/// `head == tail` means empty and `(head + 1) % N == tail` means full, so at
/// most `N - 1` elements are readable at once.
pub struct RingBuffer<T: Copy, const N: usize> {
    /// Pre-allocated storage
    storage: [T; N],
    /// Head position (next write slot)
    head: usize,
    /// Tail position (next read slot)
    tail: usize,
    /// Set when a write evicted an unread element; sticky
    overflow: bool,
}

impl<T: Copy + Default, const N: usize> RingBuffer<T, N> {
    /// Create an empty buffer
    pub fn new() -> Self {
        let () = Self::MIN_SLOTS;
        Self {
            storage: [T::default(); N],
            head: 0,
            tail: 0,
            overflow: false,
        }
    }
}

impl<T: Copy + Default, const N: usize> Default for RingBuffer<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy, const N: usize> RingBuffer<T, N> {
    /// One slot always stays free, so fewer than two could never hold data
    const MIN_SLOTS: () = assert!(N >= 2, "ring buffer needs at least two slots");

    /// Write an element, evicting the oldest unread one if full
    pub fn write(&mut self, value: T) {
        let next_head = (self.head + 1) % N;

        if next_head == self.tail {
            self.tail = (self.tail + 1) % N;
            self.overflow = true;
        }

        self.storage[self.head] = value;
        self.head = next_head;
    }

    /// Take the oldest element
    pub fn read(&mut self) -> Option<T> {
        if self.head == self.tail {
            return None;
        }

        let value = self.storage[self.tail];
        self.tail = (self.tail + 1) % N;
        Some(value)
    }

    /// Get the number of readable elements
    pub fn len(&self) -> usize {
        if self.head >= self.tail {
            self.head - self.tail
        } else {
            N - self.tail + self.head
        }
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    /// Check if buffer is full
    pub fn is_full(&self) -> bool {
        (self.head + 1) % N == self.tail
    }

    /// Whether any write has evicted an unread element
    pub fn has_overflowed(&self) -> bool {
        self.overflow
    }

    /// Reset the overflow flag
    pub fn clear_overflow(&mut self) {
        self.overflow = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_write_and_read() {
        let mut buffer: RingBuffer<u8, 8> = RingBuffer::new();

        for b in b"$RATE" {
            buffer.write(*b);
        }

        assert_eq!(buffer.len(), 5);
        assert_eq!(buffer.read(), Some(b'$'));
        assert_eq!(buffer.read(), Some(b'R'));
        assert_eq!(buffer.len(), 3);
        assert!(!buffer.has_overflowed());
    }

    #[test]
    fn test_overwrite_oldest() {
        let mut buffer: RingBuffer<u8, 5> = RingBuffer::new();

        // Fill beyond capacity
        for i in 0..10u8 {
            buffer.write(i);
        }

        // Should only have capacity-1 elements, newest kept
        assert_eq!(buffer.len(), 4);
        assert!(buffer.is_full());
        assert!(buffer.has_overflowed());

        let drained: Vec<u8> = std::iter::from_fn(|| buffer.read()).collect();
        assert_eq!(drained, vec![6, 7, 8, 9]);
        assert!(buffer.is_empty());

        // Still sticky after draining
        assert!(buffer.has_overflowed());
    }

    #[test]
    fn test_full_boundary_without_overflow() {
        let mut buffer: RingBuffer<u8, 4> = RingBuffer::new();
        for i in 0..3u8 {
            buffer.write(i);
        }
        assert!(buffer.is_full());
        assert!(!buffer.has_overflowed());

        buffer.write(3);
        assert!(buffer.has_overflowed());
        buffer.clear_overflow();
        assert!(!buffer.has_overflowed());
    }

    #[test]
    fn test_smallest_buffer_holds_one() {
        let mut buffer: RingBuffer<u8, 2> = RingBuffer::new();
        buffer.write(b'$');
        assert!(buffer.is_full());
        assert_eq!(buffer.len(), 1);
        buffer.write(b'*');
        assert!(buffer.has_overflowed());
        assert_eq!(buffer.read(), Some(b'*'));
        assert_eq!(buffer.read(), None);
    }

    proptest! {
        #[test]
        fn prop_never_exceeds_capacity(ops in proptest::collection::vec(any::<Option<u8>>(), 0..200)) {
            let mut buffer: RingBuffer<u8, 16> = RingBuffer::new();
            let mut overflowed = false;

            for op in ops {
                match op {
                    Some(b) => buffer.write(b),
                    None => { buffer.read(); }
                }
                prop_assert!(buffer.len() <= 15);
                prop_assert!(!overflowed || buffer.has_overflowed());
                overflowed = buffer.has_overflowed();
            }
        }

        #[test]
        fn prop_overflow_after_exceeding_capacity(bytes in proptest::collection::vec(any::<u8>(), 16..64)) {
            let mut buffer: RingBuffer<u8, 16> = RingBuffer::new();
            for b in &bytes {
                buffer.write(*b);
            }
            prop_assert!(buffer.has_overflowed());

            // The newest 15 bytes survive, in order
            let drained: Vec<u8> = std::iter::from_fn(|| buffer.read()).collect();
            prop_assert_eq!(&drained[..], &bytes[bytes.len() - 15..]);
        }
    }
}
