//! Fixed-capacity FIFO used between cooperative tasks.
//!
//! Two instances exist at runtime: button signals flowing into the system
//! task, and screen descriptors flowing into the screen task.
//!
//! Producers never block: a push into a full queue is dropped and only
//! reported through the `false` return value. There is no internal
//! locking. Every push and pop happens in task context under the single
//! cooperative scheduler, so the ring indices are never touched
//! concurrently. Interrupt-context producers would need the same
//! critical-section discipline as [`crate::tick::TickCounter`].

use heapless::Deque;

use crate::config::EVENT_QUEUE_CAPACITY;

/// Bounded ring buffer with drop-on-full semantics.
pub struct EventQueue<T, const N: usize = EVENT_QUEUE_CAPACITY> {
    ring: Deque<T, N>,
}

impl<T, const N: usize> EventQueue<T, N> {
    /// Create an empty queue.
    pub const fn new() -> Self {
        Self { ring: Deque::new() }
    }

    /// Append `item` at the tail.
    ///
    /// Returns `false` (and drops the item) if the queue is full.
    pub fn push(&mut self, item: T) -> bool {
        match self.ring.push_back(item) {
            Ok(()) => true,
            Err(_) => {
                log_debug!("queue full, event dropped");
                false
            }
        }
    }

    /// Remove and return the oldest item.
    pub fn pop(&mut self) -> Option<T> {
        self.ring.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.ring.is_full()
    }

    /// Number of items currently stored.
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Drop every pending item.
    pub fn clear(&mut self) {
        self.ring.clear();
    }
}

impl<T, const N: usize> Default for EventQueue<T, N> {
    fn default() -> Self {
        Self::new()
    }
}
