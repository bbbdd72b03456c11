//! Bounded blocking hand-off queues between the partitioner and workers.
//!
//! Each worker owns exactly one [`ShardQueue`]; the partitioner is its only
//! producer. The bounded capacity is what gives the pipeline backpressure:
//! when a worker lags, the partitioner blocks on `push` instead of growing
//! an unbounded buffer.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};

/// A fixed-capacity blocking FIFO with explicit close semantics.
///
/// `close` wakes every blocked consumer; further `pop` calls drain any
/// remaining items in FIFO order, then report end of data with `None`.
pub struct ShardQueue<T> {
    inner: Mutex<Inner<T>>,
    can_push: Condvar,
    can_pop: Condvar,
    capacity: usize,
}

struct Inner<T> {
    items: VecDeque<T>,
    closed: bool,
}

impl<T> ShardQueue<T> {
    /// Create a queue holding at most `capacity` items (minimum 1).
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner: Mutex::new(Inner {
                items: VecDeque::with_capacity(capacity),
                closed: false,
            }),
            can_push: Condvar::new(),
            can_pop: Condvar::new(),
            capacity,
        }
    }

    /// Enqueue an item, blocking while the queue is full.
    ///
    /// # Errors
    /// Returns the item back if the queue was closed before it could be
    /// enqueued.
    pub fn push(&self, item: T) -> Result<(), T> {
        let mut inner = self.inner.lock().unwrap();
        while inner.items.len() == self.capacity && !inner.closed {
            inner = self.can_push.wait(inner).unwrap();
        }
        if inner.closed {
            return Err(item);
        }
        inner.items.push_back(item);
        self.can_pop.notify_one();
        Ok(())
    }

    /// Dequeue the oldest item, blocking while the queue is empty and open.
    ///
    /// Returns `None` once the queue is both empty and closed.
    pub fn pop(&self) -> Option<T> {
        let mut inner = self.inner.lock().unwrap();
        loop {
            if let Some(item) = inner.items.pop_front() {
                self.can_push.notify_one();
                return Some(item);
            }
            if inner.closed {
                // Any other consumer blocked on this queue must re-check too.
                self.can_pop.notify_all();
                return None;
            }
            inner = self.can_pop.wait(inner).unwrap();
        }
    }

    /// Signal that no more items will arrive. Idempotent.
    ///
    /// Wakes every blocked consumer and producer.
    pub fn close(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.closed = true;
        self.can_pop.notify_all();
        self.can_push.notify_all();
    }

    /// Whether `close` has been called.
    pub fn is_closed(&self) -> bool {
        self.inner.lock().unwrap().closed
    }

    /// Items currently queued.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The fixed capacity this queue was built with.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
