//! Mutex-guarded staging queues with swap-out drain semantics
//!
//! Producers pay one push under the lock; the consumer exchanges the whole
//! buffer for a caller-owned scratch vector in O(1) and walks it outside the
//! lock. The boolean returned by the push operations is the empty-transition
//! signal: it is `true` exactly when this push was responsible for the queue
//! leaving the empty state, which lets callers schedule one drain wake-up per
//! producer burst.

use parking_lot::Mutex;

/// Single-element staging queue.
pub struct BulkQueue<T> {
    buffer: Mutex<Vec<T>>,
}

impl<T> BulkQueue<T> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Mutex::new(Vec::with_capacity(capacity)),
        }
    }

    /// Append one value; returns whether the queue was empty beforehand.
    pub fn push(&self, value: T) -> bool {
        let mut buffer = self.buffer.lock();
        let was_empty = buffer.is_empty();
        buffer.push(value);
        was_empty
    }

    /// Append a batch; returns whether the queue was empty beforehand.
    pub fn push_bulk<I>(&self, values: I) -> bool
    where
        I: IntoIterator<Item = T>,
    {
        let mut buffer = self.buffer.lock();
        let was_empty = buffer.is_empty();
        buffer.extend(values);
        was_empty
    }

    /// Exchange the internal buffer with `out`.
    ///
    /// Returns `false` on an empty queue, leaving `out` untouched. On success
    /// the internal buffer becomes whatever `out` contained, so draining with
    /// an emptied-but-capacious scratch vector recycles its allocation.
    pub fn try_swap(&self, out: &mut Vec<T>) -> bool {
        let mut buffer = self.buffer.lock();
        if buffer.is_empty() {
            return false;
        }

        std::mem::swap(&mut *buffer, out);
        true
    }

    pub fn reserve(&self, additional: usize) {
        self.buffer.lock().reserve(additional);
    }

    pub fn shrink_to_fit(&self) {
        self.buffer.lock().shrink_to_fit();
    }

    pub fn len(&self) -> usize {
        self.buffer.lock().len()
    }

    pub fn capacity(&self) -> usize {
        self.buffer.lock().capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.lock().is_empty()
    }
}

impl<T> Default for BulkQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

struct PairBuffers<T, U> {
    first: Vec<T>,
    second: Vec<U>,
}

/// Paired staging queue holding two buffers of always-equal length.
pub struct PairBulkQueue<T, U> {
    buffers: Mutex<PairBuffers<T, U>>,
}

impl<T, U> PairBulkQueue<T, U> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffers: Mutex::new(PairBuffers {
                first: Vec::with_capacity(capacity),
                second: Vec::with_capacity(capacity),
            }),
        }
    }

    /// Append one pair under a single lock; returns whether the queue was
    /// empty beforehand.
    pub fn push(&self, first: T, second: U) -> bool {
        let mut buffers = self.buffers.lock();
        debug_assert_eq!(buffers.first.len(), buffers.second.len());

        let was_empty = buffers.first.is_empty();
        buffers.first.push(first);
        buffers.second.push(second);
        was_empty
    }

    /// Append two equally-sized batches; returns whether the queue was empty
    /// beforehand.
    pub fn push_bulk<I, J>(&self, firsts: I, seconds: J) -> bool
    where
        I: IntoIterator<Item = T>,
        J: IntoIterator<Item = U>,
    {
        let mut buffers = self.buffers.lock();
        debug_assert_eq!(buffers.first.len(), buffers.second.len());

        let was_empty = buffers.first.is_empty();
        buffers.first.extend(firsts);
        buffers.second.extend(seconds);
        debug_assert_eq!(buffers.first.len(), buffers.second.len());
        was_empty
    }

    /// Exchange both internal buffers with the caller's pair.
    ///
    /// Rejects scratch vectors of unequal length, since accepting them would
    /// break the equal-size invariant on the next observation.
    pub fn try_swap(&self, first_out: &mut Vec<T>, second_out: &mut Vec<U>) -> bool {
        if first_out.len() != second_out.len() {
            return false;
        }

        let mut buffers = self.buffers.lock();
        debug_assert_eq!(buffers.first.len(), buffers.second.len());

        if buffers.first.is_empty() {
            return false;
        }

        std::mem::swap(&mut buffers.first, first_out);
        std::mem::swap(&mut buffers.second, second_out);
        true
    }

    pub fn reserve(&self, additional: usize) {
        let mut buffers = self.buffers.lock();
        buffers.first.reserve(additional);
        buffers.second.reserve(additional);
    }

    pub fn shrink_to_fit(&self) {
        let mut buffers = self.buffers.lock();
        buffers.first.shrink_to_fit();
        buffers.second.shrink_to_fit();
    }

    pub fn len(&self) -> usize {
        let buffers = self.buffers.lock();
        debug_assert_eq!(buffers.first.len(), buffers.second.len());
        buffers.first.len()
    }

    pub fn capacity(&self) -> usize {
        self.buffers.lock().first.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.lock().first.is_empty()
    }
}

impl<T, U> Default for PairBulkQueue<T, U> {
    fn default() -> Self {
        Self::new()
    }
}
