//! Bounded in-memory chunk buffer.

use rayon::slice::ParallelSliceMut;

/// Buffer holding at most `limit` items.
/// The allocation is reused between chunks, so peak memory stays proportional to the limit.
pub struct ChunkBuffer<T> {
    limit: usize,
    inner: Vec<T>,
    peak: usize,
}

impl<T> ChunkBuffer<T> {
    /// Creates an empty buffer. If `preallocate` is set the whole capacity is reserved upfront.
    pub fn new(limit: usize, preallocate: bool) -> Self {
        ChunkBuffer {
            limit,
            inner: if preallocate {
                Vec::with_capacity(limit)
            } else {
                Vec::new()
            },
            peak: 0,
        }
    }

    /// Adds a new item to the buffer. The caller checks [`ChunkBuffer::is_full`] first.
    pub fn push(&mut self, item: T) {
        debug_assert!(!self.is_full(), "chunk buffer overflow");
        self.inner.push(item);
        self.peak = self.peak.max(self.inner.len());
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Checks if the buffer reached the limit.
    pub fn is_full(&self) -> bool {
        self.inner.len() >= self.limit
    }

    /// Largest number of items the buffer has held at once.
    pub fn peak(&self) -> usize {
        self.peak
    }

    /// Removes all items, keeping the allocation.
    pub fn clear(&mut self) {
        self.inner.clear();
    }

    pub fn as_slice(&self) -> &[T] {
        &self.inner
    }
}

impl<T: Ord + Send> ChunkBuffer<T> {
    /// Sorts the buffered items on the given thread pool.
    pub fn sort(&mut self, thread_pool: &rayon::ThreadPool) {
        let items = &mut self.inner;
        thread_pool.install(|| items.par_sort());
    }
}
