use std::sync::atomic::{AtomicU64, Ordering};

/// Half-open chunk `[start, end)` claimed from a [`RangeIterator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    pub start: u64,
    pub end: u64,
}

impl Chunk {
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Shared cursor over `[begin, end)` handing out chunks of up to
/// `chunk_size` values. Each value is claimed by exactly one caller.
#[derive(Debug)]
pub struct RangeIterator {
    begin: u64,
    end: u64,
    chunk_size: u64,
    next: AtomicU64,
}

impl RangeIterator {
    pub fn new(begin: u64, end: u64, chunk_size: u64) -> Self {
        Self {
            begin,
            end: end.max(begin),
            chunk_size: chunk_size.max(1),
            next: AtomicU64::new(begin),
        }
    }

    /// Claims the next unclaimed chunk, `None` once the range is exhausted.
    pub fn next_chunk(&self) -> Option<Chunk> {
        let start = self.next.fetch_add(self.chunk_size, Ordering::Relaxed);
        if start >= self.end {
            // keep the cursor from wrapping on very long drains
            self.next.store(self.end, Ordering::Relaxed);
            return None;
        }
        Some(Chunk {
            start,
            end: (start + self.chunk_size).min(self.end),
        })
    }

    /// Drains chunks until the range is exhausted.
    pub fn chunks(&self) -> impl Iterator<Item = Chunk> + '_ {
        std::iter::from_fn(move || self.next_chunk())
    }

    /// Fraction of the range already claimed, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        let total = self.end - self.begin;
        if total == 0 {
            return 1.0;
        }
        let claimed = self.next.load(Ordering::Relaxed).min(self.end) - self.begin;
        claimed as f64 / total as f64
    }

    pub fn len(&self) -> u64 {
        self.end - self.begin
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.begin
    }
}
