//! Diagonal list used by Pass 0 to avoid extending the same stretch of a
//! diagonal twice.
//!
//! A diagonal is identified by `(q_abs - s_abs) & mask`. Diagonals are
//! grouped into buckets of `DIV` consecutive values; each bucket holds a
//! small vector of covered query ranges sorted by diagonal (descending)
//! then start. Buckets live in sharded hash maps, one lock per shard, and a
//! lock is only held for the lookup or the insertion itself.

use std::sync::{Mutex, MutexGuard};

use rustc_hash::FxHashMap;

use crate::common::Range;

const DIV: u64 = 10;
const SHARDS: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DiagonalEntry {
    diagonal: u64,
    range: Range,
}

type Shard = FxHashMap<u64, Vec<DiagonalEntry>>;

#[derive(Debug)]
pub struct DiagonalList {
    mask: u64,
    shards: Vec<Mutex<Shard>>,
}

impl DiagonalList {
    /// `query_count` sequences in the query database, `combined_span` total
    /// letters of both databases.
    pub fn new(query_count: usize, combined_span: u64) -> Self {
        let mut size = (combined_span.max(1)).next_power_of_two();
        if query_count < 1_000_000 {
            size = size.max((query_count.max(1) as u64).next_power_of_two() << 3);
        }
        Self {
            mask: size - 1,
            shards: (0..SHARDS).map(|_| Mutex::new(Shard::default())).collect(),
        }
    }

    /// Diagonal of the cell `(q_abs, s_abs)`. Cells with equal offsets are
    /// spread by the query sequence index.
    #[inline]
    pub fn diagonal(&self, q_abs: u32, s_abs: u32, q_seq_idx: u32) -> u64 {
        let drift = (q_abs as i64 - s_abs as i64) as u64 & self.mask;
        if q_abs == s_abs {
            drift + (q_seq_idx as u64 % DIV)
        } else {
            drift
        }
    }

    fn shard(&self, bucket: u64) -> MutexGuard<'_, Shard> {
        let lock = &self.shards[(bucket as usize) % SHARDS];
        // a poisoned shard still holds consistent ranges: insertion is a single push
        lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// True when `q_pos` already lies in a range registered on `diagonal`.
    pub fn is_covered(&self, diagonal: u64, q_pos: u32) -> bool {
        let bucket = diagonal / DIV;
        let shard = self.shard(bucket);
        shard.get(&bucket).is_some_and(|entries| {
            entries
                .iter()
                .filter(|e| e.diagonal == diagonal)
                .any(|e| e.range.contains(q_pos))
        })
    }

    /// Registers `[start, stop]` on `diagonal` unless it overlaps a range
    /// already there. Check and insertion happen under one lock.
    pub fn try_register(&self, diagonal: u64, start: u32, stop: u32) -> bool {
        let bucket = diagonal / DIV;
        let range = Range::new(start, stop);
        let mut shard = self.shard(bucket);
        let entries = shard.entry(bucket).or_default();

        if entries
            .iter()
            .any(|e| e.diagonal == diagonal && e.range.overlaps(&range))
        {
            return false;
        }
        let at = entries.partition_point(|e| {
            e.diagonal > diagonal || (e.diagonal == diagonal && e.range.begin < start)
        });
        entries.insert(at, DiagonalEntry { diagonal, range });
        true
    }

    /// Number of registered ranges, for logging.
    pub fn len(&self) -> usize {
        self.shards
            .iter()
            .map(|s| {
                s.lock()
                    .map(|m| m.values().map(Vec::len).sum::<usize>())
                    .unwrap_or(0)
            })
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
