//! High-scoring segment pairs: Pass 0 generation, Pass 1/1b gapped
//! re-extension and the containers carrying them between passes.

pub mod container;
pub mod diagonal;
pub mod extension;
pub mod generator;
pub mod ungapped;

pub use container::HspContainer;
pub use diagonal::DiagonalList;
pub use extension::{ExtensionContext, HspExtensionCmd};
pub use generator::{HspGeneratorCmd, SeedSearch};
pub use ungapped::{extend_ungapped, UngappedHit};

use crate::common::Range;
use crate::sequence::{Sequence, SequenceDatabase};

/// Candidate alignment between one query and one subject.
///
/// Coordinates are absolute offsets in the concatenated database buffers,
/// inclusive on both ends. The anchor is the cell gapped extensions restart
/// from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Hsp {
    pub q_idx: u32,
    pub s_idx: u32,
    pub q_start: u32,
    pub q_stop: u32,
    pub s_start: u32,
    pub s_stop: u32,
    pub score: i32,
    pub anchor_q: u32,
    pub anchor_s: u32,
}

impl Hsp {
    pub fn query_range(&self) -> Range {
        Range::new(self.q_start, self.q_stop)
    }

    pub fn subject_range(&self) -> Range {
        Range::new(self.s_start, self.s_stop)
    }

    /// Same pair of sequences and same coordinates, whatever the anchor.
    pub fn same_region(&self, other: &Hsp) -> bool {
        self.q_idx == other.q_idx
            && self.s_idx == other.s_idx
            && self.query_range() == other.query_range()
            && self.subject_range() == other.subject_range()
    }

    /// Query and subject sequences the HSP lies in. `None` when an index is
    /// unknown or a coordinate or anchor falls outside the indexed sequence.
    pub fn resolve<'db>(
        &self,
        query_db: &'db SequenceDatabase,
        subject_db: &'db SequenceDatabase,
    ) -> Option<(Sequence<'db>, Sequence<'db>)> {
        let query = query_db
            .sequence_at_offset(self.q_start)
            .filter(|q| q.index == self.q_idx && q.owns(self.q_stop) && q.owns(self.anchor_q))?;
        let subject = subject_db
            .sequence_at_offset(self.s_start)
            .filter(|s| s.index == self.s_idx && s.owns(self.s_stop) && s.owns(self.anchor_s))?;
        Some((query, subject))
    }

    /// Both ranges of `other` lie inside this HSP's ranges.
    pub fn includes(&self, other: &Hsp) -> bool {
        self.q_idx == other.q_idx
            && self.s_idx == other.s_idx
            && self.query_range().includes(&other.query_range())
            && self.subject_range().includes(&other.subject_range())
    }
}
