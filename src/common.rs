use std::cmp::Ordering;

use crate::align::Alignment;

/// Inclusive `[begin, end]` interval of positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Range {
    pub begin: u32,
    pub end: u32,
}

impl Range {
    pub const fn new(begin: u32, end: u32) -> Self {
        Self { begin, end }
    }

    /// Number of positions covered.
    #[inline]
    pub fn len(&self) -> u32 {
        if self.end < self.begin {
            0
        } else {
            self.end - self.begin + 1
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end < self.begin
    }

    #[inline]
    pub fn contains(&self, pos: u32) -> bool {
        self.begin <= pos && pos <= self.end
    }

    #[inline]
    pub fn includes(&self, other: &Range) -> bool {
        self.begin <= other.begin && other.end <= self.end
    }

    #[inline]
    pub fn overlaps(&self, other: &Range) -> bool {
        self.begin <= other.end && other.begin <= self.end
    }

    /// The same interval moved `delta` positions to the left.
    #[inline]
    pub fn shift_down(&self, delta: u32) -> Range {
        Range::new(self.begin - delta, self.end - delta)
    }
}

// =============================================================================
// Output ordering
// =============================================================================

/// Compare two evalues, treating both as equal if they're close enough to zero.
#[inline]
pub fn evalue_comp(evalue1: f64, evalue2: f64) -> Ordering {
    const EPSILON: f64 = 1.0e-180;
    if evalue1 < EPSILON && evalue2 < EPSILON {
        Ordering::Equal
    } else if evalue1 < evalue2 {
        Ordering::Less
    } else if evalue1 > evalue2 {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}

/// Order of alignments within one query/subject pair.
///
/// Order: score DESC → s_start ASC → s_end DESC → q_start ASC → q_end DESC → frame
pub fn score_compare_alignments(a: &Alignment<'_>, b: &Alignment<'_>) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| a.subject_range.begin.cmp(&b.subject_range.begin))
        .then_with(|| b.subject_range.end.cmp(&a.subject_range.end))
        .then_with(|| a.query_range.begin.cmp(&b.query_range.begin))
        .then_with(|| b.query_range.end.cmp(&a.query_range.end))
        .then_with(|| b.query_frame.cmp(&a.query_frame))
}

/// Summary of every alignment of one subject for one query.
#[derive(Debug, Clone, Copy)]
pub struct SubjectGroupKey {
    pub s_idx: u32,
    pub best_evalue: f64,
    pub best_score: i32,
}

impl SubjectGroupKey {
    pub fn from_alignments(alignments: &[Alignment<'_>]) -> Option<Self> {
        let first = alignments.first()?;
        let best_evalue = alignments
            .iter()
            .map(|a| a.evalue)
            .min_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal))
            .unwrap_or(f64::MAX);
        let best_score = alignments.iter().map(|a| a.score).max().unwrap_or(0);
        Some(Self {
            s_idx: first.subject.index,
            best_evalue,
            best_score,
        })
    }
}

/// Order of subjects within one query.
///
/// Order: best_evalue ASC → best_score DESC → subject index ASC
pub fn compare_subject_groups(a: &SubjectGroupKey, b: &SubjectGroupKey) -> Ordering {
    evalue_comp(a.best_evalue, b.best_evalue)
        .then_with(|| b.best_score.cmp(&a.best_score))
        .then_with(|| a.s_idx.cmp(&b.s_idx))
}
