use crate::common::Range;
use crate::sequence::Sequence;

/// A scored local alignment between one query and one subject sequence.
///
/// Ranges are sequence-relative, 0-based and inclusive. For minus-strand
/// hits the query sequence is the reverse complement and `query_range`
/// refers to it; [`Alignment::query_display_range`] maps it back.
#[derive(Debug, Clone)]
pub struct Alignment<'db> {
    pub query: Sequence<'db>,
    pub subject: Sequence<'db>,
    pub query_range: Range,
    pub subject_range: Range,
    pub query_frame: i8,
    pub subject_frame: i8,
    pub score: i32,
    pub evalue: f64,
    pub bit_score: f64,
    /// Number of alignment columns, gaps included.
    pub length: u32,
    pub identities: u32,
    pub positives: u32,
    pub mismatches: u32,
    pub query_gap_openings: u32,
    pub subject_gap_openings: u32,
}

impl<'db> Alignment<'db> {
    pub fn identity_percent(&self) -> f64 {
        if self.length == 0 {
            return 0.0;
        }
        100.0 * self.identities as f64 / self.length as f64
    }

    pub fn gap_openings(&self) -> u32 {
        self.query_gap_openings + self.subject_gap_openings
    }

    /// 1-based inclusive query coordinates on the plus strand; start > end
    /// on the minus strand.
    pub fn query_display_range(&self) -> (u32, u32) {
        display_range(self.query_range, self.query_frame, self.query.len() as u32)
    }

    pub fn subject_display_range(&self) -> (u32, u32) {
        display_range(self.subject_range, self.subject_frame, self.subject.len() as u32)
    }

    /// Identity of the aligned region, used for duplicate detection.
    pub(crate) fn key(&self) -> (u32, u32, Range, Range, i8) {
        (
            self.query.index,
            self.subject.index,
            self.query_range,
            self.subject_range,
            self.query_frame,
        )
    }
}

fn display_range(range: Range, frame: i8, seq_len: u32) -> (u32, u32) {
    if frame < 0 {
        (seq_len - range.begin, seq_len - range.end)
    } else {
        (range.begin + 1, range.end + 1)
    }
}
