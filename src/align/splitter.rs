//! Banded affine-gap alignment of two ranges with full traceback.
//!
//! The splitter recomputes the exact alignment between the query and
//! subject ranges of an HSP to count identities, positives, mismatches and
//! gap openings, and to list the ungapped segments ("breakpoints").
//!
//! Three matrices are filled over a band around the main diagonal: `H` best
//! score, `E` vertical moves (a query letter against a gap in the subject)
//! and `F` horizontal moves (a subject letter against a gap in the query).
//! The band half-width is the drift between the two ranges plus two.
//! Scores are stored as `i16`; cells outside the band read as a large
//! negative value.

use crate::common::Range;
use crate::error::{PlastError, Result};
use crate::utils::ScoreMatrix;

use super::semi_gapped::GapCosts;

/// Side length the scratch matrices are first sized for.
pub const DEFAULT_ALIGN_SIZE: usize = 1000;
/// Ranges this long or longer are not split.
pub const MAX_ALIGN_SIZE: usize = 6000;

const NEG: i32 = (i16::MIN / 2) as i32;

#[inline]
fn clamp(v: i32) -> i16 {
    v.clamp(NEG, i16::MAX as i32) as i16
}

/// Counts and breakpoints of one split alignment. `align_size == 0` means
/// the ranges were too large to split.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitOutput {
    pub identity: u32,
    pub positive: u32,
    /// Gap openings in the query (horizontal runs).
    pub nb_gap_query: u32,
    /// Gap openings in the subject (vertical runs).
    pub nb_gap_subject: u32,
    pub nb_mismatch: u32,
    /// Number of alignment columns, gaps included.
    pub align_size: u32,
    /// Range-relative positions, read four at a time as
    /// `(query_stop, subject_stop, query_start, subject_start)` of each
    /// ungapped segment, last segment first.
    pub breakpoints: Vec<u32>,
}

impl SplitOutput {
    pub fn is_empty(&self) -> bool {
        self.align_size == 0
    }

    /// Ungapped segments as `(query, subject)` ranges, last segment first.
    pub fn segments(&self) -> impl Iterator<Item = (Range, Range)> + '_ {
        self.breakpoints
            .chunks_exact(4)
            .map(|c| (Range::new(c[2], c[0]), Range::new(c[3], c[1])))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Move {
    Diagonal,
    Vertical,
    Horizontal,
}

/// Cell addressing for one call: banded rows of `width` cells, or full rows
/// when the band is wider than the subject.
#[derive(Debug, Clone, Copy)]
struct Layout {
    width: usize,
    delta: usize,
    banded: bool,
    q_len: usize,
    s_len: usize,
}

impl Layout {
    fn new(q_len: usize, s_len: usize, delta: usize) -> Self {
        let band = 2 * delta + 3;
        if band < s_len + 1 {
            Self {
                width: band,
                delta,
                banded: true,
                q_len,
                s_len,
            }
        } else {
            Self {
                width: s_len + 1,
                delta,
                banded: false,
                q_len,
                s_len,
            }
        }
    }

    fn cells(&self) -> usize {
        (self.q_len + 1) * self.width
    }

    /// Columns computed for row `i`.
    #[inline]
    fn columns(&self, i: usize) -> (usize, usize) {
        if i == 0 {
            (0, self.delta.min(self.s_len))
        } else {
            (i.saturating_sub(self.delta).max(1), (i + self.delta).min(self.s_len))
        }
    }

    #[inline]
    fn index(&self, i: usize, j: usize) -> Option<usize> {
        let (lo, hi) = self.columns(i);
        if i > self.q_len || j < lo || j > hi {
            return None;
        }
        let col = if self.banded {
            j + self.delta + 1 - i
        } else {
            j
        };
        Some(i * self.width + col)
    }
}

/// Reusable banded aligner. One instance per worker.
#[derive(Debug)]
pub struct AlignmentSplitter<'m> {
    matrix: &'m ScoreMatrix,
    gaps: GapCosts,
    h: Vec<i16>,
    e: Vec<i16>,
    f: Vec<i16>,
}

impl<'m> AlignmentSplitter<'m> {
    pub fn new(matrix: &'m ScoreMatrix, gaps: GapCosts) -> Result<Self> {
        let mut splitter = Self {
            matrix,
            gaps,
            h: Vec::new(),
            e: Vec::new(),
            f: Vec::new(),
        };
        splitter.ensure_cells(DEFAULT_ALIGN_SIZE * DEFAULT_ALIGN_SIZE / 16)?;
        Ok(splitter)
    }

    /// Current scratch size, in cells per matrix.
    pub fn capacity(&self) -> usize {
        self.h.len()
    }

    fn ensure_cells(&mut self, cells: usize) -> Result<()> {
        if self.h.len() >= cells {
            return Ok(());
        }
        let target = cells.max(self.h.len() * 2);
        for m in [&mut self.h, &mut self.e, &mut self.f] {
            m.try_reserve_exact(target - m.len()).map_err(|e| {
                PlastError::Allocation(format!("{target} cells of split matrix: {e}"))
            })?;
            m.resize(target, 0);
        }
        Ok(())
    }

    #[inline]
    fn read(m: &[i16], layout: &Layout, i: usize, j: usize) -> i32 {
        match layout.index(i, j) {
            Some(k) => m[k] as i32,
            None => NEG,
        }
    }

    /// Aligns `query[query_range]` against `subject[subject_range]`.
    ///
    /// Ranges are inclusive and relative to the given letter slices.
    pub fn split(
        &mut self,
        subject: &[u8],
        query: &[u8],
        subject_range: Range,
        query_range: Range,
    ) -> Result<SplitOutput> {
        let q_len = query_range.len() as usize;
        let s_len = subject_range.len() as usize;
        if q_len >= MAX_ALIGN_SIZE || s_len >= MAX_ALIGN_SIZE {
            return Ok(SplitOutput::default());
        }
        if q_len == 0 || s_len == 0 {
            return Ok(SplitOutput::default());
        }

        let qry = &query[query_range.begin as usize..=query_range.end as usize];
        let sbj = &subject[subject_range.begin as usize..=subject_range.end as usize];

        let drift = (query_range.begin as i64 - subject_range.begin as i64)
            - (query_range.end as i64 - subject_range.end as i64);
        let delta = drift.unsigned_abs() as usize + 2;

        let layout = Layout::new(q_len, s_len, delta);
        self.ensure_cells(layout.cells())?;

        self.fill(qry, sbj, &layout);
        Ok(self.traceback(qry, sbj, &layout))
    }

    fn fill(&mut self, qry: &[u8], sbj: &[u8], layout: &Layout) {
        let open_ext = self.gaps.open + self.gaps.extend;
        let extend = self.gaps.extend;

        let (_, hi0) = layout.columns(0);
        for j in 0..=hi0 {
            if let Some(k) = layout.index(0, j) {
                self.h[k] = 0;
                self.e[k] = NEG as i16;
                self.f[k] = NEG as i16;
            }
        }

        for i in 1..=layout.q_len {
            let (j1, j2) = layout.columns(i);
            let qc = qry[i - 1];
            let mut f = NEG;
            let mut h_left = NEG;

            for j in j1..=j2 {
                let h_up = Self::read(&self.h, layout, i - 1, j);
                let e_up = Self::read(&self.e, layout, i - 1, j);
                let h_diag = Self::read(&self.h, layout, i - 1, j - 1);

                let e = (h_up - open_ext).max(e_up - extend).max(NEG);
                f = (h_left - open_ext).max(f - extend).max(NEG);
                let d = h_diag + self.matrix.score(qc, sbj[j - 1]);
                let h = d.max(e).max(f);

                // the index exists: j is within this row's columns
                if let Some(k) = layout.index(i, j) {
                    self.h[k] = clamp(h);
                    self.e[k] = clamp(e);
                    self.f[k] = clamp(f);
                }
                h_left = clamp(h) as i32;
                f = clamp(f) as i32;
            }
        }
    }

    fn traceback(&self, qry: &[u8], sbj: &[u8], layout: &Layout) -> SplitOutput {
        let wildcard = self.matrix.alphabet().wildcard();
        let mut out = SplitOutput::default();
        let (mut i, mut j) = (layout.q_len, layout.s_len);
        let mut last_move = Move::Diagonal;

        out.breakpoints.push(i as u32 - 1);
        out.breakpoints.push(j as u32 - 1);

        while i > 0 && j > 0 {
            let s = self.matrix.score(qry[i - 1], sbj[j - 1]);
            let h_diag = Self::read(&self.h, layout, i - 1, j - 1);
            let e = Self::read(&self.e, layout, i, j);
            let f = Self::read(&self.f, layout, i, j);

            let step = if h_diag + s >= e.max(f) {
                Move::Diagonal
            } else if e >= f {
                Move::Vertical
            } else {
                Move::Horizontal
            };

            match step {
                Move::Diagonal => {
                    let (l1, l2) = (qry[i - 1], sbj[j - 1]);
                    if l1 == l2 || l1 == wildcard || l2 == wildcard {
                        out.identity += 1;
                    } else {
                        out.nb_mismatch += 1;
                    }
                    if s > 0 {
                        out.positive += 1;
                    }
                    i -= 1;
                    j -= 1;
                    if last_move != Move::Diagonal {
                        out.breakpoints.push(i as u32);
                        out.breakpoints.push(j as u32);
                    }
                }
                Move::Vertical | Move::Horizontal => {
                    if last_move == Move::Diagonal {
                        out.breakpoints.push(i as u32);
                        out.breakpoints.push(j as u32);
                    }
                    if last_move != step {
                        if step == Move::Vertical {
                            out.nb_gap_subject += 1;
                        } else {
                            out.nb_gap_query += 1;
                        }
                    }
                    if step == Move::Vertical {
                        i -= 1;
                    } else {
                        j -= 1;
                    }
                }
            }
            last_move = step;
            out.align_size += 1;
        }

        out.breakpoints.push(0);
        out.breakpoints.push(0);
        out
    }
}
