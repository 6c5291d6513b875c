//! X-drop gapped extension with affine gaps.
//!
//! Each direction is a dynamic program over (query rows, subject columns)
//! that keeps only one row. Cells whose score falls more than `xdrop` below
//! the best score are dead; each row is computed over the window of live
//! cells of the previous row plus whatever a horizontal gap still reaches.
//! The extension stops when a row has no live cell.

use crate::error::{PlastError, Result};
use crate::utils::ScoreMatrix;

const NEG: i32 = i32::MIN / 4;

/// Reusable rows for [`extend_gapped`].
#[derive(Debug, Default)]
pub struct ExtensionScratch {
    h: Vec<i32>,
    e: Vec<i32>,
}

impl ExtensionScratch {
    pub fn new() -> Self {
        Self::default()
    }

    fn clear(&mut self) {
        self.h.clear();
        self.e.clear();
    }

    #[inline]
    fn store(&mut self, j: usize, h: i32, e: i32) -> Result<()> {
        if j < self.h.len() {
            self.h[j] = h;
            self.e[j] = e;
        } else {
            if self.h.len() == self.h.capacity() {
                let grow = self.h.len().max(64);
                self.h
                    .try_reserve(grow)
                    .and_then(|_| self.e.try_reserve(grow))
                    .map_err(|e| PlastError::Allocation(format!("extension row: {e}")))?;
            }
            self.h.push(h);
            self.e.push(e);
        }
        Ok(())
    }
}

/// Bounds of a gapped extension, sequence-relative and inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GappedExtension {
    pub q_start: usize,
    pub q_end: usize,
    pub s_start: usize,
    pub s_end: usize,
    pub score: i32,
}

/// Affine gap costs: a gap of `k` letters costs `open + k * extend`.
#[derive(Debug, Clone, Copy)]
pub struct GapCosts {
    pub open: i32,
    pub extend: i32,
}

/// Best (rows, columns, score) reached from the origin; `q_at(i)` and
/// `s_at(j)` give the letters of row `i` and column `j`, both 1-based.
#[allow(clippy::too_many_arguments)]
fn extend_one_direction<Q, S>(
    rows: usize,
    cols: usize,
    q_at: Q,
    s_at: S,
    matrix: &ScoreMatrix,
    gaps: GapCosts,
    xdrop: i32,
    scratch: &mut ExtensionScratch,
) -> Result<(usize, usize, i32)>
where
    Q: Fn(usize) -> u8,
    S: Fn(usize) -> u8,
{
    let open_ext = gaps.open + gaps.extend;
    scratch.clear();

    // row 0: leading horizontal gap
    scratch.store(0, 0, NEG)?;
    let mut last = 0;
    for j in 1..=cols {
        let score = -(gaps.open + j as i32 * gaps.extend);
        if score < -xdrop {
            break;
        }
        scratch.store(j, score, NEG)?;
        last = j;
    }
    let mut first = 0;

    let (mut best, mut best_i, mut best_j) = (0, 0, 0);

    for i in 1..=rows {
        let qc = q_at(i);
        let mut f = NEG;
        let mut h_diag = NEG;
        let mut live: Option<(usize, usize)> = None;

        let mut j = first;
        while j <= cols {
            if j > last + 1 && f < best - xdrop {
                break;
            }
            let (h_up, e_up) = if j <= last {
                (scratch.h[j], scratch.e[j])
            } else {
                (NEG, NEG)
            };

            let e = (e_up - gaps.extend).max(h_up - open_ext);
            let d = if j > 0 {
                h_diag + matrix.score(qc, s_at(j))
            } else {
                NEG
            };
            let h = d.max(e).max(f);
            h_diag = h_up;

            let floor = best - xdrop;
            if h < floor {
                scratch.store(j, NEG, NEG)?;
                f = NEG;
            } else {
                if h > best {
                    best = h;
                    best_i = i;
                    best_j = j;
                }
                scratch.store(j, h, if e < floor { NEG } else { e })?;
                f = (f - gaps.extend).max(h - open_ext);
                live = Some(match live {
                    Some((lo, _)) => (lo, j),
                    None => (j, j),
                });
            }
            j += 1;
        }

        match live {
            Some((lo, hi)) => {
                first = lo;
                last = hi;
            }
            None => break,
        }
    }

    Ok((best_i, best_j, best))
}

/// Gapped extension in both directions around the anchor cell.
///
/// The right part starts on the anchor letters, the left part on the
/// letters just before them. Returns an empty extension with score 0 when
/// neither direction reaches a positive score.
#[allow(clippy::too_many_arguments)]
pub fn extend_gapped(
    query: &[u8],
    subject: &[u8],
    q_anchor: usize,
    s_anchor: usize,
    matrix: &ScoreMatrix,
    gaps: GapCosts,
    xdrop: i32,
    scratch: &mut ExtensionScratch,
) -> Result<GappedExtension> {
    let (ri, rj, right) = extend_one_direction(
        query.len().saturating_sub(q_anchor),
        subject.len().saturating_sub(s_anchor),
        |i| query[q_anchor + i - 1],
        |j| subject[s_anchor + j - 1],
        matrix,
        gaps,
        xdrop,
        scratch,
    )?;
    let (li, lj, left) = extend_one_direction(
        q_anchor.min(query.len()),
        s_anchor.min(subject.len()),
        |i| query[q_anchor - i],
        |j| subject[s_anchor - j],
        matrix,
        gaps,
        xdrop,
        scratch,
    )?;

    if ri + li == 0 {
        return Ok(GappedExtension {
            q_start: q_anchor,
            q_end: q_anchor,
            s_start: s_anchor,
            s_end: s_anchor,
            score: 0,
        });
    }
    Ok(GappedExtension {
        q_start: q_anchor - li,
        q_end: q_anchor + ri - 1,
        s_start: s_anchor - lj,
        s_end: s_anchor + rj - 1,
        score: left + right,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::Alphabet;

    const GAPS: GapCosts = GapCosts {
        open: 11,
        extend: 1,
    };

    fn aa(s: &str) -> Vec<u8> {
        Alphabet::AminoAcid.encode_all(s.as_bytes())
    }

    fn self_score(s: &str, m: &ScoreMatrix) -> i32 {
        aa(s).iter().map(|&c| m.score(c, c)).sum()
    }

    #[test]
    fn test_identical_block() {
        let m = ScoreMatrix::blosum62();
        let core = "MKVLAAGTWQERHYIPNDFC";
        let q = aa(&format!("WWWW{core}WWWW"));
        let s = aa(&format!("PP{core}PPPPPP"));
        let mut scratch = ExtensionScratch::new();
        let ext = extend_gapped(&q, &s, 14, 12, &m, GAPS, 40, &mut scratch).unwrap();
        assert_eq!((ext.q_start, ext.q_end), (4, 23));
        assert_eq!((ext.s_start, ext.s_end), (2, 21));
        assert_eq!(ext.score, self_score(core, &m));
    }

    #[test]
    fn test_bridges_a_gap() {
        let m = ScoreMatrix::blosum62();
        let left = "MKVLAAGTWQERHYIP";
        let right = "NDFCWYHKMRWEQ";
        let q = aa(&format!("{left}{right}"));
        let s = aa(&format!("{left}GGG{right}"));
        let mut scratch = ExtensionScratch::new();
        let ext = extend_gapped(&q, &s, 5, 5, &m, GAPS, 60, &mut scratch).unwrap();
        assert_eq!((ext.q_start, ext.q_end), (0, q.len() - 1));
        assert_eq!((ext.s_start, ext.s_end), (0, s.len() - 1));
        let expected = self_score(left, &m) + self_score(right, &m) - (GAPS.open + 3 * GAPS.extend);
        assert_eq!(ext.score, expected);
    }

    #[test]
    fn test_small_xdrop_stops_at_gap() {
        let m = ScoreMatrix::blosum62();
        let left = "MKVLAAGTWQERHYIP";
        let right = "NDFCWYHKMRWEQ";
        let q = aa(&format!("{left}{right}"));
        let s = aa(&format!("{left}GGG{right}"));
        let mut scratch = ExtensionScratch::new();
        let ext = extend_gapped(&q, &s, 5, 5, &m, GAPS, 5, &mut scratch).unwrap();
        assert_eq!((ext.q_start, ext.q_end), (0, left.len() - 1));
        assert_eq!(ext.score, self_score(left, &m));
    }

    #[test]
    fn test_mismatching_anchor() {
        let m = ScoreMatrix::nucleotide(1, -3);
        let nt = Alphabet::Nucleotide;
        let q = nt.encode_all(b"A");
        let s = nt.encode_all(b"C");
        let mut scratch = ExtensionScratch::new();
        let ext = extend_gapped(&q, &s, 0, 0, &m, GapCosts { open: 5, extend: 2 }, 10, &mut scratch)
            .unwrap();
        assert_eq!(ext.score, 0);
    }
}
