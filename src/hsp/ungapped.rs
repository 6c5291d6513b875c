//! Ungapped seed extension used by Pass 0.

use crate::utils::ScoreMatrix;

/// Result of an ungapped extension, in sequence-relative coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UngappedHit {
    pub q_start: usize,
    pub s_start: usize,
    pub length: usize,
    pub score: i32,
}

/// Extends the seed `query[q_off..q_off + span]` / `subject[s_off..]` to the
/// right, then to the left from the best right end.
///
/// A direction stops at the sequence end, after `max_extension` letters,
/// when the running score drops to zero or when it falls `xdrop` below the
/// best score seen.
#[allow(clippy::too_many_arguments)]
pub fn extend_ungapped(
    query: &[u8],
    subject: &[u8],
    q_off: usize,
    s_off: usize,
    span: usize,
    matrix: &ScoreMatrix,
    xdrop: i32,
    max_extension: usize,
) -> UngappedHit {
    let seed_score: i32 = (0..span)
        .map(|k| matrix.score(query[q_off + k], subject[s_off + k]))
        .sum();

    let mut best = seed_score;

    // right
    let q_end = q_off + span;
    let s_end = s_off + span;
    let max_right = (query.len() - q_end)
        .min(subject.len() - s_end)
        .min(max_extension);
    let mut score = best;
    let mut right_len = 0;
    for i in 0..max_right {
        score += matrix.score(query[q_end + i], subject[s_end + i]);
        if score > best {
            best = score;
            right_len = i + 1;
        }
        if score <= 0 || best - score >= xdrop {
            break;
        }
    }

    // left, starting from the best right score
    let max_left = q_off.min(s_off).min(max_extension);
    let mut score = best;
    let mut left_len = 0;
    for i in 0..max_left {
        score += matrix.score(query[q_off - 1 - i], subject[s_off - 1 - i]);
        if score > best {
            best = score;
            left_len = i + 1;
        }
        if score <= 0 || best - score >= xdrop {
            break;
        }
    }

    UngappedHit {
        q_start: q_off - left_len,
        s_start: s_off - left_len,
        length: left_len + span + right_len,
        score: best,
    }
}
