//! Substitution score matrices.
//!
//! Letters are expected in the codes produced by [`crate::sequence::Alphabet`];
//! for amino acids this is BLOSUM62 row order so no translation table is
//! needed on the hot path.

use crate::config::{AlgoKind, ScoringMatrix, SearchParams};
use crate::error::{PlastError, Result};
use crate::sequence::Alphabet;

/// Size of the BLOSUM62 matrix (25x25)
pub const BLOSUM62_SIZE: usize = 25;

/// Score for codes outside of the table (BLOSUM62 defscore).
pub const DEFSCORE: i32 = -4;

/// BLOSUM62 in packed order: ARNDCQEGHILKMFPSTWYVBJZX*
#[rustfmt::skip]
pub static BLOSUM62: [i8; BLOSUM62_SIZE * BLOSUM62_SIZE] = [
    //       A,  R,  N,  D,  C,  Q,  E,  G,  H,  I,  L,  K,  M,  F,  P,  S,  T,  W,  Y,  V,  B,  J,  Z,  X,  *
    /*A*/    4, -1, -2, -2,  0, -1, -1,  0, -2, -1, -1, -1, -1, -2, -1,  1,  0, -3, -2,  0, -2, -1, -1, -1, -4,
    /*R*/   -1,  5,  0, -2, -3,  1,  0, -2,  0, -3, -2,  2, -1, -3, -2, -1, -1, -3, -2, -3, -1, -2,  0, -1, -4,
    /*N*/   -2,  0,  6,  1, -3,  0,  0,  0,  1, -3, -3,  0, -2, -3, -2,  1,  0, -4, -2, -3,  4, -3,  0, -1, -4,
    /*D*/   -2, -2,  1,  6, -3,  0,  2, -1, -1, -3, -4, -1, -3, -3, -1,  0, -1, -4, -3, -3,  4, -3,  1, -1, -4,
    /*C*/    0, -3, -3, -3,  9, -3, -4, -3, -3, -1, -1, -3, -1, -2, -3, -1, -1, -2, -2, -1, -3, -1, -3, -1, -4,
    /*Q*/   -1,  1,  0,  0, -3,  5,  2, -2,  0, -3, -2,  1,  0, -3, -1,  0, -1, -2, -1, -2,  0, -2,  4, -1, -4,
    /*E*/   -1,  0,  0,  2, -4,  2,  5, -2,  0, -3, -3,  1, -2, -3, -1,  0, -1, -3, -2, -2,  1, -3,  4, -1, -4,
    /*G*/    0, -2,  0, -1, -3, -2, -2,  6, -2, -4, -4, -2, -3, -3, -2,  0, -2, -2, -3, -3, -1, -4, -2, -1, -4,
    /*H*/   -2,  0,  1, -1, -3,  0,  0, -2,  8, -3, -3, -1, -2, -1, -2, -1, -2, -2,  2, -3,  0, -3,  0, -1, -4,
    /*I*/   -1, -3, -3, -3, -1, -3, -3, -4, -3,  4,  2, -3,  1,  0, -3, -2, -1, -3, -1,  3, -3,  3, -3, -1, -4,
    /*L*/   -1, -2, -3, -4, -1, -2, -3, -4, -3,  2,  4, -2,  2,  0, -3, -2, -1, -2, -1,  1, -4,  3, -3, -1, -4,
    /*K*/   -1,  2,  0, -1, -3,  1,  1, -2, -1, -3, -2,  5, -1, -3, -1,  0, -1, -3, -2, -2,  0, -3,  1, -1, -4,
    /*M*/   -1, -1, -2, -3, -1,  0, -2, -3, -2,  1,  2, -1,  5,  0, -2, -1, -1, -1, -1,  1, -3,  2, -1, -1, -4,
    /*F*/   -2, -3, -3, -3, -2, -3, -3, -3, -1,  0,  0, -3,  0,  6, -4, -2, -2,  1,  3, -1, -3,  0, -3, -1, -4,
    /*P*/   -1, -2, -2, -1, -3, -1, -1, -2, -2, -3, -3, -1, -2, -4,  7, -1, -1, -4, -3, -2, -2, -3, -1, -1, -4,
    /*S*/    1, -1,  1,  0, -1,  0,  0,  0, -1, -2, -2,  0, -1, -2, -1,  4,  1, -3, -2, -2,  0, -2,  0, -1, -4,
    /*T*/    0, -1,  0, -1, -1, -1, -1, -2, -2, -1, -1, -1, -1, -2, -1,  1,  5, -2, -2,  0, -1, -1, -1, -1, -4,
    /*W*/   -3, -3, -4, -4, -2, -2, -3, -2, -2, -3, -2, -3, -1,  1, -4, -3, -2, 11,  2, -3, -4, -2, -2, -1, -4,
    /*Y*/   -2, -2, -2, -3, -2, -1, -2, -3,  2, -1, -1, -2, -1,  3, -3, -2, -2,  2,  7, -1, -3, -1, -2, -1, -4,
    /*V*/    0, -3, -3, -3, -1, -2, -2, -3, -3,  3,  1, -2,  1, -1, -2, -2,  0, -3, -1,  4, -3,  2, -2, -1, -4,
    /*B*/   -2, -1,  4,  4, -3,  0,  1, -1,  0, -3, -4,  0, -3, -3, -2,  0, -1, -4, -3, -3,  4, -3,  0, -1, -4,
    /*J*/   -1, -2, -3, -3, -1, -2, -3, -4, -3,  3,  3, -3,  2,  0, -3, -2, -1, -2, -1,  2, -3,  3, -3, -1, -4,
    /*Z*/   -1,  0,  0,  1, -3,  4,  4, -2,  0, -3, -3,  1, -1, -3, -1,  0, -1, -2, -2, -2,  0, -3,  4, -1, -4,
    /*X*/   -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -4,
    /***/   -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4,  1,
];

/// Dense square substitution matrix indexed by alphabet codes.
#[derive(Debug, Clone)]
pub struct ScoreMatrix {
    alphabet: Alphabet,
    size: usize,
    scores: Vec<i32>,
    default_score: i32,
}

impl ScoreMatrix {
    pub fn blosum62() -> Self {
        Self {
            alphabet: Alphabet::AminoAcid,
            size: BLOSUM62_SIZE,
            scores: BLOSUM62.iter().map(|&s| s as i32).collect(),
            default_score: DEFSCORE,
        }
    }

    /// Protein matrix by name. Only BLOSUM62 ships with score values.
    pub fn protein(matrix: ScoringMatrix) -> Result<Self> {
        match matrix {
            ScoringMatrix::Blosum62 => Ok(Self::blosum62()),
            other => Err(PlastError::UnsupportedMatrix(other.to_string())),
        }
    }

    /// Match/mismatch matrix over `ACGTN`. The wildcard scores as a mismatch
    /// against everything, itself included.
    pub fn nucleotide(reward: i32, penalty: i32) -> Self {
        let size = Alphabet::Nucleotide.size();
        let core = Alphabet::Nucleotide.core_size();
        let mut scores = vec![penalty; size * size];
        for i in 0..core {
            scores[i * size + i] = reward;
        }
        Self {
            alphabet: Alphabet::Nucleotide,
            size,
            scores,
            default_score: penalty,
        }
    }

    /// Matrix of the program selected by `params`.
    pub fn from_params(params: &SearchParams) -> Result<Self> {
        match params.algo {
            AlgoKind::Plastp => Self::protein(params.matrix),
            AlgoKind::Plastn => Ok(Self::nucleotide(params.reward, params.penalty)),
        }
    }

    pub fn alphabet(&self) -> Alphabet {
        self.alphabet
    }

    #[inline(always)]
    pub fn score(&self, a: u8, b: u8) -> i32 {
        let (a, b) = (a as usize, b as usize);
        if a >= self.size || b >= self.size {
            return self.default_score;
        }
        self.scores[a * self.size + b]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blosum62_symmetric() {
        let m = ScoreMatrix::blosum62();
        for i in 0..BLOSUM62_SIZE as u8 {
            for j in 0..BLOSUM62_SIZE as u8 {
                assert_eq!(m.score(i, j), m.score(j, i), "asymmetry at {i},{j}");
            }
        }
    }

    #[test]
    fn test_blosum62_known_values() {
        let aa = Alphabet::AminoAcid;
        let m = ScoreMatrix::blosum62();
        assert_eq!(m.score(aa.encode(b'W'), aa.encode(b'W')), 11);
        assert_eq!(m.score(aa.encode(b'A'), aa.encode(b'A')), 4);
        assert_eq!(m.score(aa.encode(b'C'), aa.encode(b'E')), -4);
        assert_eq!(m.score(200, 0), DEFSCORE);
    }

    #[test]
    fn test_nucleotide_matrix() {
        let nt = Alphabet::Nucleotide;
        let m = ScoreMatrix::nucleotide(2, -3);
        assert_eq!(m.score(nt.encode(b'A'), nt.encode(b'A')), 2);
        assert_eq!(m.score(nt.encode(b'A'), nt.encode(b'C')), -3);
        assert_eq!(m.score(nt.encode(b'N'), nt.encode(b'N')), -3);
    }

    #[test]
    fn test_unsupported_protein_matrix() {
        assert!(ScoreMatrix::protein(ScoringMatrix::Blosum62).is_ok());
        assert!(matches!(
            ScoreMatrix::protein(ScoringMatrix::Pam30),
            Err(PlastError::UnsupportedMatrix(_))
        ));
    }
}
