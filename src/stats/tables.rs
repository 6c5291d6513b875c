//! Precomputed Karlin-Altschul parameters per scoring system.
//!
//! Rows are `(gap_open, gap_extend, lambda, K, H, alpha, beta)`. A gap of
//! length `k` costs `gap_open + k * gap_extend`. Nucleotide rows with
//! `(0, 0)` and protein rows with `(i32::MAX, i32::MAX)` hold the ungapped
//! values.

use crate::config::{AlgoKind, ScoringMatrix, SearchParams};
use crate::error::{PlastError, Result};

/// Karlin-Altschul statistical parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KarlinParams {
    pub lambda: f64,
    pub k: f64,
    /// Relative entropy
    pub h: f64,
    pub alpha: f64,
    pub beta: f64,
}

impl KarlinParams {
    #[inline]
    pub fn log_k(&self) -> f64 {
        self.k.ln()
    }
}

#[derive(Debug, Clone, Copy)]
struct ParamEntry {
    gap_open: i32,
    gap_extend: i32,
    lambda: f64,
    k: f64,
    h: f64,
    alpha: f64,
    beta: f64,
}

impl ParamEntry {
    const fn new(
        gap_open: i32,
        gap_extend: i32,
        lambda: f64,
        k: f64,
        h: f64,
        alpha: f64,
        beta: f64,
    ) -> Self {
        Self {
            gap_open,
            gap_extend,
            lambda,
            k,
            h,
            alpha,
            beta,
        }
    }

    fn to_karlin_params(self) -> KarlinParams {
        KarlinParams {
            lambda: self.lambda,
            k: self.k,
            h: self.h,
            alpha: self.alpha,
            beta: self.beta,
        }
    }
}

// ============================================================================
// NUCLEOTIDE
// ============================================================================

/// Parameters for reward=1, penalty=-5
const NUCL_1_5: &[ParamEntry] = &[
    ParamEntry::new(0, 0, 1.39, 0.747, 1.38, 1.00, 0.0),
    ParamEntry::new(3, 3, 1.39, 0.747, 1.38, 1.00, 0.0),
];

/// Parameters for reward=1, penalty=-4
const NUCL_1_4: &[ParamEntry] = &[
    ParamEntry::new(0, 0, 1.383, 0.738, 1.36, 1.02, 0.0),
    ParamEntry::new(1, 2, 1.36, 0.67, 1.2, 1.1, 0.0),
    ParamEntry::new(0, 2, 1.26, 0.43, 0.90, 1.4, -1.0),
    ParamEntry::new(2, 1, 1.35, 0.61, 1.1, 1.2, -1.0),
    ParamEntry::new(1, 1, 1.22, 0.35, 0.72, 1.7, -3.0),
];

/// Parameters for reward=2, penalty=-7
const NUCL_2_7: &[ParamEntry] = &[
    ParamEntry::new(0, 0, 0.69, 0.73, 1.34, 0.515, 0.0),
    ParamEntry::new(2, 4, 0.68, 0.67, 1.2, 0.55, 0.0),
    ParamEntry::new(0, 4, 0.63, 0.43, 0.90, 0.7, -1.0),
    ParamEntry::new(4, 2, 0.675, 0.62, 1.1, 0.6, -1.0),
    ParamEntry::new(2, 2, 0.61, 0.35, 0.72, 1.7, -3.0),
];

/// Parameters for reward=1, penalty=-3
const NUCL_1_3: &[ParamEntry] = &[
    ParamEntry::new(0, 0, 1.374, 0.711, 1.31, 1.05, 0.0),
    ParamEntry::new(2, 2, 1.37, 0.70, 1.2, 1.1, 0.0),
    ParamEntry::new(1, 2, 1.35, 0.64, 1.1, 1.2, -1.0),
    ParamEntry::new(0, 2, 1.25, 0.42, 0.83, 1.5, -2.0),
    ParamEntry::new(2, 1, 1.34, 0.60, 1.1, 1.2, -1.0),
    ParamEntry::new(1, 1, 1.21, 0.34, 0.71, 1.7, -2.0),
];

/// Parameters for reward=2, penalty=-5
const NUCL_2_5: &[ParamEntry] = &[
    ParamEntry::new(0, 0, 0.675, 0.65, 1.1, 0.6, -1.0),
    ParamEntry::new(2, 4, 0.67, 0.59, 1.1, 0.6, -1.0),
    ParamEntry::new(0, 4, 0.62, 0.39, 0.78, 0.8, -2.0),
    ParamEntry::new(4, 2, 0.67, 0.61, 1.0, 0.65, -2.0),
    ParamEntry::new(2, 2, 0.56, 0.32, 0.59, 0.95, -4.0),
];

/// Parameters for reward=1, penalty=-2
const NUCL_1_2: &[ParamEntry] = &[
    ParamEntry::new(0, 0, 1.28, 0.46, 0.85, 1.5, -2.0),
    ParamEntry::new(2, 2, 1.33, 0.62, 1.1, 1.2, 0.0),
    ParamEntry::new(1, 2, 1.30, 0.52, 0.93, 1.4, -2.0),
    ParamEntry::new(0, 2, 1.19, 0.34, 0.66, 1.8, -3.0),
    ParamEntry::new(3, 1, 1.32, 0.57, 1.0, 1.3, -1.0),
    ParamEntry::new(2, 1, 1.29, 0.49, 0.92, 1.4, -1.0),
    ParamEntry::new(1, 1, 1.14, 0.26, 0.52, 2.2, -5.0),
];

/// Parameters for reward=2, penalty=-3 (plastn default, 5/2 gaps)
const NUCL_2_3: &[ParamEntry] = &[
    ParamEntry::new(0, 0, 0.55, 0.21, 0.46, 1.2, -5.0),
    ParamEntry::new(4, 4, 0.63, 0.42, 0.84, 0.75, -2.0),
    ParamEntry::new(2, 4, 0.615, 0.37, 0.72, 0.85, -3.0),
    ParamEntry::new(0, 4, 0.55, 0.21, 0.46, 1.2, -5.0),
    ParamEntry::new(3, 3, 0.615, 0.37, 0.68, 0.9, -3.0),
    ParamEntry::new(6, 2, 0.63, 0.42, 0.84, 0.75, -2.0),
    ParamEntry::new(5, 2, 0.625, 0.41, 0.78, 0.8, -2.0),
    ParamEntry::new(4, 2, 0.61, 0.35, 0.68, 0.9, -3.0),
    ParamEntry::new(2, 2, 0.515, 0.14, 0.33, 1.55, -9.0),
];

/// Parameters for reward=4, penalty=-5
const NUCL_4_5: &[ParamEntry] = &[
    ParamEntry::new(0, 0, 0.22, 0.061, 0.22, 1.0, -15.0),
    ParamEntry::new(6, 5, 0.28, 0.21, 0.47, 0.6, -7.0),
    ParamEntry::new(5, 5, 0.27, 0.17, 0.39, 0.7, -9.0),
    ParamEntry::new(4, 5, 0.25, 0.10, 0.31, 0.8, -10.0),
    ParamEntry::new(3, 5, 0.23, 0.065, 0.25, 0.9, -11.0),
];

// ============================================================================
// PROTEIN
// ============================================================================

/// BLOSUM62 parameters. The first row holds the ungapped values.
const BLOSUM62: &[ParamEntry] = &[
    ParamEntry::new(i32::MAX, i32::MAX, 0.3176, 0.134, 0.4012, 0.7916, -3.2),
    ParamEntry::new(11, 2, 0.297, 0.082, 0.27, 1.1, -10.0),
    ParamEntry::new(10, 2, 0.291, 0.075, 0.23, 1.3, -15.0),
    ParamEntry::new(9, 2, 0.279, 0.058, 0.19, 1.5, -19.0),
    ParamEntry::new(8, 2, 0.264, 0.045, 0.15, 1.8, -26.0),
    ParamEntry::new(7, 2, 0.239, 0.027, 0.10, 2.5, -46.0),
    ParamEntry::new(6, 2, 0.201, 0.012, 0.061, 3.3, -58.0),
    ParamEntry::new(13, 1, 0.292, 0.071, 0.23, 1.2, -11.0),
    ParamEntry::new(12, 1, 0.283, 0.059, 0.19, 1.5, -19.0),
    ParamEntry::new(11, 1, 0.267, 0.041, 0.14, 1.9, -30.0),
    ParamEntry::new(10, 1, 0.243, 0.024, 0.10, 2.5, -44.0),
    ParamEntry::new(9, 1, 0.206, 0.010, 0.052, 4.0, -87.0),
];

const NUCL_UNGAPPED: (i32, i32) = (0, 0);
const PROT_UNGAPPED: (i32, i32) = (i32::MAX, i32::MAX);

fn nucl_table(reward: i32, penalty: i32) -> Option<&'static [ParamEntry]> {
    let table: &[ParamEntry] = match (reward, penalty.abs()) {
        (1, 5) => NUCL_1_5,
        (1, 4) => NUCL_1_4,
        (2, 7) => NUCL_2_7,
        (1, 3) => NUCL_1_3,
        (2, 5) => NUCL_2_5,
        (1, 2) => NUCL_1_2,
        (2, 3) => NUCL_2_3,
        (4, 5) => NUCL_4_5,
        _ => return None,
    };
    Some(table)
}

fn protein_table(matrix: ScoringMatrix) -> Result<&'static [ParamEntry]> {
    match matrix {
        ScoringMatrix::Blosum62 => Ok(BLOSUM62),
        other => Err(PlastError::UnsupportedMatrix(other.to_string())),
    }
}

fn find(table: &[ParamEntry], key: (i32, i32)) -> Option<KarlinParams> {
    table
        .iter()
        .find(|e| (e.gap_open, e.gap_extend) == key)
        .map(|e| e.to_karlin_params())
}

fn unsupported(params: &SearchParams) -> PlastError {
    PlastError::UnsupportedScoring {
        reward: params.reward,
        penalty: params.penalty,
        gap_open: params.gap_open,
        gap_extend: params.gap_extend,
    }
}

/// Gapped parameters for the scoring system of `params`. Gap costs must be
/// resolved already; unknown combinations are rejected rather than guessed.
pub fn lookup_gapped_params(params: &SearchParams) -> Result<KarlinParams> {
    let key = (params.gap_open, params.gap_extend);
    let table = match params.algo {
        AlgoKind::Plastp => protein_table(params.matrix)?,
        AlgoKind::Plastn => {
            nucl_table(params.reward, params.penalty).ok_or_else(|| unsupported(params))?
        }
    };
    find(table, key).ok_or_else(|| unsupported(params))
}

/// Ungapped parameters, used to convert bit x-drops into raw scores.
pub fn lookup_ungapped_params(params: &SearchParams) -> Result<KarlinParams> {
    match params.algo {
        AlgoKind::Plastp => {
            let table = protein_table(params.matrix)?;
            find(table, PROT_UNGAPPED).ok_or_else(|| unsupported(params))
        }
        AlgoKind::Plastn => {
            let table =
                nucl_table(params.reward, params.penalty).ok_or_else(|| unsupported(params))?;
            find(table, NUCL_UNGAPPED).ok_or_else(|| unsupported(params))
        }
    }
}
