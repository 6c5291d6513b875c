//! Edge-effect length correction for Karlin-Altschul statistics.
//!
//! An alignment cannot start within `ell` letters of the end of either
//! sequence, so the effective lengths are `m - ell` and `n - N*ell`. The
//! correction is the fixed point of
//!
//! ```text
//! ell = alpha/lambda * (ln K + ln((m - ell) * (n - N*ell))) + beta
//! ```
//!
//! found by a bracketed iteration that never leaves `[0, ell_max]`.

use super::tables::KarlinParams;

const MAX_ITERATIONS: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthAdjustment {
    pub length: i64,
    pub converged: bool,
}

impl LengthAdjustment {
    const NONE: Self = Self {
        length: 0,
        converged: false,
    };
}

/// Length adjustment of a query of `query_length` letters searched against
/// a database of `db_length` letters split in `db_num_seqs` sequences.
pub fn compute_length_adjustment(
    query_length: i64,
    db_length: i64,
    db_num_seqs: i64,
    params: &KarlinParams,
) -> LengthAdjustment {
    let m = query_length as f64;
    let n = db_length as f64;
    let nseq = db_num_seqs.max(1) as f64;

    if m <= 0.0 || n <= 0.0 || params.k <= 0.0 || params.lambda <= 0.0 {
        return LengthAdjustment::NONE;
    }

    let log_k = params.log_k();
    let alpha_d_lambda = params.alpha / params.lambda;
    let fixed_point = |ell: f64| {
        let ss = (m - ell) * (n - nseq * ell);
        alpha_d_lambda * (log_k + ss.ln()) + params.beta
    };

    // Largest ell keeping K * (m - ell) * (n - N*ell) > max(m, n):
    // root of N*ell^2 - (m*N + n)*ell + (m*n - max(m,n)/K) = 0.
    let c = n * m - m.max(n) / params.k;
    if c < 0.0 {
        return LengthAdjustment {
            length: 0,
            converged: true,
        };
    }
    let minus_b = m * nseq + n;
    let discriminant = minus_b * minus_b - 4.0 * nseq * c;
    if discriminant < 0.0 {
        return LengthAdjustment::NONE;
    }

    let mut ell_max = 2.0 * c / (minus_b + discriminant.sqrt());
    let mut ell_min = 0.0_f64;
    let mut ell_next = 0.0_f64;
    let mut converged = false;

    for iteration in 1..=MAX_ITERATIONS {
        let ell = ell_next;
        let ell_bar = fixed_point(ell);

        if ell_bar >= ell {
            ell_min = ell;
            if ell_bar - ell_min <= 1.0 {
                converged = true;
                break;
            }
            if ell_min == ell_max {
                break;
            }
        } else {
            ell_max = ell;
        }

        ell_next = if ell_min <= ell_bar && ell_bar <= ell_max {
            ell_bar
        } else if iteration == 1 {
            ell_max
        } else {
            (ell_min + ell_max) / 2.0
        };
    }

    let mut length = ell_min as i64;
    if converged {
        // floor(ell_min) may undershoot the fixed point by one
        let ell_ceil = ell_min.ceil();
        if ell_ceil <= ell_max && fixed_point(ell_ceil) >= ell_ceil {
            length = ell_ceil as i64;
        }
    }

    LengthAdjustment { length, converged }
}
