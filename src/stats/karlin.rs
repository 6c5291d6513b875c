use super::tables::KarlinParams;

/// Bit score of a raw score.
///
/// Formula: S' = (lambda * S - ln(K)) / ln(2)
#[inline]
pub fn bit_score(raw_score: i32, params: &KarlinParams) -> f64 {
    (params.lambda * raw_score as f64 - params.log_k()) / std::f64::consts::LN_2
}

/// E-value of a raw score over an effective search space.
///
/// Formula: E = effsp * exp(-lambda * S + ln(K))
#[inline]
pub fn evalue(raw_score: i32, params: &KarlinParams, effective_space: f64) -> f64 {
    effective_space * (-params.lambda * raw_score as f64 + params.log_k()).exp()
}

/// Smallest raw score whose e-value does not exceed `e_value`.
///
/// Formula: S = ceil((ln(K) + ln(effsp) - ln(E)) / lambda)
pub fn raw_score_from_evalue(e_value: f64, params: &KarlinParams, effective_space: f64) -> i32 {
    if e_value <= 0.0 {
        return i32::MAX;
    }
    let score = (params.log_k() + effective_space.ln() - e_value.ln()) / params.lambda;
    score.ceil() as i32
}
