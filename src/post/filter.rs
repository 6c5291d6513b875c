use crate::align::Alignment;

/// Thresholds an alignment must meet to be reported. `None` disables a
/// criterion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlignmentFilter {
    pub max_evalue: Option<f64>,
    /// Minimum identity percentage (0-100).
    pub min_identity: Option<f64>,
    pub min_length: Option<u32>,
    pub min_bit_score: Option<f64>,
}

impl AlignmentFilter {
    pub fn accepts(&self, a: &Alignment<'_>) -> bool {
        self.max_evalue.map_or(true, |e| a.evalue <= e)
            && self.min_identity.map_or(true, |p| a.identity_percent() >= p)
            && self.min_length.map_or(true, |l| a.length >= l)
            && self.min_bit_score.map_or(true, |b| a.bit_score >= b)
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
