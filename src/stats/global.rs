use super::karlin::{bit_score, evalue};
use super::tables::{lookup_gapped_params, lookup_ungapped_params, KarlinParams};
use crate::config::SearchParams;
use crate::error::Result;
use crate::sequence::SequenceDatabase;

/// Statistical parameters shared by every query of one run.
#[derive(Debug, Clone, Copy)]
pub struct GlobalStatistics {
    pub gapped: KarlinParams,
    pub ungapped: KarlinParams,
    /// Total letters of the subject database.
    pub subject_size: u64,
    pub subject_count: u64,
}

impl GlobalStatistics {
    /// `params` must already be resolved so gap costs are known.
    pub fn new(params: &SearchParams, subject_db: &SequenceDatabase) -> Result<Self> {
        Ok(Self {
            gapped: lookup_gapped_params(params)?,
            ungapped: lookup_ungapped_params(params)?,
            subject_size: subject_db.size(),
            subject_count: subject_db.len() as u64,
        })
    }

    #[inline]
    pub fn bit_score(&self, raw_score: i32) -> f64 {
        bit_score(raw_score, &self.gapped)
    }

    #[inline]
    pub fn evalue(&self, raw_score: i32, effective_space: f64) -> f64 {
        evalue(raw_score, &self.gapped, effective_space)
    }
}
