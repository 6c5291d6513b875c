use super::length_adjustment::compute_length_adjustment;
use super::tables::KarlinParams;

/// Effective search space with length-adjusted values
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchSpace {
    pub effective_query_len: f64,
    pub effective_db_len: f64,
    /// Product of the effective lengths
    pub effective_space: f64,
    pub length_adjustment: i64,
}

impl SearchSpace {
    /// Search space of one query against a whole database.
    ///
    /// The query loses `ell` letters and the database `N * ell`, where `N`
    /// is its sequence count. Both effective lengths are floored at 1.
    pub fn for_database_search(
        query_len: u64,
        db_len: u64,
        db_num_seqs: u64,
        params: &KarlinParams,
    ) -> Self {
        let adjustment =
            compute_length_adjustment(query_len as i64, db_len as i64, db_num_seqs as i64, params);
        let ell = adjustment.length as f64;

        let effective_query_len = (query_len as f64 - ell).max(1.0);
        let effective_db_len = (db_len as f64 - ell * db_num_seqs.max(1) as f64).max(1.0);

        Self {
            effective_query_len,
            effective_db_len,
            effective_space: effective_query_len * effective_db_len,
            length_adjustment: adjustment.length,
        }
    }
}
