//! Per-query search space and score cutoff.

use super::global::GlobalStatistics;
use super::karlin::raw_score_from_evalue;
use super::search_space::SearchSpace;
use crate::sequence::SequenceDatabase;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryStatistics {
    pub effective_space: f64,
    /// Smallest raw score whose e-value meets the threshold, at least 1.
    pub cutoff: i32,
}

/// Statistics of every query of a database, by query index.
#[derive(Debug, Clone)]
pub struct QueryInfo {
    queries: Vec<QueryStatistics>,
}

impl QueryInfo {
    pub fn new(query_db: &SequenceDatabase, global: &GlobalStatistics, evalue: f64) -> Self {
        let queries = query_db
            .iter()
            .map(|q| {
                let space = SearchSpace::for_database_search(
                    q.len() as u64,
                    global.subject_size,
                    global.subject_count,
                    &global.gapped,
                );
                let cutoff =
                    raw_score_from_evalue(evalue, &global.gapped, space.effective_space).max(1);
                QueryStatistics {
                    effective_space: space.effective_space,
                    cutoff,
                }
            })
            .collect();
        Self { queries }
    }

    pub fn get(&self, query_index: u32) -> Option<&QueryStatistics> {
        self.queries.get(query_index as usize)
    }

    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }
}
