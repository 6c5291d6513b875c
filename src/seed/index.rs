//! Seed index of one sequence database.
//!
//! Occurrences are stored in a single array grouped by seed code, with a
//! `starts` table giving the slice of each code (compressed sparse rows).
//! Within one code, occurrences keep database order.

use rayon::prelude::*;

use super::model::SeedModel;
use crate::sequence::SequenceDatabase;

/// One place where a seed occurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedOccurrence {
    pub seq_index: u32,
    /// Absolute offset of the seed's first letter in the database buffer.
    pub offset_in_db: u32,
    pub offset_in_seq: u32,
}

#[derive(Debug, Clone)]
pub struct SequenceIndex {
    starts: Vec<u32>,
    occurrences: Vec<SeedOccurrence>,
}

impl SequenceIndex {
    pub fn build(db: &SequenceDatabase, model: &SeedModel) -> Self {
        let code_count = model.code_count() as usize;

        // Seeds never straddle two sequences.
        let per_sequence: Vec<Vec<(u32, SeedOccurrence)>> = (0..db.len() as u32)
            .into_par_iter()
            .map(|idx| match db.sequence(idx) {
                Some(seq) => model
                    .seeds(seq.letters)
                    .map(|(off, code)| {
                        (
                            code,
                            SeedOccurrence {
                                seq_index: idx,
                                offset_in_db: seq.offset + off,
                                offset_in_seq: off,
                            },
                        )
                    })
                    .collect(),
                None => Vec::new(),
            })
            .collect();

        let mut starts = vec![0u32; code_count + 1];
        for &(code, _) in per_sequence.iter().flatten() {
            starts[code as usize + 1] += 1;
        }
        for c in 0..code_count {
            starts[c + 1] += starts[c];
        }

        let total = starts[code_count] as usize;
        let mut cursor = starts.clone();
        let mut occurrences = vec![
            SeedOccurrence {
                seq_index: 0,
                offset_in_db: 0,
                offset_in_seq: 0,
            };
            total
        ];
        for &(code, occ) in per_sequence.iter().flatten() {
            let slot = &mut cursor[code as usize];
            occurrences[*slot as usize] = occ;
            *slot += 1;
        }

        log::debug!(
            "Indexed {} seed occurrences over {} codes",
            occurrences.len(),
            code_count
        );
        Self {
            starts,
            occurrences,
        }
    }

    pub fn code_count(&self) -> u32 {
        (self.starts.len() - 1) as u32
    }

    /// Occurrences of `code`, empty for codes outside the model.
    pub fn occurrences(&self, code: u32) -> &[SeedOccurrence] {
        let c = code as usize;
        if c + 1 >= self.starts.len() {
            return &[];
        }
        &self.occurrences[self.starts[c] as usize..self.starts[c + 1] as usize]
    }

    /// Total number of indexed seeds.
    pub fn len(&self) -> usize {
        self.occurrences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occurrences.is_empty()
    }
}
