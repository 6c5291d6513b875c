//! Pass 0: seed matching and ungapped extension.

use std::sync::atomic::{AtomicBool, Ordering};

use super::container::HspContainer;
use super::diagonal::DiagonalList;
use super::ungapped::extend_ungapped;
use super::Hsp;
use crate::algorithm::progress::PassProgress;
use crate::dispatch::{Command, RangeIterator};
use crate::error::{PlastError, Result};
use crate::seed::{SeedOccurrence, SequenceIndex};
use crate::sequence::SequenceDatabase;
use crate::utils::ScoreMatrix;

/// Everything Pass 0 workers share. Only the range iterator and the
/// diagonal list are mutated, both through their own synchronisation.
pub struct SeedSearch<'a> {
    pub query_db: &'a SequenceDatabase,
    pub subject_db: &'a SequenceDatabase,
    pub query_index: &'a SequenceIndex,
    pub subject_index: &'a SequenceIndex,
    pub matrix: &'a ScoreMatrix,
    pub span: usize,
    pub neighbour_length: usize,
    pub score_threshold: i32,
    pub xdrop: i32,
    pub codes: &'a RangeIterator,
    pub diagonals: &'a DiagonalList,
    pub running: &'a AtomicBool,
    pub progress: &'a PassProgress<'a>,
}

/// One Pass 0 worker. Drains seed codes from the shared range iterator and
/// fills its private container.
pub struct HspGeneratorCmd<'a> {
    search: &'a SeedSearch<'a>,
    label: String,
    pub output: HspContainer,
    /// Seed pairs skipped because their cell was already covered.
    pub covered: u64,
}

impl<'a> HspGeneratorCmd<'a> {
    pub fn new(search: &'a SeedSearch<'a>, unit: usize) -> Self {
        Self {
            search,
            label: format!("hsp-generator-{unit}"),
            output: HspContainer::new(),
            covered: 0,
        }
    }

    fn process_pair(&mut self, s_occ: &SeedOccurrence, q_occ: &SeedOccurrence) {
        let search = self.search;
        let diagonal =
            search
                .diagonals
                .diagonal(q_occ.offset_in_db, s_occ.offset_in_db, q_occ.seq_index);
        if search.diagonals.is_covered(diagonal, q_occ.offset_in_db) {
            self.covered += 1;
            return;
        }

        let (Some(query), Some(subject)) = (
            search.query_db.sequence(q_occ.seq_index),
            search.subject_db.sequence(s_occ.seq_index),
        ) else {
            log::warn!(
                "Seed refers to missing sequence (query {}, subject {})",
                q_occ.seq_index,
                s_occ.seq_index
            );
            return;
        };

        let hit = extend_ungapped(
            query.letters,
            subject.letters,
            q_occ.offset_in_seq as usize,
            s_occ.offset_in_seq as usize,
            search.span,
            search.matrix,
            search.xdrop,
            search.neighbour_length,
        );
        if hit.score < search.score_threshold {
            return;
        }

        let q_start = query.offset + hit.q_start as u32;
        let s_start = subject.offset + hit.s_start as u32;
        let last = hit.length as u32 - 1;
        if !search.diagonals.try_register(diagonal, q_start, q_start + last) {
            self.covered += 1;
            return;
        }
        self.output.push(Hsp {
            q_idx: q_occ.seq_index,
            s_idx: s_occ.seq_index,
            q_start,
            q_stop: q_start + last,
            s_start,
            s_stop: s_start + last,
            score: hit.score,
            anchor_q: q_start + last / 2,
            anchor_s: s_start + last / 2,
        });
    }
}

impl Command for HspGeneratorCmd<'_> {
    fn execute(&mut self) -> Result<()> {
        let search = self.search;
        while let Some(chunk) = search.codes.next_chunk() {
            if !search.running.load(Ordering::Relaxed) {
                return Err(PlastError::Cancelled);
            }
            for code in chunk.start..chunk.end {
                let code = code as u32;
                let subject_occ = search.subject_index.occurrences(code);
                if subject_occ.is_empty() {
                    continue;
                }
                let query_occ = search.query_index.occurrences(code);
                for s_occ in subject_occ {
                    for q_occ in query_occ {
                        self.process_pair(s_occ, q_occ);
                    }
                }
            }
            search.progress.update(search.codes.progress());
        }
        Ok(())
    }

    fn label(&self) -> &str {
        &self.label
    }
}
