//! Pass 2: turns the final HSPs into scored alignments.

use std::sync::atomic::{AtomicBool, Ordering};

use super::alignment::Alignment;
use super::container::AlignmentContainer;
use super::semi_gapped::GapCosts;
use super::splitter::AlignmentSplitter;
use crate::algorithm::progress::PassProgress;
use crate::dispatch::Command;
use crate::error::{PlastError, Result};
use crate::hsp::{Hsp, HspContainer};
use crate::sequence::SequenceDatabase;
use crate::stats::{GlobalStatistics, QueryInfo};
use crate::utils::ScoreMatrix;

/// Inputs of Pass 2. Alignments borrow from the databases (`'db`), which
/// outlive the per-pass borrows (`'a`).
pub struct AlignmentContext<'a, 'db> {
    pub query_db: &'db SequenceDatabase,
    pub subject_db: &'db SequenceDatabase,
    pub matrix: &'a ScoreMatrix,
    pub gaps: GapCosts,
    pub global: &'a GlobalStatistics,
    pub query_info: &'a QueryInfo,
    pub source: &'a HspContainer,
    pub workers: usize,
    /// Frame recorded on every query side (`-1` for the minus strand).
    pub query_frame: i8,
    pub running: &'a AtomicBool,
    pub progress: &'a PassProgress<'a>,
}

pub struct AlignmentGeneratorCmd<'a, 'db> {
    ctx: &'a AlignmentContext<'a, 'db>,
    unit: usize,
    label: String,
    splitter: AlignmentSplitter<'a>,
    pub output: AlignmentContainer<'db>,
    /// HSPs skipped because they were too large to split or did not lie in
    /// the sequences they name.
    pub skipped: u64,
}

impl<'a, 'db> AlignmentGeneratorCmd<'a, 'db> {
    pub fn new(ctx: &'a AlignmentContext<'a, 'db>, unit: usize) -> Result<Self> {
        Ok(Self {
            ctx,
            unit,
            label: format!("alignment-generator-{unit}"),
            splitter: AlignmentSplitter::new(ctx.matrix, ctx.gaps)?,
            output: AlignmentContainer::new(),
            skipped: 0,
        })
    }

    fn build(&mut self, hsp: &Hsp) -> Result<Option<Alignment<'db>>> {
        let ctx = self.ctx;
        let Some((query, subject)) = hsp.resolve(ctx.query_db, ctx.subject_db) else {
            log::warn!(
                "HSP does not lie in its sequences (query {} at {}, subject {} at {}), skipped",
                hsp.q_idx,
                hsp.q_start,
                hsp.s_idx,
                hsp.s_start
            );
            self.skipped += 1;
            return Ok(None);
        };
        let Some(stats) = ctx.query_info.get(hsp.q_idx) else {
            log::warn!("No statistics for query {}", hsp.q_idx);
            self.skipped += 1;
            return Ok(None);
        };
        if hsp.score < stats.cutoff {
            return Ok(None);
        }

        let query_range = hsp.query_range().shift_down(query.offset);
        let subject_range = hsp.subject_range().shift_down(subject.offset);

        let split = self
            .splitter
            .split(subject.letters, query.letters, subject_range, query_range)?;
        if split.is_empty() {
            log::warn!(
                "Alignment {}:{}-{} / {}:{}-{} too large to split, skipped",
                query.id(),
                query_range.begin,
                query_range.end,
                subject.id(),
                subject_range.begin,
                subject_range.end
            );
            self.skipped += 1;
            return Ok(None);
        }

        Ok(Some(Alignment {
            query,
            subject,
            query_range,
            subject_range,
            query_frame: ctx.query_frame,
            subject_frame: 1,
            score: hsp.score,
            evalue: ctx.global.evalue(hsp.score, stats.effective_space),
            bit_score: ctx.global.bit_score(hsp.score),
            length: split.align_size,
            identities: split.identity,
            positives: split.positive,
            mismatches: split.nb_mismatch,
            query_gap_openings: split.nb_gap_query,
            subject_gap_openings: split.nb_gap_subject,
        }))
    }
}

impl Command for AlignmentGeneratorCmd<'_, '_> {
    fn execute(&mut self) -> Result<()> {
        let ctx = self.ctx;
        let total = ctx.source.stripe_len(self.unit, ctx.workers);
        let notify = (total / 100).max(1);

        for (n, hsp) in ctx.source.stripe(self.unit, ctx.workers).enumerate() {
            if n % notify == 0 {
                if !ctx.running.load(Ordering::Relaxed) {
                    return Err(PlastError::Cancelled);
                }
                if self.unit == 0 {
                    ctx.progress.update(n as f64 / total as f64);
                }
            }
            if let Some(alignment) = self.build(hsp)? {
                self.output.insert(alignment);
            }
        }
        Ok(())
    }

    fn label(&self) -> &str {
        &self.label
    }
}
