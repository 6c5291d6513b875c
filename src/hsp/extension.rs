//! Pass 1 and Pass 1b: gapped re-extension of HSPs under an x-drop.

use std::sync::atomic::{AtomicBool, Ordering};

use super::container::HspContainer;
use super::Hsp;
use crate::algorithm::progress::PassProgress;
use crate::align::semi_gapped::{extend_gapped, ExtensionScratch, GapCosts};
use crate::dispatch::Command;
use crate::error::{PlastError, Result};
use crate::sequence::SequenceDatabase;
use crate::stats::QueryInfo;
use crate::utils::ScoreMatrix;

/// Shared read-only inputs of one extension pass.
pub struct ExtensionContext<'a> {
    pub query_db: &'a SequenceDatabase,
    pub subject_db: &'a SequenceDatabase,
    pub matrix: &'a ScoreMatrix,
    pub gaps: GapCosts,
    pub xdrop: i32,
    pub query_info: &'a QueryInfo,
    pub source: &'a HspContainer,
    pub workers: usize,
    pub running: &'a AtomicBool,
    pub progress: &'a PassProgress<'a>,
}

/// One worker of an extension pass; handles the source stripe of `unit`.
pub struct HspExtensionCmd<'a> {
    ctx: &'a ExtensionContext<'a>,
    unit: usize,
    label: String,
    scratch: ExtensionScratch,
    pub output: HspContainer,
    /// HSPs dropped because a sequence could not be resolved.
    pub skipped: u64,
}

impl<'a> HspExtensionCmd<'a> {
    pub fn new(ctx: &'a ExtensionContext<'a>, unit: usize, label: &str) -> Self {
        Self {
            ctx,
            unit,
            label: format!("{label}-{unit}"),
            scratch: ExtensionScratch::new(),
            output: HspContainer::new(),
            skipped: 0,
        }
    }

    fn extend(&mut self, hsp: &Hsp) -> Result<Option<Hsp>> {
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

        let ext = extend_gapped(
            query.letters,
            subject.letters,
            query.relative(hsp.anchor_q) as usize,
            subject.relative(hsp.anchor_s) as usize,
            ctx.matrix,
            ctx.gaps,
            ctx.xdrop,
            &mut self.scratch,
        )?;

        let cutoff = ctx
            .query_info
            .get(hsp.q_idx)
            .map_or(i32::MAX, |q| q.cutoff);
        if ext.score < cutoff {
            return Ok(None);
        }

        Ok(Some(Hsp {
            q_start: query.offset + ext.q_start as u32,
            q_stop: query.offset + ext.q_end as u32,
            s_start: subject.offset + ext.s_start as u32,
            s_stop: subject.offset + ext.s_end as u32,
            score: ext.score,
            ..*hsp
        }))
    }
}

impl Command for HspExtensionCmd<'_> {
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
            if let Some(refined) = self.extend(hsp)? {
                self.output.push(refined);
            }
        }
        Ok(())
    }

    fn label(&self) -> &str {
        &self.label
    }
}
