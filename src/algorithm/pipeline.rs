//! Multi-pass controller: seed/ungapped (Pass 0), loose gapped extension
//! (Pass 1), strict gapped extension (Pass 1b), alignment scoring (Pass 2),
//! then filtering. Every pass is a barrier: its commands are all joined and
//! their containers merged before the next pass starts. A failed command
//! only loses its own share of the pass.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use super::progress::{PassProgress, ProgressReporter};
use crate::align::{AlignmentContainer, AlignmentContext, AlignmentGeneratorCmd, GapCosts};
use crate::config::SearchParams;
use crate::dispatch::{Command, Dispatcher, RangeIterator};
use crate::error::{PlastError, Result};
use crate::hsp::{
    DiagonalList, ExtensionContext, HspContainer, HspExtensionCmd, HspGeneratorCmd, SeedSearch,
};
use crate::seed::{SeedModel, SequenceIndex};
use crate::sequence::{Alphabet, SequenceDatabase};
use crate::stats::{GlobalStatistics, QueryInfo};
use crate::utils::ScoreMatrix;

/// Passes run for each searched strand.
pub const PASSES_PER_STRAND: u64 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    Seed,
    Extension,
    FinalExtension,
    Alignment,
}

impl Pass {
    fn ordinal(self) -> u64 {
        match self {
            Pass::Seed => 0,
            Pass::Extension => 1,
            Pass::FinalExtension => 2,
            Pass::Alignment => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Pass::Seed => "pass 0",
            Pass::Extension => "pass 1",
            Pass::FinalExtension => "pass 1b",
            Pass::Alignment => "pass 2",
        }
    }
}

/// Record counts and timing of one pass over one strand.
#[derive(Debug, Clone)]
pub struct PassStats {
    pub pass: Pass,
    pub frame: i8,
    pub input: usize,
    pub output: usize,
    /// Records dropped for capacity or integrity reasons, not by score.
    pub skipped: u64,
    /// Commands that failed; whatever they held is missing from `output`.
    pub failed: usize,
    pub elapsed: Duration,
}

#[derive(Debug)]
pub struct SearchOutcome<'db> {
    pub alignments: AlignmentContainer<'db>,
    pub passes: Vec<PassStats>,
    /// Alignments removed by the final filter.
    pub filtered: usize,
}

/// One configured search of a query database against a subject database.
pub struct PlastSearch<'db> {
    params: SearchParams,
    query_db: &'db SequenceDatabase,
    subject_db: &'db SequenceDatabase,
    minus_query: Option<SequenceDatabase>,
    matrix: ScoreMatrix,
    model: SeedModel,
    global: GlobalStatistics,
    dispatcher: Dispatcher,
    running: AtomicBool,
}

impl<'db> PlastSearch<'db> {
    /// Resolves the parameters and prepares every run-wide structure.
    /// Fails before any pass starts on bad parameters or empty inputs.
    pub fn new(
        params: &SearchParams,
        query_db: &'db SequenceDatabase,
        subject_db: &'db SequenceDatabase,
        dispatcher: Dispatcher,
    ) -> Result<Self> {
        let params = params.resolve()?;
        if query_db.is_empty() {
            return Err(PlastError::EmptyDatabase("query"));
        }
        if subject_db.is_empty() {
            return Err(PlastError::EmptyDatabase("subject"));
        }
        let alphabet = params.alphabet();
        if query_db.alphabet() != alphabet || subject_db.alphabet() != alphabet {
            return Err(PlastError::InvalidParameter(format!(
                "{} expects {:?} databases",
                params.algo, alphabet
            )));
        }

        let minus_query = (alphabet == Alphabet::Nucleotide
            && params.strands.frames().contains(&-1))
        .then(|| query_db.reverse_complement());

        Ok(Self {
            matrix: ScoreMatrix::from_params(&params)?,
            model: SeedModel::from_params(&params)?,
            global: GlobalStatistics::new(&params, subject_db)?,
            params,
            query_db,
            subject_db,
            minus_query,
            dispatcher,
            running: AtomicBool::new(true),
        })
    }

    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    pub fn global_statistics(&self) -> &GlobalStatistics {
        &self.global
    }

    /// Asks every running command to stop at its next check point.
    pub fn cancel(&self) {
        self.running.store(false, Ordering::Relaxed);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    fn check_running(&self) -> Result<()> {
        if self.is_running() {
            Ok(())
        } else {
            Err(PlastError::Cancelled)
        }
    }

    fn gaps(&self) -> GapCosts {
        GapCosts {
            open: self.params.gap_open,
            extend: self.params.gap_extend,
        }
    }

    /// Runs every pass on every selected strand, merges the strands and
    /// applies the final filter.
    pub fn run(&self, reporter: &dyn ProgressReporter) -> Result<SearchOutcome<'_>> {
        let frames = self.params.strands.frames();
        let nb_passes = PASSES_PER_STRAND * frames.len() as u64;
        let mut passes = Vec::with_capacity(nb_passes as usize);

        let started = Instant::now();
        let subject_index = SequenceIndex::build(self.subject_db, &self.model);
        log::debug!(
            "Indexed {} subject seeds in {:.2?}",
            subject_index.len(),
            started.elapsed()
        );

        let mut per_strand = Vec::with_capacity(frames.len());
        for (strand_no, &frame) in frames.iter().enumerate() {
            let query_db = match (frame, &self.minus_query) {
                (f, Some(minus)) if f < 0 => minus,
                _ => self.query_db,
            };
            let strand = StrandRun {
                search: self,
                query_db,
                frame,
                first_pass: strand_no as u64 * PASSES_PER_STRAND,
                nb_passes,
                reporter,
            };
            per_strand.push(strand.run(&subject_index, &mut passes)?);
        }
        reporter.finish();

        let alignments = AlignmentContainer::merge(per_strand);
        let mut filter = self.params.filter.clone();
        filter.max_evalue.get_or_insert(self.params.evalue);
        let filtered = alignments.filter(&filter);

        for p in &passes {
            log::debug!(
                "{} (frame {}): {} -> {} records, {} skipped, {} failed command(s), {:.2?}",
                p.pass.name(),
                p.frame,
                p.input,
                p.output,
                p.skipped,
                p.failed,
                p.elapsed
            );
        }
        log::info!(
            "{} alignment(s) reported, {} filtered out, {:.2?} total",
            alignments.len(),
            filtered,
            started.elapsed()
        );

        Ok(SearchOutcome {
            alignments,
            passes,
            filtered,
        })
    }
}

/// The four passes over one strand.
struct StrandRun<'s, 'r, 'db> {
    search: &'s PlastSearch<'db>,
    query_db: &'s SequenceDatabase,
    frame: i8,
    first_pass: u64,
    nb_passes: u64,
    reporter: &'r dyn ProgressReporter,
}

impl<'s, 'r> StrandRun<'s, 'r, '_> {
    fn progress(&self, pass: Pass) -> PassProgress<'r> {
        PassProgress::new(
            self.reporter,
            self.first_pass + pass.ordinal(),
            self.nb_passes,
            pass.name(),
        )
    }

    /// Runs the commands of one pass and returns the ones that completed,
    /// with the number that failed.
    fn dispatch<C: Command>(&self, pass: Pass, cmds: Vec<C>) -> Result<(Vec<C>, usize)> {
        let issued = cmds.len();
        let done = self.search.dispatcher.dispatch(cmds)?;
        let failed = done.failures.len();
        if failed > 0 {
            log::warn!(
                "{} (frame {}): {} of {} command(s) failed, keeping the others' results",
                pass.name(),
                self.frame,
                failed,
                issued
            );
        }
        Ok((done.completed, failed))
    }

    fn run(
        &self,
        subject_index: &SequenceIndex,
        passes: &mut Vec<PassStats>,
    ) -> Result<AlignmentContainer<'s>> {
        let search = self.search;
        let query_info = QueryInfo::new(self.query_db, &search.global, search.params.evalue);

        let hsps = self.seed_pass(subject_index, passes)?;
        let hsps = self.extension_pass(
            Pass::Extension,
            &hsps,
            search.params.xdrop_gap,
            &query_info,
            passes,
        )?;
        let mut hsps = self.extension_pass(
            Pass::FinalExtension,
            &hsps,
            search.params.xdrop_gap_final,
            &query_info,
            passes,
        )?;
        hsps.remove_contained();

        self.alignment_pass(&hsps, &query_info, passes)
    }

    fn seed_pass(
        &self,
        subject_index: &SequenceIndex,
        passes: &mut Vec<PassStats>,
    ) -> Result<HspContainer> {
        let search = self.search;
        search.check_running()?;
        let started = Instant::now();

        let query_index = SequenceIndex::build(self.query_db, &search.model);
        let codes = RangeIterator::new(
            0,
            search.model.code_count() as u64,
            search.params.range_chunk_size as u64,
        );
        let diagonals = DiagonalList::new(
            self.query_db.len(),
            self.query_db.size() + search.subject_db.size(),
        );
        let progress = self.progress(Pass::Seed);
        let seeds = SeedSearch {
            query_db: self.query_db,
            subject_db: search.subject_db,
            query_index: &query_index,
            subject_index,
            matrix: &search.matrix,
            span: search.model.span(),
            neighbour_length: search.params.ungap_neighbour_length,
            score_threshold: search.params.ungap_score_threshold,
            xdrop: search.params.ungap_xdrop,
            codes: &codes,
            diagonals: &diagonals,
            running: &search.running,
            progress: &progress,
        };

        let cmds: Vec<HspGeneratorCmd> = (0..search.dispatcher.units())
            .map(|unit| HspGeneratorCmd::new(&seeds, unit))
            .collect();
        let (cmds, failed) = self.dispatch(Pass::Seed, cmds)?;
        progress.complete();

        let covered: u64 = cmds.iter().map(|c| c.covered).sum();
        let hsps = HspContainer::merge(cmds.into_iter().map(|c| c.output));
        log::debug!("{} seed pairs skipped on covered diagonals", covered);
        passes.push(PassStats {
            pass: Pass::Seed,
            frame: self.frame,
            input: query_index.len(),
            output: hsps.len(),
            skipped: 0,
            failed,
            elapsed: started.elapsed(),
        });
        Ok(hsps)
    }

    fn extension_pass(
        &self,
        pass: Pass,
        source: &HspContainer,
        xdrop: i32,
        query_info: &QueryInfo,
        passes: &mut Vec<PassStats>,
    ) -> Result<HspContainer> {
        let search = self.search;
        search.check_running()?;
        let started = Instant::now();

        let progress = self.progress(pass);
        let workers = search.dispatcher.units();
        let ctx = ExtensionContext {
            query_db: self.query_db,
            subject_db: search.subject_db,
            matrix: &search.matrix,
            gaps: search.gaps(),
            xdrop,
            query_info,
            source,
            workers,
            running: &search.running,
            progress: &progress,
        };
        let label = pass.name().replace(' ', "-");
        let cmds: Vec<HspExtensionCmd> = (0..workers)
            .map(|unit| HspExtensionCmd::new(&ctx, unit, &label))
            .collect();
        let (cmds, failed) = self.dispatch(pass, cmds)?;
        progress.complete();

        let skipped = cmds.iter().map(|c| c.skipped).sum();
        let hsps = HspContainer::merge(cmds.into_iter().map(|c| c.output));
        passes.push(PassStats {
            pass,
            frame: self.frame,
            input: source.len(),
            output: hsps.len(),
            skipped,
            failed,
            elapsed: started.elapsed(),
        });
        Ok(hsps)
    }

    fn alignment_pass(
        &self,
        source: &HspContainer,
        query_info: &QueryInfo,
        passes: &mut Vec<PassStats>,
    ) -> Result<AlignmentContainer<'s>> {
        let search = self.search;
        search.check_running()?;
        let started = Instant::now();

        let progress = self.progress(Pass::Alignment);
        let workers = search.dispatcher.units();
        let ctx = AlignmentContext {
            query_db: self.query_db,
            subject_db: search.subject_db,
            matrix: &search.matrix,
            gaps: search.gaps(),
            global: &search.global,
            query_info,
            source,
            workers,
            query_frame: self.frame,
            running: &search.running,
            progress: &progress,
        };
        let cmds = (0..workers)
            .map(|unit| AlignmentGeneratorCmd::new(&ctx, unit))
            .collect::<Result<Vec<_>>>()?;
        let (cmds, failed) = self.dispatch(Pass::Alignment, cmds)?;
        progress.complete();

        let skipped: u64 = cmds.iter().map(|c| c.skipped).sum();
        if skipped > 0 {
            log::warn!("{} HSP(s) could not be turned into alignments", skipped);
        }
        let alignments = AlignmentContainer::merge(cmds.into_iter().map(|c| c.output));
        passes.push(PassStats {
            pass: Pass::Alignment,
            frame: self.frame,
            input: source.len(),
            output: alignments.len(),
            skipped,
            failed,
            elapsed: started.elapsed(),
        });
        Ok(alignments)
    }
}
