pub mod args;
pub mod pipeline;
pub mod progress;

pub use args::PlastArgs;
pub use pipeline::{Pass, PassStats, PlastSearch, SearchOutcome, PASSES_PER_STRAND};
pub use progress::{IndicatifProgress, LogProgress, NoProgress, PassProgress, ProgressReporter};

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufWriter, Write};

use crate::config::AlgoKind;
use crate::dispatch::Dispatcher;
use crate::post::MaxHitsVisitor;
use crate::report::TabularWriter;
use crate::sequence::SequenceDatabase;

/// Loads both databases, runs the search and writes the tabular report.
pub fn run(algo: AlgoKind, args: PlastArgs) -> Result<()> {
    let params = args.to_params(algo)?;
    let alphabet = params.alphabet();

    let subject_db = SequenceDatabase::from_fasta(&args.subject, alphabet)
        .with_context(|| format!("Failed to load subject database {}", args.subject.display()))?;
    let query_db = SequenceDatabase::from_fasta(&args.query, alphabet)
        .with_context(|| format!("Failed to load query database {}", args.query.display()))?;
    log::info!(
        "{}: {} query sequence(s) ({} letters) against {} subject sequence(s) ({} letters)",
        algo,
        query_db.len(),
        query_db.size(),
        subject_db.len(),
        subject_db.size()
    );

    let dispatcher = Dispatcher::from_kind(params.dispatcher)?;
    log::debug!("Dispatching on {} unit(s)", dispatcher.units());
    let search = PlastSearch::new(&params, &query_db, &subject_db, dispatcher)?;

    let reporter: Box<dyn ProgressReporter> = if args.progress {
        Box::new(IndicatifProgress::new())
    } else {
        Box::new(LogProgress::default())
    };
    let outcome = search.run(reporter.as_ref())?;

    let out: Box<dyn Write> = match &args.out {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    let mut writer = TabularWriter::new(out, args.extended);
    {
        let mut limited = MaxHitsVisitor::new(
            &mut writer,
            search.params().max_hits_per_query,
            search.params().max_hsp_per_hit,
        );
        outcome
            .alignments
            .accept(&mut limited)
            .context("Failed to write alignments")?;
    }
    log::info!("Wrote {} alignment line(s)", writer.lines());
    Ok(())
}
