//! End-to-end searches through every pass.

use std::io::Write;

use plast::align::MAX_ALIGN_SIZE;
use plast::algorithm::{NoProgress, Pass, PlastSearch};
use plast::config::{AlgoKind, DispatcherKind, SearchParams, StrandSelection};
use plast::dispatch::Dispatcher;
use plast::post::{CollectVisitor, MaxHitsVisitor};
use plast::report::TabularWriter;
use plast::sequence::{Alphabet, SequenceDatabase};

use super::helpers::{
    as_set, nucleotide_db, protein_db, random_sequence, reverse_complement, run_search,
    QUERY_POOL, SUBJECT_POOL,
};

const SHARED: &str = "MAVLSTGHIPNQMAGLVTSN";

fn planted_pair() -> (SequenceDatabase, SequenceDatabase) {
    let query = protein_db([(
        "query1",
        format!(
            "{}{SHARED}{}",
            random_sequence(1, 40, QUERY_POOL),
            random_sequence(2, 40, QUERY_POOL)
        ),
    )]);
    let subject = protein_db([(
        "subject1",
        format!(
            "{}{SHARED}{}",
            random_sequence(3, 55, SUBJECT_POOL),
            random_sequence(4, 25, SUBJECT_POOL)
        ),
    )]);
    (query, subject)
}

#[test]
fn test_shared_substring_is_reported() {
    let (query, subject) = planted_pair();
    let mut params = SearchParams::defaults(AlgoKind::Plastp);
    params.seed_span = 4;

    let hits = run_search(&params, &query, &subject, Dispatcher::serial());
    let hit = hits
        .iter()
        .find(|h| h.query_display == (41, 60))
        .expect("alignment over the shared substring");
    assert_eq!(hit.query, "query1");
    assert_eq!(hit.subject, "subject1");
    assert_eq!(hit.subject_display, (56, 75));
    assert_eq!(hit.length, 20);
    assert_eq!(hit.mismatches, 0);
    assert_eq!(hit.gap_openings, 0);
    assert!((hit.identity - 100.0).abs() < 1e-9);
    assert!(hit.evalue < 1e-3, "evalue {}", hit.evalue);
}

#[test]
fn test_no_shared_seed_gives_no_alignment() {
    let query = protein_db([("q", random_sequence(5, 100, QUERY_POOL))]);
    let subject = protein_db([("s", random_sequence(6, 100, SUBJECT_POOL))]);
    let search = PlastSearch::new(
        &SearchParams::defaults(AlgoKind::Plastp),
        &query,
        &subject,
        Dispatcher::serial(),
    )
    .unwrap();
    let outcome = search.run(&NoProgress).unwrap();
    assert_eq!(outcome.passes[0].output, 0);
    assert!(outcome.alignments.is_empty());
}

fn multi_query_dbs() -> (SequenceDatabase, SequenceDatabase) {
    let cores = [
        "MAVLSTGHIPNQMAGLVTSN",
        "GHTPLNQSAVMIGTLPAHSV",
        "NQPSTHGMALIVAGSTNQPH",
        "TAGLMNSPHIVQGTAMLNSP",
    ];
    let queries: Vec<(&str, String)> = ["qa", "qb", "qc"]
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let seq = format!(
                "{}{}{}{}",
                random_sequence(10 + i as u64, 30, QUERY_POOL),
                cores[i],
                random_sequence(20 + i as u64, 25, QUERY_POOL),
                cores[(i + 1) % cores.len()],
            );
            (*name, seq)
        })
        .collect();
    let subjects: Vec<(&str, String)> = ["s1", "s2"]
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let seq = format!(
                "{}{}{}{}{}",
                random_sequence(30 + i as u64, 20, SUBJECT_POOL),
                cores[i * 2],
                random_sequence(40 + i as u64, 35, SUBJECT_POOL),
                cores[i * 2 + 1],
                random_sequence(50 + i as u64, 15, SUBJECT_POOL),
            );
            (*name, seq)
        })
        .collect();
    (protein_db(queries), protein_db(subjects))
}

#[test]
fn test_serial_and_parallel_agree() {
    let (query, subject) = multi_query_dbs();
    let params = SearchParams::defaults(AlgoKind::Plastp);

    let serial = as_set(run_search(&params, &query, &subject, Dispatcher::serial()));
    assert!(serial.len() >= 4, "expected every planted core, got {serial:?}");
    for units in [2, 3, 5] {
        let parallel = as_set(run_search(
            &params,
            &query,
            &subject,
            Dispatcher::parallel(units).unwrap(),
        ));
        assert_eq!(serial, parallel, "{units} units");
    }
}

#[test]
fn test_small_range_chunks_do_not_change_results() {
    let (query, subject) = multi_query_dbs();
    let mut params = SearchParams::defaults(AlgoKind::Plastp);
    let reference = as_set(run_search(&params, &query, &subject, Dispatcher::serial()));

    params.range_chunk_size = 7;
    params.dispatcher = DispatcherKind::Parallel { units: 4 };
    let chunked = as_set(run_search(
        &params,
        &query,
        &subject,
        Dispatcher::from_kind(params.dispatcher).unwrap(),
    ));
    assert_eq!(reference, chunked);
}

#[test]
fn test_minus_strand_hit() {
    let core = "ATGGCGTACCTGAAGTTCGACCAGTTGCAAGGTCTACGTG";
    let query = nucleotide_db([(
        "nq",
        format!("{}{}{}", "A".repeat(30), reverse_complement(core), "A".repeat(30)),
    )]);
    let subject = nucleotide_db([(
        "ns",
        format!("{}{}{}", "C".repeat(30), core, "C".repeat(30)),
    )]);

    let params = SearchParams::defaults(AlgoKind::Plastn);
    let hits = run_search(&params, &query, &subject, Dispatcher::serial());
    let minus = hits
        .iter()
        .find(|h| h.query_frame == -1 && h.length == 40)
        .expect("minus strand alignment");
    assert_eq!(minus.query_display, (70, 31));
    assert_eq!(minus.subject_display, (31, 70));
    assert!((minus.identity - 100.0).abs() < 1e-9);

    let mut plus_only = params.clone();
    plus_only.strands = StrandSelection::Plus;
    let hits = run_search(&plus_only, &query, &subject, Dispatcher::serial());
    assert!(hits.iter().all(|h| h.query_frame == 1 && h.length < 40));
}

#[test]
fn test_progress_spans_all_strands() {
    use plast::algorithm::ProgressReporter;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Track(Mutex<(u64, u64)>);
    impl ProgressReporter for Track {
        fn report(&self, current: u64, total: u64, _label: &str) {
            let mut t = self.0.lock().unwrap();
            t.0 = t.0.max(current);
            t.1 = total;
        }
    }

    let query = nucleotide_db([("nq", "ACGTTGCAAGGTCTACGTGATGGCGTACC".to_string())]);
    let subject = nucleotide_db([("ns", "GGGACGTTGCAAGGTCTACGTGATGGCGTACCGG".to_string())]);
    let search = PlastSearch::new(
        &SearchParams::defaults(AlgoKind::Plastn),
        &query,
        &subject,
        Dispatcher::serial(),
    )
    .unwrap();
    let track = Track::default();
    let outcome = search.run(&track).unwrap();
    assert_eq!(outcome.passes.len(), 8);
    assert_eq!(*track.0.lock().unwrap(), (800, 800));
}

#[test]
fn test_tabular_report_with_limits() {
    let (query, subject) = multi_query_dbs();
    let search = PlastSearch::new(
        &SearchParams::defaults(AlgoKind::Plastp),
        &query,
        &subject,
        Dispatcher::serial(),
    )
    .unwrap();
    let outcome = search.run(&NoProgress).unwrap();

    let mut writer = TabularWriter::new(Vec::new(), false);
    {
        let mut limited = MaxHitsVisitor::new(&mut writer, 1, 1);
        outcome.alignments.accept(&mut limited).unwrap();
    }
    let text = String::from_utf8(writer.into_inner()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    // one line per query at most
    assert!(!lines.is_empty() && lines.len() <= 3);
    for line in lines {
        assert_eq!(line.split('\t').count(), 12);
    }

    let mut all = CollectVisitor::default();
    outcome.alignments.accept(&mut all).unwrap();
    assert_eq!(all.alignments.len(), outcome.alignments.len());
}

#[test]
fn test_fasta_inputs() {
    let mut q = tempfile::NamedTempFile::new().unwrap();
    writeln!(q, ">query1 planted\n{}{SHARED}{}", "DEKR".repeat(10), "KRED".repeat(10)).unwrap();
    let mut s = tempfile::NamedTempFile::new().unwrap();
    writeln!(s, ">subject1\n{}{SHARED}{}", "WCFY".repeat(12), "YFCW".repeat(6)).unwrap();

    let query = SequenceDatabase::from_fasta(q.path(), Alphabet::AminoAcid).unwrap();
    let subject = SequenceDatabase::from_fasta(s.path(), Alphabet::AminoAcid).unwrap();
    let hits = run_search(
        &SearchParams::defaults(AlgoKind::Plastp),
        &query,
        &subject,
        Dispatcher::serial(),
    );
    assert!(hits
        .iter()
        .any(|h| h.query == "query1" && h.query_display == (41, 60) && h.subject_display == (49, 68)));
}

#[test]
fn test_oversized_hsp_skipped_in_alignment_pass() {
    let big = random_sequence(60, MAX_ALIGN_SIZE + 500, b"ACGT");
    let small = random_sequence(61, 200, b"ACGT");
    let query = nucleotide_db([("qbig", big.clone()), ("qsmall", small.clone())]);
    let subject = nucleotide_db([("sbig", big), ("ssmall", small)]);

    let mut params = SearchParams::defaults(AlgoKind::Plastn);
    params.strands = StrandSelection::Plus;
    let search = PlastSearch::new(&params, &query, &subject, Dispatcher::serial()).unwrap();
    let outcome = search.run(&NoProgress).unwrap();

    let pass2 = outcome
        .passes
        .iter()
        .find(|p| p.pass == Pass::Alignment)
        .unwrap();
    assert!(pass2.skipped >= 1, "{pass2:?}");
    assert_eq!(pass2.failed, 0);

    let alignments = outcome.alignments.sorted();
    assert!(alignments.iter().all(|a| (a.length as usize) < MAX_ALIGN_SIZE));
    let kept = alignments
        .iter()
        .find(|a| a.query.id() == "qsmall" && a.subject.id() == "ssmall")
        .expect("small block still aligned");
    assert_eq!(kept.length, 200);
    assert_eq!(kept.identities, 200);
}
