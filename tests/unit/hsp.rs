//! Pass 0 invariants over small synthetic databases.

use std::sync::atomic::AtomicBool;

use plast::algorithm::{NoProgress, PassProgress};
use plast::config::{AlgoKind, SearchParams};
use plast::dispatch::{Dispatcher, RangeIterator};
use plast::hsp::{DiagonalList, HspContainer, HspGeneratorCmd, SeedSearch};
use plast::seed::{SeedModel, SequenceIndex};
use plast::sequence::SequenceDatabase;
use plast::utils::ScoreMatrix;

use super::helpers::{protein_db, random_sequence};

const THRESHOLD: i32 = 30;

fn databases() -> (SequenceDatabase, SequenceDatabase) {
    let pool = b"ARNDCQEGHILKMFPSTWYV";
    let blocks: Vec<String> = (0..4).map(|i| random_sequence(100 + i, 18, pool)).collect();
    let query = protein_db([
        ("q0", format!("{}{}{}", random_sequence(1, 30, pool), blocks[0], blocks[1])),
        ("q1", format!("{}{}{}", blocks[2], random_sequence(2, 40, pool), blocks[3])),
        ("q2", random_sequence(3, 60, pool)),
    ]);
    let subject = protein_db([
        ("s0", format!("{}{}{}", blocks[1], random_sequence(4, 25, pool), blocks[2])),
        ("s1", format!("{}{}{}", random_sequence(5, 12, pool), blocks[0], blocks[3])),
        ("s2", format!("{}{}", blocks[0], random_sequence(6, 50, pool))),
    ]);
    (query, subject)
}

/// Runs Pass 0 with `units` workers and returns the merged container.
fn seed_pass(query: &SequenceDatabase, subject: &SequenceDatabase, units: usize, chunk: u64) -> HspContainer {
    let params = SearchParams::defaults(AlgoKind::Plastp).resolve().unwrap();
    let model = SeedModel::from_params(&params).unwrap();
    let query_index = SequenceIndex::build(query, &model);
    let subject_index = SequenceIndex::build(subject, &model);
    let matrix = ScoreMatrix::blosum62();
    let codes = RangeIterator::new(0, model.code_count() as u64, chunk);
    let diagonals = DiagonalList::new(query.len(), query.size() + subject.size());
    let running = AtomicBool::new(true);
    let progress = PassProgress::new(&NoProgress, 0, 4, "pass 0");
    let search = SeedSearch {
        query_db: query,
        subject_db: subject,
        query_index: &query_index,
        subject_index: &subject_index,
        matrix: &matrix,
        span: model.span(),
        neighbour_length: params.ungap_neighbour_length,
        score_threshold: THRESHOLD,
        xdrop: params.ungap_xdrop,
        codes: &codes,
        diagonals: &diagonals,
        running: &running,
        progress: &progress,
    };

    let dispatcher = if units == 1 {
        Dispatcher::serial()
    } else {
        Dispatcher::parallel(units).unwrap()
    };
    let cmds: Vec<HspGeneratorCmd> = (0..dispatcher.units())
        .map(|unit| HspGeneratorCmd::new(&search, unit))
        .collect();
    let done = dispatcher.dispatch(cmds).unwrap();
    HspContainer::merge(done.completed.into_iter().map(|c| c.output))
}

#[test]
fn test_scores_meet_threshold() {
    let (query, subject) = databases();
    let hsps = seed_pass(&query, &subject, 1, 1000);
    assert!(hsps.len() >= 4, "planted blocks missing: {}", hsps.len());
    assert!(hsps.iter().all(|h| h.score >= THRESHOLD));
}

#[test]
fn test_no_overlap_on_a_diagonal() {
    let (query, subject) = databases();
    let hsps = seed_pass(&query, &subject, 4, 50);
    let list: Vec<_> = hsps.iter().copied().collect();
    for (i, a) in list.iter().enumerate() {
        for b in &list[i + 1..] {
            let same_diagonal = a.q_idx == b.q_idx
                && a.s_idx == b.s_idx
                && a.q_start as i64 - a.s_start as i64 == b.q_start as i64 - b.s_start as i64;
            if same_diagonal {
                assert!(
                    a.q_stop < b.q_start || b.q_stop < a.q_start,
                    "overlap between {a:?} and {b:?}"
                );
            }
        }
    }
}

#[test]
fn test_worker_count_does_not_change_hsps() {
    let (query, subject) = databases();
    let single = seed_pass(&query, &subject, 1, 1000);
    for (units, chunk) in [(2, 100), (4, 13), (8, 1000)] {
        let merged = seed_pass(&query, &subject, units, chunk);
        assert_eq!(merged.len(), single.len(), "{units} units, chunk {chunk}");
    }
}
