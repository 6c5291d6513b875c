//! Statistics as seen by a search: e-values, bit scores and cutoffs.

use plast::config::{AlgoKind, SearchParams};
use plast::stats::{GlobalStatistics, QueryInfo};

use super::helpers::{nucleotide_db, protein_db, random_sequence};

fn protein_statistics() -> GlobalStatistics {
    let params = SearchParams::defaults(AlgoKind::Plastp).resolve().unwrap();
    let subject = protein_db([
        ("s1", random_sequence(1, 300, b"ARNDCQEGHILKMFPSTWYV")),
        ("s2", random_sequence(2, 500, b"ARNDCQEGHILKMFPSTWYV")),
    ]);
    GlobalStatistics::new(&params, &subject).unwrap()
}

#[test]
fn test_evalue_strictly_decreases_with_score() {
    let global = protein_statistics();
    let space = 1.0e5;
    let mut previous = f64::INFINITY;
    for score in 1..200 {
        let e = global.evalue(score, space);
        assert!(e < previous, "score {score}");
        previous = e;
    }
}

#[test]
fn test_bit_score_formula() {
    let global = protein_statistics();
    let lambda = global.gapped.lambda;
    let k = global.gapped.k;
    for score in [0, 25, 100] {
        let expected = (lambda * score as f64 - k.ln()) / std::f64::consts::LN_2;
        assert!((global.bit_score(score) - expected).abs() < 1e-9);
    }
    assert_eq!(global.subject_count, 2);
    assert_eq!(global.subject_size, 800);
}

#[test]
fn test_cutoff_matches_evalue_threshold() {
    let global = protein_statistics();
    let query = protein_db([
        ("short", random_sequence(3, 30, b"ARNDCQEGHILKMFPSTWYV")),
        ("long", random_sequence(4, 600, b"ARNDCQEGHILKMFPSTWYV")),
    ]);
    let info = QueryInfo::new(&query, &global, 1e-3);
    assert_eq!(info.len(), 2);
    for q in 0..2 {
        let stats = info.get(q).unwrap();
        assert!(stats.cutoff >= 1);
        assert!(global.evalue(stats.cutoff, stats.effective_space) <= 1e-3 * (1.0 + 1e-9));
        if stats.cutoff > 1 {
            assert!(global.evalue(stats.cutoff - 1, stats.effective_space) > 1e-3);
        }
    }
    // longer queries face a larger search space
    assert!(info.get(1).unwrap().effective_space > info.get(0).unwrap().effective_space);
    assert!(info.get(2).is_none());
}

#[test]
fn test_nucleotide_statistics() {
    let params = SearchParams::defaults(AlgoKind::Plastn).resolve().unwrap();
    let subject = nucleotide_db([("s", random_sequence(9, 1000, b"ACGT"))]);
    let global = GlobalStatistics::new(&params, &subject).unwrap();
    assert!(global.gapped.lambda > 0.0);
    assert!(global.bit_score(40) > global.bit_score(20));
}
