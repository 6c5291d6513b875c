//! Alignment splitter properties.

use plast::align::{AlignmentSplitter, GapCosts, MAX_ALIGN_SIZE};
use plast::common::Range;
use plast::sequence::Alphabet;
use plast::utils::ScoreMatrix;

use super::helpers::random_sequence;

fn full(len: usize) -> Range {
    Range::new(0, len as u32 - 1)
}

#[test]
fn test_identical_sequences_align_without_gaps() {
    let matrix = ScoreMatrix::blosum62();
    let mut splitter = AlignmentSplitter::new(&matrix, GapCosts { open: 11, extend: 1 }).unwrap();
    for (seed, len) in [(1, 1), (2, 7), (3, 64), (4, 333), (5, 1500)] {
        let seq = Alphabet::AminoAcid
            .encode_all(random_sequence(seed, len, b"ARNDCQEGHILKMFPSTWYV").as_bytes());
        let out = splitter.split(&seq, &seq, full(len), full(len)).unwrap();
        assert_eq!(out.align_size as usize, len);
        assert_eq!(out.identity as usize, len);
        assert_eq!(out.nb_mismatch, 0);
        assert_eq!((out.nb_gap_query, out.nb_gap_subject), (0, 0));
        assert_eq!(out.segments().count(), 1);
    }
}

#[test]
fn test_split_is_deterministic_across_reuse() {
    let matrix = ScoreMatrix::nucleotide(2, -3);
    let gaps = GapCosts { open: 5, extend: 2 };
    let q = Alphabet::Nucleotide.encode_all(random_sequence(7, 400, b"ACGT").as_bytes());
    let mut s = q.clone();
    s.drain(150..160);

    let mut splitter = AlignmentSplitter::new(&matrix, gaps).unwrap();
    let first = splitter.split(&s, &q, full(s.len()), full(q.len())).unwrap();
    // unrelated call in between
    splitter.split(&q, &q, Range::new(10, 60), Range::new(12, 70)).unwrap();
    let second = splitter.split(&s, &q, full(s.len()), full(q.len())).unwrap();
    assert_eq!(first, second);
    assert!(first.nb_gap_subject >= 1);

    let mut fresh = AlignmentSplitter::new(&matrix, gaps).unwrap();
    assert_eq!(fresh.split(&s, &q, full(s.len()), full(q.len())).unwrap(), first);
}

#[test]
fn test_capacity_boundary() {
    let matrix = ScoreMatrix::nucleotide(1, -2);
    let gaps = GapCosts { open: 5, extend: 2 };
    let mut splitter = AlignmentSplitter::new(&matrix, gaps).unwrap();
    let seq = Alphabet::Nucleotide.encode_all(random_sequence(8, MAX_ALIGN_SIZE + 10, b"ACGT").as_bytes());

    let too_large = splitter
        .split(&seq, &seq, full(MAX_ALIGN_SIZE), full(MAX_ALIGN_SIZE))
        .unwrap();
    assert!(too_large.is_empty());
    assert!(too_large.breakpoints.is_empty());

    let fits = MAX_ALIGN_SIZE - 1;
    let out = splitter.split(&seq, &seq, full(fits), full(fits)).unwrap();
    assert_eq!(out.align_size as usize, fits);
    assert_eq!(out.identity as usize, fits);
}
