//! Test utilities shared by the unit suite:
//! - deterministic sequence generators
//! - database and search fixtures
//! - owned summaries of alignments for set comparisons

use plast::algorithm::{NoProgress, PlastSearch};
use plast::config::SearchParams;
use plast::dispatch::Dispatcher;
use plast::sequence::{Alphabet, SequenceDatabase};

/// Query-side filler residues. No BLOSUM62 score between a residue of this
/// pool and one of [`SUBJECT_POOL`] is positive.
pub const QUERY_POOL: &[u8] = b"DEKR";
pub const SUBJECT_POOL: &[u8] = b"WCFY";

/// Linear congruential generator; enough to build reproducible noise.
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Lcg(seed.wrapping_mul(6364136223846793005).wrapping_add(1))
    }

    pub fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }
}

pub fn random_sequence(seed: u64, len: usize, pool: &[u8]) -> String {
    let mut rng = Lcg::new(seed);
    (0..len)
        .map(|_| pool[(rng.next() % pool.len() as u64) as usize] as char)
        .collect()
}

pub fn reverse_complement(seq: &str) -> String {
    seq.bytes()
        .rev()
        .map(|b| match b {
            b'A' => 'T',
            b'C' => 'G',
            b'G' => 'C',
            b'T' => 'A',
            _ => 'N',
        })
        .collect()
}

pub fn protein_db<'a>(records: impl IntoIterator<Item = (&'a str, String)>) -> SequenceDatabase {
    SequenceDatabase::from_records(Alphabet::AminoAcid, records)
}

pub fn nucleotide_db<'a>(records: impl IntoIterator<Item = (&'a str, String)>) -> SequenceDatabase {
    SequenceDatabase::from_records(Alphabet::Nucleotide, records)
}

/// Owned view of one alignment, comparable across runs.
#[derive(Debug, Clone, PartialEq, PartialOrd)]
pub struct Summary {
    pub query: String,
    pub subject: String,
    pub query_display: (u32, u32),
    pub subject_display: (u32, u32),
    pub query_frame: i8,
    pub score: i32,
    pub length: u32,
    pub identity: f64,
    pub mismatches: u32,
    pub gap_openings: u32,
    pub evalue: f64,
}

/// Runs a full search and returns the reported alignments in traversal
/// order.
pub fn run_search(
    params: &SearchParams,
    query: &SequenceDatabase,
    subject: &SequenceDatabase,
    dispatcher: Dispatcher,
) -> Vec<Summary> {
    let search = PlastSearch::new(params, query, subject, dispatcher).expect("search setup");
    let outcome = search.run(&NoProgress).expect("search run");
    outcome
        .alignments
        .sorted()
        .iter()
        .map(|a| Summary {
            query: a.query.id().to_string(),
            subject: a.subject.id().to_string(),
            query_display: a.query_display_range(),
            subject_display: a.subject_display_range(),
            query_frame: a.query_frame,
            score: a.score,
            length: a.length,
            identity: a.identity_percent(),
            mismatches: a.mismatches,
            gap_openings: a.gap_openings(),
            evalue: a.evalue,
        })
        .collect()
}

/// Sorts summaries so runs can be compared as sets.
pub fn as_set(mut summaries: Vec<Summary>) -> Vec<Summary> {
    summaries.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    summaries
}
