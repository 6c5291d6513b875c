//! Search parameter bundle and the strategy selectors resolved once per run.

use std::fmt;
use std::str::FromStr;

use crate::error::{PlastError, Result};
use crate::post::AlignmentFilter;
use crate::sequence::Alphabet;
use crate::stats::{lookup_ungapped_params, KarlinParams};

/// Default letter groupings of the plastp subseed model, one per seed position.
pub const PLASTP_SUBSEEDS: [&str; 4] = [
    "H,FY,W,IV,LM,C,RK,Q,E,N,D,A,S,T,G,P",
    "HFYWIVLMC,RKQENDASTGP",
    "H,FYW,IVLM,C,RK,QE,ND,A,ST,G,P",
    "H,FY,W,IV,LM,C,R,K,Q,E,N,D,A,S,T,G,P",
];

/// Default chunk size handed out by the seed range iterator.
pub const DEFAULT_RANGE_CHUNK: u32 = 1000;

/// X-drop defaults, in bits, for the ungapped and the two gapped passes.
const UNGAP_XDROP_BITS: f64 = 7.0;
const XDROP_GAP_BITS: f64 = 25.0;
const XDROP_GAP_FINAL_BITS: f64 = 15.0;

/// Search program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlgoKind {
    /// Protein query against protein database.
    #[default]
    Plastp,
    /// Nucleotide query against nucleotide database.
    Plastn,
}

impl AlgoKind {
    pub fn alphabet(self) -> Alphabet {
        match self {
            AlgoKind::Plastp => Alphabet::AminoAcid,
            AlgoKind::Plastn => Alphabet::Nucleotide,
        }
    }
}

impl fmt::Display for AlgoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlgoKind::Plastp => write!(f, "plastp"),
            AlgoKind::Plastn => write!(f, "plastn"),
        }
    }
}

impl FromStr for AlgoKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "plastp" => Ok(AlgoKind::Plastp),
            "plastn" => Ok(AlgoKind::Plastn),
            _ => Err(format!("Unknown program: {}. Use 'plastp' or 'plastn'", s)),
        }
    }
}

/// Named substitution matrices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScoringMatrix {
    Blosum45,
    Blosum50,
    #[default]
    Blosum62,
    Blosum80,
    Blosum90,
    Pam30,
    Pam70,
    Pam250,
}

impl fmt::Display for ScoringMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScoringMatrix::Blosum45 => "BLOSUM45",
            ScoringMatrix::Blosum50 => "BLOSUM50",
            ScoringMatrix::Blosum62 => "BLOSUM62",
            ScoringMatrix::Blosum80 => "BLOSUM80",
            ScoringMatrix::Blosum90 => "BLOSUM90",
            ScoringMatrix::Pam30 => "PAM30",
            ScoringMatrix::Pam70 => "PAM70",
            ScoringMatrix::Pam250 => "PAM250",
        };
        f.write_str(name)
    }
}

impl FromStr for ScoringMatrix {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "BLOSUM45" => Ok(ScoringMatrix::Blosum45),
            "BLOSUM50" => Ok(ScoringMatrix::Blosum50),
            "BLOSUM62" => Ok(ScoringMatrix::Blosum62),
            "BLOSUM80" => Ok(ScoringMatrix::Blosum80),
            "BLOSUM90" => Ok(ScoringMatrix::Blosum90),
            "PAM30" => Ok(ScoringMatrix::Pam30),
            "PAM70" => Ok(ScoringMatrix::Pam70),
            "PAM250" => Ok(ScoringMatrix::Pam250),
            _ => Err(format!("Unknown scoring matrix: {}", s)),
        }
    }
}

/// Seed model selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedModelKind {
    /// Every letter of the alphabet core is its own group.
    Basic,
    /// One comma-separated grouping string per seed position.
    Subseed(Vec<String>),
}

/// Which command dispatcher runs the passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatcherKind {
    Serial,
    /// `units == 0` means one unit per available core.
    Parallel { units: usize },
}

impl Default for DispatcherKind {
    fn default() -> Self {
        DispatcherKind::Parallel { units: 0 }
    }
}

/// Strands searched by plastn. Ignored by plastp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrandSelection {
    #[default]
    Both,
    Plus,
    Minus,
}

impl StrandSelection {
    /// Strand signs in search order (`1` plus, `-1` minus).
    pub fn frames(self) -> &'static [i8] {
        match self {
            StrandSelection::Both => &[1, -1],
            StrandSelection::Plus => &[1],
            StrandSelection::Minus => &[-1],
        }
    }
}

impl FromStr for StrandSelection {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "both" => Ok(StrandSelection::Both),
            "plus" => Ok(StrandSelection::Plus),
            "minus" => Ok(StrandSelection::Minus),
            _ => Err(format!("Unknown strand: {}. Use 'both', 'plus' or 'minus'", s)),
        }
    }
}

/// Numeric knobs of one search. Zero gap costs and zero x-drops are
/// placeholders filled by [`SearchParams::resolve`].
#[derive(Debug, Clone)]
pub struct SearchParams {
    pub algo: AlgoKind,
    pub seed: SeedModelKind,
    pub seed_span: usize,
    pub ungap_neighbour_length: usize,
    pub ungap_score_threshold: i32,
    pub ungap_xdrop: i32,
    pub gap_open: i32,
    pub gap_extend: i32,
    /// Pass 1 x-drop (raw score).
    pub xdrop_gap: i32,
    /// Pass 1b x-drop (raw score).
    pub xdrop_gap_final: i32,
    pub evalue: f64,
    pub reward: i32,
    pub penalty: i32,
    pub matrix: ScoringMatrix,
    pub strands: StrandSelection,
    /// Maximum subjects reported per query, 0 for no limit.
    pub max_hits_per_query: usize,
    /// Maximum alignments reported per query/subject pair, 0 for no limit.
    pub max_hsp_per_hit: usize,
    pub dispatcher: DispatcherKind,
    pub range_chunk_size: u32,
    pub filter: AlignmentFilter,
}

impl SearchParams {
    pub fn defaults(algo: AlgoKind) -> Self {
        match algo {
            AlgoKind::Plastp => Self {
                algo,
                seed: SeedModelKind::Subseed(
                    PLASTP_SUBSEEDS.iter().map(|s| s.to_string()).collect(),
                ),
                seed_span: 4,
                ungap_neighbour_length: 22,
                ungap_score_threshold: 38,
                ungap_xdrop: 0,
                gap_open: 0,
                gap_extend: 0,
                xdrop_gap: 0,
                xdrop_gap_final: 0,
                evalue: 10.0,
                reward: 0,
                penalty: 0,
                matrix: ScoringMatrix::Blosum62,
                strands: StrandSelection::Plus,
                max_hits_per_query: 500,
                max_hsp_per_hit: 0,
                dispatcher: DispatcherKind::default(),
                range_chunk_size: DEFAULT_RANGE_CHUNK,
                filter: AlignmentFilter::default(),
            },
            AlgoKind::Plastn => Self {
                algo,
                seed: SeedModelKind::Basic,
                seed_span: 11,
                ungap_neighbour_length: 22,
                ungap_score_threshold: 25,
                ungap_xdrop: 0,
                gap_open: 0,
                gap_extend: 0,
                xdrop_gap: 0,
                xdrop_gap_final: 0,
                evalue: 10.0,
                reward: 2,
                penalty: -3,
                matrix: ScoringMatrix::Blosum62,
                strands: StrandSelection::Both,
                max_hits_per_query: 500,
                max_hsp_per_hit: 0,
                dispatcher: DispatcherKind::default(),
                range_chunk_size: DEFAULT_RANGE_CHUNK,
                filter: AlignmentFilter::default(),
            },
        }
    }

    pub fn alphabet(&self) -> Alphabet {
        self.algo.alphabet()
    }

    /// Rejects parameter bundles that cannot drive a search.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(PlastError::InvalidParameter(msg));

        if self.seed_span == 0 {
            return invalid("seed span must be at least 1".into());
        }
        if !(self.evalue > 0.0) {
            return invalid(format!("e-value must be positive, got {}", self.evalue));
        }
        if self.gap_open < 0 || self.gap_extend < 0 {
            return invalid(format!(
                "gap costs must be non-negative, got open={} extend={}",
                self.gap_open, self.gap_extend
            ));
        }
        if self.xdrop_gap < 0 || self.xdrop_gap_final < 0 || self.ungap_xdrop < 0 {
            return invalid("x-drop values must be non-negative".into());
        }
        if self.range_chunk_size == 0 {
            return invalid("range chunk size must be at least 1".into());
        }
        if let DispatcherKind::Parallel { units } = self.dispatcher {
            if units > 4096 {
                return invalid(format!("unreasonable number of execution units: {units}"));
            }
        }
        if self.algo == AlgoKind::Plastn {
            if self.reward <= 0 {
                return invalid(format!("reward must be positive, got {}", self.reward));
            }
            if self.penalty >= 0 {
                return invalid(format!("penalty must be negative, got {}", self.penalty));
            }
        }

        let alphabet = self.alphabet();
        let radices: Vec<u64> = match &self.seed {
            SeedModelKind::Basic => vec![alphabet.core_size() as u64; self.seed_span],
            SeedModelKind::Subseed(patterns) => {
                if patterns.is_empty() {
                    return invalid("subseed model needs at least one grouping string".into());
                }
                let mut radices = Vec::with_capacity(self.seed_span);
                for pos in 0..self.seed_span {
                    let pattern = &patterns[pos.min(patterns.len() - 1)];
                    let groups = pattern.split(',').collect::<Vec<_>>();
                    if groups.iter().any(|g| g.trim().is_empty()) {
                        return invalid(format!("malformed subseed grouping '{pattern}'"));
                    }
                    radices.push(groups.len() as u64);
                }
                radices
            }
        };
        let mut space: u64 = 1;
        for r in radices {
            space = match space.checked_mul(r) {
                Some(s) if s <= u32::MAX as u64 => s,
                _ => {
                    return invalid(format!(
                        "seed span {} overflows the 32-bit seed code space",
                        self.seed_span
                    ))
                }
            };
        }
        Ok(())
    }

    /// Validates, then replaces every zero placeholder by its program default.
    /// X-drops are given in bits and converted with the ungapped lambda.
    pub fn resolve(&self) -> Result<SearchParams> {
        self.validate()?;
        let mut resolved = self.clone();

        if resolved.gap_open == 0 && resolved.gap_extend == 0 {
            let (open, extend) = match resolved.algo {
                AlgoKind::Plastp => (11, 1),
                AlgoKind::Plastn => (5, 2),
            };
            resolved.gap_open = open;
            resolved.gap_extend = extend;
        }

        let ungapped = lookup_ungapped_params(&resolved)?;
        let bits_to_raw = |bits: f64, p: &KarlinParams| (bits * std::f64::consts::LN_2 / p.lambda) as i32;
        if resolved.ungap_xdrop == 0 {
            resolved.ungap_xdrop = bits_to_raw(UNGAP_XDROP_BITS, &ungapped);
        }
        if resolved.xdrop_gap == 0 {
            resolved.xdrop_gap = bits_to_raw(XDROP_GAP_BITS, &ungapped);
        }
        if resolved.xdrop_gap_final == 0 {
            resolved.xdrop_gap_final = bits_to_raw(XDROP_GAP_FINAL_BITS, &ungapped);
        }
        if resolved.algo == AlgoKind::Plastp {
            resolved.strands = StrandSelection::Plus;
        }
        Ok(resolved)
    }
}
