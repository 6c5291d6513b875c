use clap::Args;
use std::path::PathBuf;

use crate::config::{AlgoKind, DispatcherKind, SearchParams, StrandSelection};
use crate::post::AlignmentFilter;

/// Options shared by `plastp` and `plastn`. Numeric options left at 0 keep
/// the program default.
#[derive(Args, Debug, Clone)]
pub struct PlastArgs {
    /// Subject database (FASTA)
    #[arg(short = 'd', long)]
    pub subject: PathBuf,
    /// Query database (FASTA)
    #[arg(short = 'i', long)]
    pub query: PathBuf,
    /// Output file, standard output when absent
    #[arg(short, long)]
    pub out: Option<PathBuf>,
    #[arg(short, long, default_value_t = 10.0)]
    pub evalue: f64,
    /// Worker threads (0 = one per core)
    #[arg(short = 'a', long, default_value_t = 0)]
    pub num_threads: usize,
    /// Run every pass on the calling thread
    #[arg(long, default_value_t = false)]
    pub serial: bool,
    #[arg(long, default_value_t = 0)]
    pub seed_span: usize,
    /// Minimum ungapped score for a seed hit to become an HSP
    #[arg(long, default_value_t = 0)]
    pub ungap_threshold: i32,
    #[arg(short = 'G', long, default_value_t = 0)]
    pub gap_open: i32,
    #[arg(short = 'E', long, default_value_t = 0)]
    pub gap_extend: i32,
    /// Pass 1 x-drop (raw score)
    #[arg(long, default_value_t = 0)]
    pub xdrop_gap: i32,
    /// Pass 1b x-drop (raw score)
    #[arg(long, default_value_t = 0)]
    pub xdrop_gap_final: i32,
    /// Match reward (plastn)
    #[arg(short = 'r', long, default_value_t = 0)]
    pub reward: i32,
    /// Mismatch penalty (plastn)
    #[arg(short = 'q', long, default_value_t = 0, allow_hyphen_values = true)]
    pub penalty: i32,
    #[arg(long, default_value = "BLOSUM62")]
    pub matrix: String,
    /// Maximum subjects reported per query (0 = unlimited)
    #[arg(long, default_value_t = 500)]
    pub max_hit_per_query: usize,
    /// Maximum alignments reported per query/subject pair (0 = unlimited)
    #[arg(long, default_value_t = 0)]
    pub max_hsp_per_hit: usize,
    /// Strands searched by plastn: both, plus or minus
    #[arg(long, default_value = "both")]
    pub strand: String,
    #[arg(long)]
    pub min_identity: Option<f64>,
    #[arg(long)]
    pub min_length: Option<u32>,
    #[arg(long)]
    pub min_bit_score: Option<f64>,
    /// Append lengths, frames, per-side gap openings and positives
    #[arg(long, default_value_t = false)]
    pub extended: bool,
    /// Show a progress bar on standard error
    #[arg(long, default_value_t = false)]
    pub progress: bool,
}

impl PlastArgs {
    /// Overlays the command line on the program defaults. Unset values stay
    /// as placeholders for [`SearchParams::resolve`].
    pub fn to_params(&self, algo: AlgoKind) -> anyhow::Result<SearchParams> {
        let mut params = SearchParams::defaults(algo);
        params.evalue = self.evalue;
        if self.seed_span > 0 {
            params.seed_span = self.seed_span;
        }
        if self.ungap_threshold > 0 {
            params.ungap_score_threshold = self.ungap_threshold;
        }
        params.gap_open = self.gap_open;
        params.gap_extend = self.gap_extend;
        params.xdrop_gap = self.xdrop_gap;
        params.xdrop_gap_final = self.xdrop_gap_final;
        if self.reward != 0 {
            params.reward = self.reward;
        }
        if self.penalty != 0 {
            params.penalty = self.penalty;
        }
        params.matrix = self.matrix.parse().map_err(anyhow::Error::msg)?;
        if algo == AlgoKind::Plastn {
            params.strands = self
                .strand
                .parse::<StrandSelection>()
                .map_err(anyhow::Error::msg)?;
        }
        params.max_hits_per_query = self.max_hit_per_query;
        params.max_hsp_per_hit = self.max_hsp_per_hit;
        params.dispatcher = if self.serial {
            DispatcherKind::Serial
        } else {
            DispatcherKind::Parallel {
                units: self.num_threads,
            }
        };
        params.filter = AlignmentFilter {
            max_evalue: Some(self.evalue),
            min_identity: self.min_identity,
            min_length: self.min_length,
            min_bit_score: self.min_bit_score,
        };
        Ok(params)
    }
}
