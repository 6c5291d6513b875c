//! Error types shared by every stage of the search pipeline.
//!
//! Library code returns [`Result`]; the binary and the FASTA loaders wrap
//! these in `anyhow` with context.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlastError {
    /// Bad parameter bundle, detected before any pass starts.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("unsupported scoring matrix: {0}")]
    UnsupportedMatrix(String),

    #[error("no statistical parameters for reward={reward} penalty={penalty} gap_open={gap_open} gap_extend={gap_extend}")]
    UnsupportedScoring {
        reward: i32,
        penalty: i32,
        gap_open: i32,
        gap_extend: i32,
    },

    #[error("{0} database holds no sequence")]
    EmptyDatabase(&'static str),

    /// Scratch memory for a dynamic programming kernel could not be reserved.
    #[error("allocation failure: {0}")]
    Allocation(String),

    /// One command of a dispatch failed; siblings still ran to completion
    /// and their output is kept.
    #[error("command '{label}' (unit {unit}) failed: {message}")]
    CommandFailed {
        unit: usize,
        label: String,
        message: String,
    },

    /// Every failure of a dispatch in which no command completed.
    #[error("{} command(s) failed during dispatch: {}", .0.len(), join_messages(.0))]
    Dispatch(Vec<PlastError>),

    #[error("cannot start worker pool: {0}")]
    WorkerPool(String),

    #[error("search cancelled")]
    Cancelled,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn join_messages(errors: &[PlastError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, PlastError>;
