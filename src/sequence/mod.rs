//! Sequence encodings and in-memory sequence databases.

pub mod database;
pub mod encoding;

pub use database::{Sequence, SequenceDatabase};
pub use encoding::*;
