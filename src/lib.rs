pub mod algorithm;
pub mod common;
pub mod error;
pub mod sequence;
pub mod utils;

pub mod align;
pub mod config;
pub mod dispatch;
pub mod hsp;
pub mod post;
pub mod report;
pub mod seed;
pub mod stats;

pub use error::{PlastError, Result};
