//! Seed models and the per-database seed index.

pub mod index;
pub mod model;

pub use index::{SeedOccurrence, SequenceIndex};
pub use model::SeedModel;
