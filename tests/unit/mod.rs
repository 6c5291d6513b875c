//! Unit test infrastructure for plast
//!
//! Tests are organized by area:
//! - `seed` - seed models and the seed index
//! - `hsp` - Pass 0 invariants (diagonal suppression, worker merging)
//! - `splitter` - banded alignment splitter
//! - `dispatch` - range iterator and command dispatchers
//! - `stats` - e-values, bit scores, cutoffs
//! - `pipeline` - end-to-end searches

pub mod dispatch;
pub mod helpers;
pub mod hsp;
pub mod pipeline;
pub mod seed;
pub mod splitter;
pub mod stats;
