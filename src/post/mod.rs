pub mod filter;
pub mod visitors;

pub use filter::AlignmentFilter;
pub use visitors::{AlignmentVisitor, CollectVisitor, MaxHitsVisitor};
