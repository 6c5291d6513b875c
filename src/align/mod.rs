//! Alignment records and the kernels that produce them: x-drop gapped
//! extension, the banded splitter and the Pass 2 generator.

pub mod alignment;
pub mod container;
pub mod generator;
pub mod semi_gapped;
pub mod splitter;

pub use alignment::Alignment;
pub use container::AlignmentContainer;
pub use generator::{AlignmentContext, AlignmentGeneratorCmd};
pub use semi_gapped::{extend_gapped, ExtensionScratch, GapCosts, GappedExtension};
pub use splitter::{AlignmentSplitter, SplitOutput, MAX_ALIGN_SIZE};
