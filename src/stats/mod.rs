pub mod global;
pub mod karlin;
pub mod length_adjustment;
pub mod query_info;
pub mod search_space;
pub mod tables;

pub use global::GlobalStatistics;
pub use karlin::*;
pub use length_adjustment::*;
pub use query_info::{QueryInfo, QueryStatistics};
pub use search_space::*;
pub use tables::*;
