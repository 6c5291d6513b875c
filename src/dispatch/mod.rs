//! Work distribution: the shared range iterator and the command dispatchers.

pub mod dispatcher;
pub mod range_iterator;

pub use dispatcher::{Command, Dispatched, Dispatcher, ParallelDispatcher, SerialDispatcher};
pub use range_iterator::{Chunk, RangeIterator};
