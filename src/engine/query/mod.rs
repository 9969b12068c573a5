pub mod executor;
pub mod memory_store;
pub mod output;

pub use executor::{QueryContext, QueryExecutor, WriteBlock};
pub use memory_store::MemoryStore;
