pub mod errors;
pub mod pool;
pub mod query;
pub mod row;
pub mod types;

pub use errors::*;

#[cfg(test)]
mod pool_test;
