pub mod block;
pub mod field;
pub mod tenant;

pub use block::{BlockColumn, DataBlock};
pub use field::{Field, Row, TIME_FIELD, field_value};
pub use tenant::TenantId;

#[cfg(test)]
mod block_test;
