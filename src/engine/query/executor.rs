use std::sync::atomic::{AtomicBool, Ordering};

use crate::engine::errors::QueryError;
use crate::engine::types::{DataBlock, TenantId};

/// Per-query cancellation state shared between the output side and the executor.
#[derive(Debug, Default)]
pub struct QueryContext {
    cancelled: AtomicBool,
}

impl QueryContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Asks the executor to stop scanning. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Callback receiving matching rows one block at a time. The first argument
/// identifies the worker producing the block; calls may run in parallel.
pub type WriteBlock<'a> = dyn Fn(usize, &DataBlock) + Sync + 'a;

/// Produces the blocks matching `query` for `tenant`.
pub trait QueryExecutor: Send + Sync {
    /// Runs `query` and hands every non-empty matching block to `write_block`.
    /// Implementations stop scheduling new blocks once `ctx` is cancelled.
    fn run_query(
        &self,
        tenant: TenantId,
        query: &str,
        ctx: &QueryContext,
        write_block: &WriteBlock<'_>,
    ) -> Result<(), QueryError>;
}
