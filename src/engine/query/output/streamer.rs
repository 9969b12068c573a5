use std::io::{self, Write};

use tracing::debug;

use super::buffered_writer::OutputBuffer;
use super::sort_writer::SortWriter;
use crate::engine::errors::QueryError;
use crate::engine::pool::Pool;
use crate::engine::query::executor::{QueryContext, QueryExecutor};
use crate::engine::row::write_json_row;
use crate::engine::types::{DataBlock, TenantId};

const DEFAULT_MAX_SORT_BUFFER_BYTES: usize = 1024 * 1024;
const DEFAULT_OUTPUT_BUFFER_BYTES: usize = 64 * 1024;

/// Size limits applied to every query streamed by a [`ResultStreamer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputSettings {
    /// Results smaller than this are sorted by `_time` before being sent.
    pub max_sort_buffer_bytes: usize,
    /// Capacity of the coalescing buffer in front of the response writer.
    pub output_buffer_bytes: usize,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            max_sort_buffer_bytes: DEFAULT_MAX_SORT_BUFFER_BYTES,
            output_buffer_bytes: DEFAULT_OUTPUT_BUFFER_BYTES,
        }
    }
}

/// Runs queries and streams their rows into a writer, reusing output buffers,
/// sort writers and per-block scratch space across queries.
#[derive(Debug)]
pub struct ResultStreamer<W: Write> {
    settings: OutputSettings,
    buffers: Pool<OutputBuffer<W>>,
    writers: Pool<SortWriter<OutputBuffer<W>>>,
    chunks: Pool<Vec<u8>>,
}

impl<W: Write + Send> ResultStreamer<W> {
    pub fn new(settings: OutputSettings) -> Self {
        Self {
            settings,
            buffers: Pool::default(),
            writers: Pool::default(),
            chunks: Pool::default(),
        }
    }

    pub fn settings(&self) -> OutputSettings {
        self.settings
    }

    /// Streams the rows matching `query` into `writer`, keeping at most
    /// `limit` rows (`0` = unlimited), and hands `writer` back when done.
    ///
    /// Blocks the calling thread until the executor finishes.
    pub fn stream(
        &self,
        executor: &dyn QueryExecutor,
        tenant: TenantId,
        query: &str,
        limit: usize,
        writer: W,
    ) -> Result<W, QueryError> {
        let mut bw = self.buffers.get();
        bw.init(writer, self.settings.output_buffer_bytes);
        let mut sw = self.writers.get();
        sw.init(bw, self.settings.max_sort_buffer_bytes, limit);

        let ctx = QueryContext::new();
        let write_block = |_worker_id: usize, block: &DataBlock| {
            let mut chunk = self.chunks.get();
            for row_idx in 0..block.rows_count() {
                write_json_row(&mut chunk, block, row_idx);
            }
            if !sw.try_write(&chunk) {
                ctx.cancel();
            }
            self.chunks.put(chunk);
        };
        let result = executor.run_query(tenant, query, &ctx, &write_block);

        sw.final_flush();
        let state = sw.state();
        let bw = sw.take_writer();
        self.writers.put(sw);

        let writer = bw.and_then(|mut bw| {
            bw.flush_ignore_errors();
            let writer = bw.take_writer();
            self.buffers.put(bw);
            writer
        });

        debug!(
            target: "log_select::query",
            tenant = %tenant,
            query,
            limit,
            ?state,
            cancelled = ctx.is_cancelled(),
            "Query output finished"
        );

        result?;
        writer.ok_or_else(|| {
            QueryError::Io(io::Error::new(
                io::ErrorKind::NotConnected,
                "query output writer was detached",
            ))
        })
    }
}
