use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;
use rayon::prelude::*;
use tracing::{debug, info};

use super::executor::{QueryContext, QueryExecutor, WriteBlock};
use crate::engine::errors::QueryError;
use crate::engine::row::JsonParser;
use crate::engine::types::{BlockColumn, DataBlock, Row, TenantId};

/// In-memory log store serving queries from per-tenant blocks.
///
/// The query text is a plain filter: `*` or an empty string match every row,
/// anything else matches rows where some field value contains it.
#[derive(Debug)]
pub struct MemoryStore {
    block_rows: usize,
    tenants: RwLock<HashMap<TenantId, Vec<Arc<DataBlock>>>>,
}

impl MemoryStore {
    pub fn new(block_rows: usize) -> Self {
        Self {
            block_rows: block_rows.max(1),
            tenants: RwLock::new(HashMap::new()),
        }
    }

    /// Appends `rows` for `tenant`, split into blocks of at most `block_rows` rows.
    pub fn ingest_rows(&self, tenant: TenantId, rows: &[Row]) {
        if rows.is_empty() {
            return;
        }
        let blocks: Vec<Arc<DataBlock>> = rows
            .chunks(self.block_rows)
            .map(|chunk| Arc::new(DataBlock::from_rows(chunk)))
            .collect();
        debug!(
            target: "log_select::store",
            tenant = %tenant,
            rows = rows.len(),
            blocks = blocks.len(),
            "Ingested rows"
        );
        self.tenants.write().entry(tenant).or_default().extend(blocks);
    }

    /// Parses JSON lines with the flattening parser and ingests them. Blank
    /// lines are skipped. Returns the number of ingested rows.
    pub fn ingest_json_lines(&self, tenant: TenantId, data: &[u8]) -> Result<usize, QueryError> {
        let mut parser = JsonParser::new();
        let mut rows = Vec::new();
        for line in data.split(|&b| b == b'\n') {
            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            rows.push(parser.parse_log_message(line)?.to_vec());
        }
        self.ingest_rows(tenant, &rows);
        Ok(rows.len())
    }

    /// Loads a JSON-lines file for `tenant`.
    pub fn load_file(&self, tenant: TenantId, path: impl AsRef<Path>) -> Result<usize, QueryError> {
        let path = path.as_ref();
        let data = fs::read(path)?;
        let rows = self.ingest_json_lines(tenant, &data)?;
        info!(
            target: "log_select::store",
            tenant = %tenant,
            rows,
            "Loaded rows from {}",
            path.display()
        );
        Ok(rows)
    }

    pub fn rows_count(&self, tenant: TenantId) -> usize {
        self.tenants
            .read()
            .get(&tenant)
            .map_or(0, |blocks| blocks.iter().map(|b| b.rows_count()).sum())
    }

    fn blocks(&self, tenant: TenantId) -> Vec<Arc<DataBlock>> {
        self.tenants.read().get(&tenant).cloned().unwrap_or_default()
    }
}

impl QueryExecutor for MemoryStore {
    fn run_query(
        &self,
        tenant: TenantId,
        query: &str,
        ctx: &QueryContext,
        write_block: &WriteBlock<'_>,
    ) -> Result<(), QueryError> {
        let filter = RowFilter::new(query);
        let blocks = self.blocks(tenant);

        blocks.par_iter().for_each(|block| {
            if ctx.is_cancelled() {
                return;
            }
            let worker_id = rayon::current_thread_index().unwrap_or(0);
            match &filter {
                RowFilter::All => {
                    if block.rows_count() > 0 {
                        write_block(worker_id, block.as_ref());
                    }
                }
                RowFilter::Contains(needle) => {
                    let matched = filter_block(block, needle);
                    if matched.rows_count() > 0 {
                        write_block(worker_id, &matched);
                    }
                }
            }
        });

        Ok(())
    }
}

enum RowFilter<'a> {
    All,
    Contains(&'a str),
}

impl<'a> RowFilter<'a> {
    fn new(query: &'a str) -> Self {
        match query.trim() {
            "" | "*" => RowFilter::All,
            needle => RowFilter::Contains(needle),
        }
    }
}

fn filter_block(block: &DataBlock, needle: &str) -> DataBlock {
    let keep: Vec<usize> = (0..block.rows_count())
        .filter(|&row_idx| {
            block
                .columns
                .iter()
                .any(|column| column.values[row_idx].contains(needle))
        })
        .collect();

    let mut matched = DataBlock {
        columns: block
            .columns
            .iter()
            .map(|column| BlockColumn {
                name: column.name.clone(),
                values: Vec::with_capacity(keep.len()),
            })
            .collect(),
    };
    for (src, dst) in block.columns.iter().zip(matched.columns.iter_mut()) {
        dst.values
            .extend(keep.iter().map(|&row_idx| src.values[row_idx].clone()));
    }
    matched
}
