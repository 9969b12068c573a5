use std::sync::Arc;

use tracing::info;

use crate::engine::query::executor::QueryExecutor;
use crate::engine::query::memory_store::MemoryStore;
use crate::engine::query::output::{OutputSettings, ResultStreamer};
use crate::engine::types::TenantId;
use crate::frontend::http::body::ChannelWriter;
use crate::frontend::server_state::ServerState;
use crate::shared::config::CONFIG;

#[derive(Clone)]
pub struct FrontendContext {
    pub executor: Arc<dyn QueryExecutor>,
    pub streamer: Arc<ResultStreamer<ChannelWriter>>,
    pub server_state: Arc<ServerState>,
    pub response_channel_capacity: usize,
}

impl FrontendContext {
    pub fn new(
        executor: Arc<dyn QueryExecutor>,
        output: OutputSettings,
        server_state: Arc<ServerState>,
        response_channel_capacity: usize,
    ) -> Arc<Self> {
        Arc::new(Self {
            executor,
            streamer: Arc::new(ResultStreamer::new(output)),
            server_state,
            response_channel_capacity,
        })
    }

    pub fn from_config() -> anyhow::Result<Arc<Self>> {
        let store = MemoryStore::new(CONFIG.storage.block_rows);
        if let Some(seed_file) = &CONFIG.storage.seed_file {
            store.load_file(TenantId::default(), seed_file)?;
        }

        let output = CONFIG.output_settings();
        info!(
            max_sort_buffer_bytes = output.max_sort_buffer_bytes,
            output_buffer_bytes = output.output_buffer_bytes,
            "Query output configured"
        );

        Ok(Self::new(
            Arc::new(store),
            output,
            Arc::new(ServerState::new(CONFIG.server.max_concurrent_queries)),
            CONFIG.server.response_channel_capacity,
        ))
    }
}
