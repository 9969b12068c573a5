use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::frontend::context::FrontendContext;
use crate::shared::config::CONFIG;

use super::handler::handle_request;

pub async fn run_http_server(ctx: Arc<FrontendContext>) -> anyhow::Result<()> {
    let addr: SocketAddr = CONFIG.server.http_addr.parse()?;
    let listener = TcpListener::bind(addr).await?;

    info!("HTTP server running at http://{addr}/select/logsql/query");
    serve(listener, ctx).await
}

/// Accepts connections on `listener` until the server state signals shutdown.
pub async fn serve(listener: TcpListener, ctx: Arc<FrontendContext>) -> anyhow::Result<()> {
    // Keep-alive is off by default; streamed responses end with the connection.
    let enable_keep_alive: bool = std::env::var("LOG_SELECT_HTTP_KEEP_ALIVE")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(false);

    // Unset or 0 means no connection limit.
    let max_connections: Option<usize> = std::env::var("LOG_SELECT_MAX_HTTP_CONNECTIONS")
        .ok()
        .and_then(|s| {
            let val: usize = s.parse().ok()?;
            if val == 0 { None } else { Some(val) }
        });
    let connection_semaphore =
        max_connections.map(|max| Arc::new(tokio::sync::Semaphore::new(max)));

    loop {
        if ctx.server_state.is_shutting_down() {
            info!("HTTP server shutting down, not accepting new connections");
            break;
        }

        let permit = match &connection_semaphore {
            Some(semaphore) => Some(Arc::clone(semaphore).acquire_owned().await?),
            None => None,
        };

        // Use select to make accept cancellable on shutdown
        let accept_result = tokio::select! {
            result = listener.accept() => result,
            _ = async {
                loop {
                    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
                    if ctx.server_state.is_shutting_down() {
                        break;
                    }
                }
            } => {
                info!("HTTP server shutting down, stopping accept loop");
                break;
            }
        };

        let (stream, _peer_addr) = match accept_result {
            Ok(stream) => stream,
            Err(e) => {
                warn!("Failed to accept HTTP connection: {}", e);
                continue;
            }
        };
        let io = TokioIo::new(stream);
        let ctx = Arc::clone(&ctx);

        tokio::spawn(async move {
            let mut builder = hyper::server::conn::http1::Builder::new();
            builder.keep_alive(enable_keep_alive);

            if let Err(err) = builder
                .serve_connection(
                    io,
                    service_fn(move |req| handle_request(req, Arc::clone(&ctx))),
                )
                .await
            {
                // Clients dropping a streamed response mid-way are expected
                let text = err.to_string();
                if !text.contains("connection closed")
                    && !text.contains("broken pipe")
                    && !text.contains("Connection reset")
                {
                    warn!("Error serving connection: {:?}", err);
                }
            }
            // Released when the connection task completes
            drop(permit);
        });
    }

    // Query bodies are fed from blocking tasks that outlive their connection
    // future, so the grace period tracks running queries.
    if ctx.server_state.active_queries() > 0 {
        info!(
            active = ctx.server_state.active_queries(),
            "HTTP server waiting for active queries to complete..."
        );
        tokio::time::sleep(tokio::time::Duration::from_secs(2)).await;
    }

    info!("HTTP server shutdown complete");
    Ok(())
}
