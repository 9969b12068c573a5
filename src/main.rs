use log_select::frontend::start_all;
use log_select::logging;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init()?;

    info!("log_select is starting...");
    start_all().await?;

    Ok(())
}
