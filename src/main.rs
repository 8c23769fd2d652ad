//! report-embed service binary.
//!
//! Loads `.env` and the layered configuration, then serves until shutdown.

use report_embed::server::{self, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = ServerConfig::load()?;
    server::start_server(config).await?;

    Ok(())
}
