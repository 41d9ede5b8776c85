use std::sync::Arc;

use plantcare_api::clock::SystemClock;
use plantcare_api::config::ServerConfig;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = ServerConfig::from_env()?;
    let app = plantcare_api::app(&config, Arc::new(SystemClock));

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "Listening");

    axum::serve(listener, app).await?;

    Ok(())
}
