use clap::Parser;
use tracing::info;

use uno_server::config::ServerConfig;
use uno_server::server::Server;
use uno_server::telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    telemetry::init(&config.log_filter)?;

    let server = Server::bind(&config).await?;
    info!(addr = %server.local_addr()?, "starting UNO server");

    tokio::select! {
        res = server.run() => res?,
        _ = tokio::signal::ctrl_c() => {
            info!("received Ctrl+C, shutting down");
        }
    }
    Ok(())
}
