use clap::Parser;
use log::info;
use server::config::ServerConfig;
use server::coordinator::Coordinator;
use std::sync::Arc;

/// Main-method of the application.
/// Parses command-line arguments, then serves the buzzer endpoint until Ctrl+C.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::parse();
    let coordinator = Arc::new(Coordinator::new());

    info!("Player URL: ws://{}/ws?role=player&name=<name>", config.address());
    info!("Admin URL:  ws://{}/ws?role=admin", config.address());

    server::network::serve(&config, coordinator).await?;

    info!("Server stopped");
    Ok(())
}
