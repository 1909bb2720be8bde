use clap::Parser;
use client::network::Client;
use log::info;
use shared::Role;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// WebSocket endpoint of the buzzer server
    #[arg(short = 's', long, default_value = "ws://127.0.0.1:8000/ws")]
    server: String,

    /// Connect as a player or an admin
    #[arg(short = 'r', long, default_value = "player")]
    role: Role,

    /// Display name shown to everyone (players only)
    #[arg(short = 'n', long)]
    name: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    info!("Starting buzzer client...");
    let mut client = Client::new(&args.server, args.role, args.name.as_deref())?;
    client.run().await?;

    Ok(())
}
