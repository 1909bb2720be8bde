//! Command line configuration for the server binary

use clap::Parser;

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[clap(author, version, about = "Real-time buzzer coordinator")]
pub struct ServerConfig {
    /// Server IP address to bind to
    #[clap(short = 'H', long, default_value = "0.0.0.0")]
    pub host: String,
    /// Server port to listen on
    #[clap(short, long, default_value = "8000")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("0.0.0.0"),
            port: 8000,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
