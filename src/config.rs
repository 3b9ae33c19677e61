//! Command-line and environment configuration.

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "UNO lobby and game server")]
pub struct ServerConfig {
    /// IP address to bind to
    #[arg(short = 'H', long, env = "UNO_HOST", default_value = "127.0.0.1")]
    pub host: String,
    /// TCP port to listen on (0 picks a free one)
    #[arg(short, long, env = "UNO_PORT", default_value_t = 9000)]
    pub port: u16,
    /// Longest accepted command line, in bytes
    #[arg(long, default_value_t = 1024)]
    pub max_line_length: usize,
    /// Tracing filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    pub log_filter: String,
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 9000,
            max_line_length: 1024,
            log_filter: "info".to_string(),
        }
    }
}
