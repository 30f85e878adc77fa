//! Jaguatirica Server Binary
//!
//! Starts the TCP server for Jaguatirica.

use clap::Parser;
use jaguatirica::config::{DEFAULT_HOST, DEFAULT_PORT};
use jaguatirica::{Config, Server};
use tracing_subscriber::{fmt, EnvFilter};

/// Jaguatirica Server
#[derive(Parser, Debug)]
#[command(name = "jaguatirica-server")]
#[command(about = "In-memory typed key-value store")]
#[command(version)]
struct Args {
    /// Host to bind
    #[arg(default_value = DEFAULT_HOST)]
    host: String,

    /// Port to bind
    #[arg(default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Maximum concurrent connections
    #[arg(short, long, default_value = "1024")]
    max_connections: usize,

    /// Per-connection read buffer in bytes (largest accepted request)
    #[arg(short, long, default_value = "4096")]
    buffer_size: usize,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,jaguatirica=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("Jaguatirica Server v{}", jaguatirica::VERSION);

    let config = Config::builder()
        .listen_addr(format!("{}:{}", args.host, args.port))
        .max_connections(args.max_connections)
        .buffer_size(args.buffer_size)
        .build();

    let mut server = match Server::bind(config) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("Failed to start server: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
