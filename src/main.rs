//! Unified Intelligence Platform server - Entry Point
//!
//! Serves credential registration, login, and dashboard analytics over a
//! line-oriented TCP protocol.

use log::{error, info};

use uip_server::Server;
use uip_server::config::ServerConfig;

#[tokio::main]
async fn main() {
    // RUST_LOG overrides the default level
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Launching Unified Intelligence Platform server...");

    // An explicit config path may be given as the first argument
    let config = match std::env::args().nth(1) {
        Some(path) => ServerConfig::load_from(&path),
        None => ServerConfig::load(),
    };

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let (startup, runtime) = config.split();
    let server = match Server::bind(startup, runtime).await {
        Ok(server) => server,
        Err(e) => {
            error!("Server startup failed: {}", e);
            std::process::exit(1);
        }
    };

    server.start().await;
}
