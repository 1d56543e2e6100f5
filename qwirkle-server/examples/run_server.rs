//! Standalone Qwirkle server with a fixed deck seed
//!
//! Run with: cargo run -p qwirkle-server --example run_server [PORT]

use qwirkle_core::EngineConfig;
use qwirkle_server::{run_server, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let port = match std::env::args().nth(1) {
        Some(arg) => arg.parse()?,
        None => ServerConfig::default().port,
    };
    let config = ServerConfig {
        port,
        engine: EngineConfig::default().with_seed(7),
        ..ServerConfig::default()
    };

    println!("Qwirkle server on port {} (deck seed 7)", config.port);
    println!("Open a game: curl -X POST -H 'content-type: application/json' \\");
    println!("  -d '{{\"player_id\": 1}}' http://localhost:{}/api/games", config.port);

    run_server(config).await
}
