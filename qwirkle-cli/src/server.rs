//! `qwirkle serve`: turn command-line flags into a `ServerConfig` and run
//! the HTTP API on a tokio runtime until it is stopped.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use qwirkle_core::EngineConfig;
use qwirkle_server::{run_server, ServerConfig};

// ============================================================================
// COMMAND ARGUMENTS
// ============================================================================

#[derive(Args)]
pub struct ServerArgs {
    /// Port number to listen on
    #[arg(long, default_value = "8088")]
    pub port: u16,

    /// Directory of static files to serve outside /api
    #[arg(long)]
    pub static_dir: Option<PathBuf>,

    /// Leave move suggestions out of state snapshots
    #[arg(long)]
    pub no_suggestions: bool,
}

// ============================================================================
// COMMAND
// ============================================================================

/// Run the server until shutdown. The global seed fixes every game's deck.
pub fn run(args: ServerArgs, seed: Option<u64>) -> Result<()> {
    let config = configure_server(&args, seed)?;

    tracing::info!(
        port = config.port,
        seed = ?config.engine.seed,
        suggestions = config.engine.suggest_moves,
        "starting Qwirkle API server"
    );

    start_server(config)
}

/// Build the server config from command arguments
fn configure_server(args: &ServerArgs, seed: Option<u64>) -> Result<ServerConfig> {
    if let Some(dir) = &args.static_dir {
        validate_static_dir(dir)?;
    }

    let engine = EngineConfig {
        seed,
        suggest_moves: !args.no_suggestions,
    };

    Ok(ServerConfig {
        port: args.port,
        static_dir: args
            .static_dir
            .as_ref()
            .map(|dir| dir.to_string_lossy().to_string()),
        engine,
    })
}

/// Block on the server inside a fresh tokio runtime
fn start_server(config: ServerConfig) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("creating tokio runtime")?;
    runtime.block_on(run_server(config))
}

/// A missing static dir only warns; a path that is not a directory is an error
fn validate_static_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        tracing::warn!(path = %path.display(), "static directory missing, only /api will answer");
    } else if !path.is_dir() {
        anyhow::bail!("--static-dir {} is not a directory", path.display());
    }

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
