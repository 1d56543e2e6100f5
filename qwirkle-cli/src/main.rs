//! Qwirkle CLI - Command-line interface
//!
//! Commands:
//! - serve: Start the HTTP API server
//! - play: Run self-play games between greedy bots

mod play_cmd;
mod server;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "qwirkle")]
#[command(about = "Qwirkle rules engine: API server and self-play")]
struct Cli {
    /// Base seed for deck shuffles (omit for fresh entropy)
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve(server::ServerArgs),
    /// Play games between two greedy bots
    Play(play_cmd::PlayArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Serve(args) => server::run(args, cli.seed),
        Commands::Play(args) => play_cmd::run(args, cli.seed),
    }
}

/// Logs go to stderr so `play --json` output stays clean
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["qwirkle", "play", "--games", "3", "--seed", "9", "-v"]).unwrap();
        assert_eq!(cli.seed, Some(9));
        assert!(cli.verbose);
        match cli.command {
            Commands::Play(args) => {
                assert_eq!(args.games, 3);
                assert!(!args.json);
            }
            Commands::Serve(_) => panic!("expected play"),
        }
    }

    #[test]
    fn test_serve_defaults() {
        let cli = Cli::try_parse_from(["qwirkle", "serve"]).unwrap();
        assert!(cli.seed.is_none());
        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.port, 8088);
                assert!(args.static_dir.is_none());
            }
            Commands::Play(_) => panic!("expected serve"),
        }
    }
}
