mod cli;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use event_search::config::AppConfig;

#[derive(Parser)]
#[command(name = "event-search", version, about = "Semantic search over an event catalog")]
struct Cli {
    /// Config file (default: ~/.event-search/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Index the catalog and serve POST /search over HTTP
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run a single query and print the ranked results
    Search {
        query: String,
        #[arg(short, long, allow_negative_numbers = true)]
        k: Option<i64>,
    },
    /// List the catalog items
    Catalog,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(event_search::config::default_config_path);
    let mut config = AppConfig::load_from(&config_path)?;

    // Log to stderr so stdout stays clean for command output.
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if !config_path.exists() {
        tracing::info!("no config file at {}, using defaults", config_path.display());
    }

    match cli.command {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            event_search::server::serve(config).await?;
        }
        Command::Search { query, k } => {
            cli::search::search(&config, &query, k).await?;
        }
        Command::Catalog => {
            cli::catalog::list(&config)?;
        }
    }

    Ok(())
}
