mod config;

use anyhow::{Context, Result};
use botstate_core::BotStore;
use botstate_data::SqliteBotStore;
use clap::{Parser, Subcommand, ValueEnum};
use config::Config;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "botstate")]
#[command(about = "Bot on/off state service: serve the HTTP API or inspect the store")]
#[command(version)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,

    /// SQLite database URL (`sqlite://path/to/bots.db`) or file path
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Path to a TOML config file
    #[arg(short, long, default_value = "botstate.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Server {
        /// Bind address
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// List all bots
    List,

    /// Show a bot, creating it switched off if unknown
    Get {
        id: i64,
    },

    /// Set a bot's state
    Set {
        id: i64,
        #[arg(value_enum)]
        state: BotState,
    },

    /// Flip a bot's state
    Toggle {
        id: i64,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum BotState {
    On,
    Off,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;

    // Initialize tracing
    let log_level = cli.log_level.unwrap_or(config.log_level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level));
    fmt().with_env_filter(filter).with_target(false).init();

    tracing::debug!(config = %cli.config.display(), "Configuration loaded");

    let store = match &cli.database_url {
        Some(url) => SqliteBotStore::open_url(url)
            .await
            .with_context(|| format!("opening bot store at {url}"))?,
        None => SqliteBotStore::open(&config.database.path)
            .await
            .with_context(|| format!("opening bot store at {}", config.database.path.display()))?,
    };

    match cli.command {
        Commands::Server { bind } => {
            let bind = bind.unwrap_or(config.server.bind);
            botstate_api::start_server(Arc::new(store), &bind).await?;
        }
        Commands::List => print_json(&store.list_bots().await?)?,
        Commands::Get { id } => print_json(&store.read_or_init_bot(id).await?)?,
        Commands::Set { id, state } => {
            let is_on = matches!(state, BotState::On);
            print_json(&store.set_bot_state(id, is_on).await?)?;
        }
        Commands::Toggle { id } => print_json(&store.toggle_bot(id).await?)?,
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
