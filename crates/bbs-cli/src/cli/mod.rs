//! CLI entry and dispatch.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use bbs_core::client::BoardClient;
use bbs_core::config::Config;
use bbs_core::logging;
use bbs_core::models::{CategoryId, ThreadId, UserId};
use bbs_core::store::Store;
use clap::Parser;

mod commands;

#[derive(Parser)]
#[command(name = "bbs")]
#[command(version)]
#[command(about = "Browse and search the Laravel BBS from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Dataset file to load instead of the configured one
    #[arg(long, value_name = "PATH", global = true)]
    data: Option<PathBuf>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Interactive session reading commands from stdin (default)
    Browse,

    /// Lists threads, pinned first
    Threads {
        /// Only threads in this category
        #[arg(long, value_name = "SLUG")]
        category: Option<String>,
    },

    /// Shows a thread with its posts
    Show {
        /// The ID of the thread to show
        #[arg(value_name = "THREAD_ID")]
        id: ThreadId,
    },

    /// Searches thread titles and bodies
    Search {
        /// Case-insensitive text to look for
        query: String,

        /// Only threads in this category
        #[arg(long, value_name = "CATEGORY_ID")]
        category: Option<CategoryId>,

        /// Result order (latest, oldest, popular, replies)
        #[arg(long, value_name = "MODE")]
        sort: Option<String>,
    },

    /// Lists categories with their thread counts
    Categories,

    /// Shows a user's profile and threads
    User {
        #[arg(value_name = "USER_ID")]
        id: UserId,
    },

    /// Shows board totals
    Stats,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
    /// Generate a fresh config from Rust defaults
    Generate,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load().context("load config")?;
    if let Some(data) = &cli.data {
        config.data_path = Some(data.to_string_lossy().into_owned());
    }

    // Held until exit so buffered log lines are flushed.
    let _log_guard = logging::init(&config)?;

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli.command, config).await })
}

async fn dispatch(command: Option<Commands>, config: Config) -> Result<()> {
    match command.unwrap_or(Commands::Browse) {
        Commands::Browse => commands::browse::run(open_board(&config)?, &config.display).await,
        Commands::Threads { category } => {
            commands::threads::list(open_board(&config)?.store(), category.as_deref())
        }
        Commands::Show { id } => {
            commands::threads::show(open_board(&config)?.store(), id);
            Ok(())
        }
        Commands::Search {
            query,
            category,
            sort,
        } => commands::search::run(&open_board(&config)?, query, category, sort.as_deref()).await,
        Commands::Categories => {
            commands::board::categories(open_board(&config)?.store());
            Ok(())
        }
        Commands::User { id } => {
            commands::board::user(open_board(&config)?.store(), id);
            Ok(())
        }
        Commands::Stats => {
            commands::board::stats(open_board(&config)?.store());
            Ok(())
        }

        // config commands never touch the dataset
        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
            ConfigCommands::Generate => commands::config::generate(),
        },
    }
}

fn open_board(config: &Config) -> Result<BoardClient> {
    let dataset = config.load_dataset().context("Failed to load dataset")?;
    let store = Arc::new(Store::new(dataset));
    tracing::debug!(
        threads = store.threads().len(),
        users = store.users().len(),
        "dataset loaded"
    );
    Ok(BoardClient::new(store, config.latency.clone()))
}
