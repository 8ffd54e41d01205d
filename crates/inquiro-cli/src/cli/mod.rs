//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use inquiro_core::config;

mod commands;

#[derive(Parser)]
#[command(name = "inquiro")]
#[command(version)]
#[command(about = "Terminal client for the Inquiro shopping assistant")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Start the interactive chat (default)
    Chat,
    /// Send one message and print the reply
    Send {
        /// The message to send to the assistant
        #[arg(short, long)]
        message: String,
    },
    /// Browse and manage past exchanges
    History {
        #[command(subcommand)]
        command: HistoryCommands,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Manage the stored API token
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
}

#[derive(clap::Subcommand)]
enum HistoryCommands {
    /// List one page of past exchanges
    List {
        /// Page number (1-based)
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Entries per page (default: history.page_size from config)
        #[arg(long, value_name = "N")]
        per_page: Option<u32>,
    },
    /// Search past exchanges by free text
    Search {
        /// Text to search for
        #[arg(value_name = "QUERY")]
        query: String,
    },
    /// Delete one exchange by ID
    Delete {
        #[arg(value_name = "ID")]
        id: String,
    },
    /// Delete all past exchanges
    Clear {
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
    /// Print a fresh config generated from defaults
    Generate,
    /// Open the config file with the system default application
    Edit,
}

#[derive(clap::Subcommand)]
enum AuthCommands {
    /// Store an API token
    SetToken {
        /// Bearer token issued by the backend
        #[arg(value_name = "TOKEN")]
        token: String,
    },
    /// Show where the active token comes from
    Status,
    /// Remove the stored token
    Logout,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    // config commands must work even when the file is broken
    let load = || config::Config::load().context("load config");

    // default to chat mode
    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => commands::chat::run(&load()?).await,
        Commands::Send { message } => commands::send::run(&message, &load()?).await,
        Commands::History { command } => {
            let config = load()?;
            match command {
                HistoryCommands::List { page, per_page } => {
                    commands::history::list(page, per_page, &config).await
                }
                HistoryCommands::Search { query } => {
                    commands::history::search(&query, &config).await
                }
                HistoryCommands::Delete { id } => commands::history::delete(&id, &config).await,
                HistoryCommands::Clear { yes } => commands::history::clear(yes, &config).await,
            }
        }
        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
            ConfigCommands::Generate => commands::config::generate(),
            ConfigCommands::Edit => commands::config::edit(),
        },
        Commands::Auth { command } => match command {
            AuthCommands::SetToken { token } => commands::auth::set_token(&token),
            AuthCommands::Status => commands::auth::status(),
            AuthCommands::Logout => commands::auth::logout(),
        },
    }
}
