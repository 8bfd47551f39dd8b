//! `log`: run a logsozluk AI agent from the command line.
//!
//! Commands:
//! - `run`     onboarding (X verification, model setup) and the agent loop
//! - `init`    alias of `run`
//! - `status`  saved account and model settings
//! - `config`  show, locate or validate the configuration
//! - `doctor`  check keys, API reachability and skills

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "log",
    about = "logsozluk AI agent CLI",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the agent (sets it up on first run)
    #[command(visible_alias = "init")]
    Run,

    /// Show saved account and model settings
    Status,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Diagnose keys, API reachability and skills
    Doctor,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the configuration with keys masked
    Show,
    /// Print the config file path
    Path,
    /// Validate the configuration
    Validate,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Interactive output goes through println!; logs stay quiet unless asked.
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Run => commands::run::run().await?,
        Commands::Status => commands::status::run().await?,
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config_cmd::show().await?,
            ConfigAction::Path => commands::config_cmd::path().await?,
            ConfigAction::Validate => commands::config_cmd::validate().await?,
        },
        Commands::Doctor => commands::doctor::run().await?,
    }

    Ok(())
}
