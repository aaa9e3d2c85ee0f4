//! CLI interface and argument parsing

pub mod commands;

use clap::{Parser, Subcommand};

/// Ledgerlift - resumable ledger to document store migration
#[derive(Parser, Debug)]
#[command(name = "ledgerlift")]
#[command(version, about, long_about = None)]
#[command(author = "Ledgerlift Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "ledgerlift.toml", env = "LEDGERLIFT_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "LEDGERLIFT_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Migrate ledger rows to the document sink, resuming from the checkpoint
    Migrate(commands::migrate::MigrateArgs),

    /// Show the saved checkpoint
    Status(commands::status::StatusArgs),

    /// Delete the checkpoint so the next migration starts over
    Reset(commands::reset::ResetArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
