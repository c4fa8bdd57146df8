//! CLI argument definitions using clap derive API

use clap::builder::BoolishValueParser;
use clap::{Args, Parser, Subcommand};
use mariposa_core::{Engine, SettingsOverrides};
use std::path::PathBuf;

/// Mariposa - safely and automatically migrate database schemas
#[derive(Parser, Debug)]
#[command(name = "mariposa")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Allow migrations older than the latest applied one to run
    /// (`--out-of-order=false` overrides the project file)
    #[arg(
        short,
        long,
        global = true,
        env = "MARIPOSA_OUT_OF_ORDER",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_parser = BoolishValueParser::new()
    )]
    pub out_of_order: Option<bool>,

    /// Print what would be executed without changing anything
    #[arg(short = 'n', long, global = true, env = "MARIPOSA_DRY_RUN")]
    pub dry_run: bool,

    /// Database engine (duckdb, postgres, mysql)
    #[arg(short, long, global = true, env = "MARIPOSA_ENGINE")]
    pub engine: Option<Engine>,

    /// Engine-specific connection descriptor
    #[arg(short, long, global = true, env = "MARIPOSA_CONNECTION")]
    pub connection: Option<String>,

    /// Directory holding migration files
    #[arg(short, long, global = true, env = "MARIPOSA_DIRECTORY")]
    pub directory: Option<PathBuf>,

    /// PostgreSQL schema to migrate
    #[arg(long, global = true, env = "MARIPOSA_SCHEMA")]
    pub schema: Option<String>,

    /// Project file (default: ./mariposa.yml if present)
    #[arg(long, global = true, env = "MARIPOSA_CONFIG")]
    pub config: Option<PathBuf>,
}

impl GlobalArgs {
    /// Settings given on the command line or through the environment
    pub fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            engine: self.engine,
            connection: self.connection.clone(),
            directory: self.directory.clone(),
            schema: self.schema.clone(),
            out_of_order: self.out_of_order,
            dry_run: self.dry_run,
        }
    }
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply pending migrations
    Migrate,

    /// Create a new, timestamped migration file
    Create(CreateArgs),

    /// Update the ledger for migrations renamed on disk
    Renamed,
}

/// Arguments for the create command
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Words describing the migration, joined with '-'
    #[arg(required = true)]
    pub slug: Vec<String>,

    /// File extension; anything other than sql creates an executable
    #[arg(long, default_value = "sql")]
    pub ext: String,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
