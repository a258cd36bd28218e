//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Tally - versioned SQL migrations for DuckDB
#[derive(Parser, Debug)]
#[command(name = "tally")]
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
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project directory; relative paths resolve against it
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Config file path (default: tally.yml in the project directory, if present)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// DuckDB database file, or ":memory:"
    #[arg(short, long, global = true, env = "TALLY_DATABASE")]
    pub database: Option<String>,

    /// Directory holding the migration files
    #[arg(short, long, global = true)]
    pub migrations_dir: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply pending migrations
    Migrate(MigrateArgs),

    /// Create a new timestamped migration file
    New(NewArgs),

    /// Show applied, pending and orphaned migrations
    Status(StatusArgs),

    /// Prepare the schema the way the server does on startup
    Boot(BootArgs),
}

/// Arguments for the migrate command
#[derive(Args, Debug)]
pub struct MigrateArgs {
    /// List pending migrations without applying them
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the new command
#[derive(Args, Debug)]
pub struct NewArgs {
    /// Migration description, e.g. add_users_table
    pub name: String,
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: StatusOutput,
}

/// Status output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusOutput {
    /// Table format
    Table,
    /// JSON output
    Json,
}

/// Arguments for the boot command
#[derive(Args, Debug)]
pub struct BootArgs {
    /// Apply the SQL migrations directory instead of the embedded schema
    #[arg(long)]
    pub sql_migrations: bool,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
