//! New command implementation

use anyhow::{Context, Result};
use tally_core::create_migration;

use crate::cli::{GlobalArgs, NewArgs};
use crate::commands::common::CommandContext;

/// Execute the new command
pub async fn execute(args: &NewArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = CommandContext::load(global)?;

    let path = create_migration(&ctx.migrations_dir, &args.name)
        .context("Failed to create migration file")?;

    println!("Created migration: {}", path.display());
    Ok(())
}
