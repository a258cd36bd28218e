//! Status command implementation

use anyhow::{Context, Result};
use tally_engine::MigrationStatusEntry;

use crate::cli::{GlobalArgs, StatusArgs, StatusOutput};
use crate::commands::common::{engine_failure, run_blocking, CommandContext};

/// Execute the status command
pub async fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = CommandContext::load(global)?;

    let entries = run_blocking(move || {
        let db = ctx.open_database_for_read()?;
        let entries = ctx
            .migrator(&db)?
            .status(&ctx.migrations_dir)
            .map_err(engine_failure)?;
        Ok(entries)
    })
    .await?;

    match args.output {
        StatusOutput::Json => print_json(&entries),
        StatusOutput::Table => {
            print_table(&entries);
            Ok(())
        }
    }
}

fn print_json(entries: &[MigrationStatusEntry]) -> Result<()> {
    let json = serde_json::to_string_pretty(entries).context("Failed to serialize to JSON")?;
    println!("{json}");
    Ok(())
}

fn print_table(entries: &[MigrationStatusEntry]) {
    if entries.is_empty() {
        println!("No migrations found");
        return;
    }

    let name_width = entries
        .iter()
        .map(|e| e.name.len())
        .max()
        .unwrap_or(0)
        .max("NAME".len());

    println!(
        "{:<name_width$}  {:<8}  {:<4}  APPLIED AT",
        "NAME", "STATE", "DOWN"
    );
    for entry in entries {
        let applied_at = entry
            .state
            .applied_at()
            .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<name_width$}  {:<8}  {:<4}  {}",
            entry.name,
            entry.state.label(),
            if entry.has_down { "yes" } else { "no" },
            applied_at
        );
    }

    let pending = entries
        .iter()
        .filter(|e| e.state.applied_at().is_none())
        .count();
    println!();
    println!("{} migration(s), {pending} pending", entries.len());
}
