//! Migrate command implementation

use anyhow::Result;

use crate::cli::{GlobalArgs, MigrateArgs};
use crate::commands::common::{engine_failure, run_blocking, CommandContext};

/// Execute the migrate command
pub async fn execute(args: &MigrateArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = CommandContext::load(global)?;

    if args.dry_run {
        let pending = run_blocking(move || {
            let db = ctx.open_database_for_read()?;
            let pending = ctx
                .migrator(&db)?
                .pending(&ctx.migrations_dir)
                .map_err(engine_failure)?;
            Ok(pending)
        })
        .await?;

        if pending.is_empty() {
            println!("No pending migrations");
        } else {
            println!("Dry run - would apply {} migration(s):", pending.len());
            for name in &pending {
                println!("  {name}");
            }
        }
        return Ok(());
    }

    run_sql_migrations(ctx).await
}

/// Apply the migrations directory and print a one-line summary.
pub(crate) async fn run_sql_migrations(ctx: CommandContext) -> Result<()> {
    log::info!("Running SQL migrations from {}", ctx.migrations_dir.display());

    let summary = run_blocking(move || {
        let db = ctx.open_database()?;
        let summary = ctx
            .migrator(&db)?
            .apply_all(&ctx.migrations_dir)
            .map_err(engine_failure)?;
        Ok(summary)
    })
    .await?;

    println!(
        "Applied {} migration(s), {} already applied",
        summary.applied.len(),
        summary.skipped.len()
    );
    Ok(())
}
