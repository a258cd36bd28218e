//! Boot command implementation
//!
//! Mirrors server startup: either apply the SQL migrations directory or
//! bring the embedded application schema up to date.

use anyhow::Result;
use tally_core::SchemaStrategy;
use tally_engine::run_auto_sync;

use crate::cli::{BootArgs, GlobalArgs};
use crate::commands::common::{engine_failure, run_blocking, CommandContext};
use crate::commands::migrate::run_sql_migrations;

/// Execute the boot command
pub async fn execute(args: &BootArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = CommandContext::load(global)?;

    let strategy = if args.sql_migrations {
        SchemaStrategy::SqlMigrations
    } else {
        ctx.config.schema_strategy
    };
    log::info!("Schema strategy: {strategy}");

    match strategy {
        SchemaStrategy::SqlMigrations => run_sql_migrations(ctx).await,
        SchemaStrategy::AutoSync => {
            let applied = run_blocking(move || {
                let db = ctx.open_database()?;
                let applied = run_auto_sync(&db).map_err(engine_failure)?;
                Ok(applied)
            })
            .await?;
            println!("Schema synchronized ({applied} version(s) applied)");
            Ok(())
        }
    }
}
