//! Tally CLI - versioned SQL migrations for DuckDB

use clap::Parser;
use std::process::ExitCode;

mod cli;
mod commands;

use cli::Cli;
use commands::{boot, common, migrate, new, status};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    let result = match &cli.command {
        cli::Commands::Migrate(args) => migrate::execute(args, &cli.global).await,
        cli::Commands::New(args) => new::execute(args, &cli.global).await,
        cli::Commands::Status(args) => status::execute(args, &cli.global).await,
        cli::Commands::Boot(args) => boot::execute(args, &cli.global).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<common::ExitCode>() {
            Some(code) => ExitCode::from(u8::try_from(code.0).unwrap_or(1)),
            None => {
                report_error(&err);
                ExitCode::FAILURE
            }
        },
    }
}

/// `RUST_LOG` wins over the `--verbose` default.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_target(false)
        .init();
}

/// Log the error chain, skipping causes already spelled out by their parent.
fn report_error(err: &anyhow::Error) {
    let mut shown = err.to_string();
    log::error!("{shown}");
    for cause in err.chain().skip(1) {
        let text = cause.to_string();
        if !shown.contains(&text) {
            log::error!("  caused by: {text}");
        }
        shown = text;
    }
}
