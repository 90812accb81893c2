//! Credence CLI - review extracted claims and query the trusted ones.

use clap::Parser;
use credence_cli::commands;
use credence_cli::{Cli, Command, Config, Context, Formatter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

async fn run(cli: Cli) -> credence_cli::Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(db) = cli.db {
        config.storage_path = db;
    }

    let format = cli.format.map(Into::into).unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    let ctx = Context::open(config)?;

    match cli.command {
        Command::Ingest(args) => {
            commands::execute_ingest(args, &ctx, &formatter).await?;
        }
        Command::Extract(args) => {
            commands::execute_extract(args, &ctx, &formatter).await?;
        }
        Command::Verdict(args) => commands::execute_verdict(args, &ctx, &formatter)?,
        Command::Query(args) => commands::execute_query(args, &ctx, &formatter).await?,
        Command::Claims(args) => commands::execute_claims(args, &ctx, &formatter)?,
        Command::History(args) => commands::execute_history(args, &ctx, &formatter)?,
        Command::Reindex => commands::execute_reindex(&ctx, &formatter).await?,
    }

    Ok(())
}
