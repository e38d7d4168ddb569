//! create-tables: drop and recreate the staging, dimension and fact tables.

use anyhow::Context;
use clap::Parser;
use tracing::info;

use dwh_cli::CommonArgs;

/// Drop and recreate every warehouse table. Existing data is lost.
#[derive(Parser, Debug)]
#[command(name = "create-tables", about)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dwh_cli::init_tracing();
    let cli = Cli::parse();

    let config = cli.common.load_config()?;
    config.log_summary();

    let reports = dwh_etl::create_tables(&config, cli.common.verbose)
        .await
        .context("schema setup failed")?;
    dwh_cli::log_reports(&reports);

    info!("create-tables finished");
    Ok(())
}
