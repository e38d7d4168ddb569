//! etl: bulk-load staging tables from S3 and build the star schema.

use anyhow::Context;
use clap::Parser;
use tracing::info;

use dwh_cli::CommonArgs;

/// Load staging tables from S3, then populate the fact and dimension tables.
///
/// Run `create-tables` first. Re-running without it appends duplicate rows.
#[derive(Parser, Debug)]
#[command(name = "etl", about)]
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

    let reports = dwh_etl::etl(&config, cli.common.verbose)
        .await
        .context("etl run failed")?;
    dwh_cli::log_reports(&reports);

    info!("etl finished");
    Ok(())
}
