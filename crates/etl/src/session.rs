//! Entry points used by the binaries: build the catalog, connect, run,
//! always close.

use dwh_catalog::Catalog;
use dwh_core::DwhConfig;

use crate::error::EtlError;
use crate::runner::{PhaseReport, Runner};
use crate::warehouse::PgWarehouse;

/// Drop and recreate every managed table.
pub async fn create_tables(config: &DwhConfig, verbose: bool) -> Result<Vec<PhaseReport>, EtlError> {
    let catalog = Catalog::build(config)?;
    let warehouse = PgWarehouse::connect(&config.cluster).await?;
    Runner::new(warehouse, verbose).run_schema_setup(&catalog).await
}

/// Load the staging tables from S3, then populate the star schema.
pub async fn etl(config: &DwhConfig, verbose: bool) -> Result<Vec<PhaseReport>, EtlError> {
    let catalog = Catalog::build(config)?;
    let warehouse = PgWarehouse::connect(&config.cluster).await?;
    Runner::new(warehouse, verbose).run_etl(&catalog).await
}
