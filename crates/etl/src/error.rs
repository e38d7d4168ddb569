use dwh_catalog::{CatalogError, Phase};
use dwh_core::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EtlError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("invalid SSL mode '{0}'")]
    SslMode(String),

    #[error("failed to connect to warehouse: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("{phase} statement '{tag}' failed: {source}")]
    Statement {
        phase: Phase,
        tag: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("failed to close warehouse connection: {0}")]
    Close(#[source] sqlx::Error),

    #[error("failed to echo statement: {0}")]
    Echo(#[from] std::io::Error),
}
