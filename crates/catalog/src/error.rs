use thiserror::Error;

/// Errors produced while rendering the [`Catalog`](crate::Catalog).
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("config value {key} cannot be embedded in a COPY statement: {reason}")]
    UnsafeLiteral { key: &'static str, reason: &'static str },
}
