//! Warehouse connection used by the [`Runner`](crate::Runner).
//!
//! [`PgWarehouse`] talks to Redshift over the PostgreSQL wire protocol.
//! Statements are sent with the simple-query protocol (`COPY` and DDL are
//! not preparable) and each one runs in its own transaction.

use std::str::FromStr;

use async_trait::async_trait;
use dwh_core::ClusterConfig;
use sqlx::postgres::{PgConnectOptions, PgConnection, PgSslMode};
use sqlx::{Connection, Executor};
use tracing::{debug, info};

use crate::error::EtlError;

/// A single warehouse connection that executes one statement at a time.
#[async_trait]
pub trait Warehouse: Send {
    /// Execute `sql` and commit it. Returns the rows affected as reported
    /// by the server.
    async fn execute_committed(&mut self, sql: &str) -> Result<u64, sqlx::Error>;

    /// Release the connection. Calling it twice is a no-op.
    async fn close(&mut self) -> Result<(), sqlx::Error>;
}

// ── PostgreSQL / Redshift ─────────────────────────────────────

pub struct PgWarehouse {
    conn: Option<PgConnection>,
}

impl PgWarehouse {
    /// Translate cluster settings into driver options.
    pub fn connect_options(cluster: &ClusterConfig) -> Result<PgConnectOptions, EtlError> {
        let ssl_mode = PgSslMode::from_str(&cluster.ssl_mode)
            .map_err(|_| EtlError::SslMode(cluster.ssl_mode.clone()))?;
        Ok(PgConnectOptions::new()
            .host(&cluster.host)
            .port(cluster.db_port)
            .database(&cluster.db_name)
            .username(&cluster.db_user)
            .password(&cluster.db_password)
            .ssl_mode(ssl_mode))
    }

    pub async fn connect(cluster: &ClusterConfig) -> Result<Self, EtlError> {
        let options = Self::connect_options(cluster)?;
        info!("Connecting to warehouse: {}", cluster.redacted_connection_string());
        let conn = PgConnection::connect_with(&options)
            .await
            .map_err(EtlError::Connect)?;
        info!("Warehouse connected: {}:{}/{}", cluster.host, cluster.db_port, cluster.db_name);
        Ok(Self { conn: Some(conn) })
    }
}

#[async_trait]
impl Warehouse for PgWarehouse {
    async fn execute_committed(&mut self, sql: &str) -> Result<u64, sqlx::Error> {
        let conn = self
            .conn
            .as_mut()
            .ok_or_else(|| sqlx::Error::Protocol("warehouse connection already closed".into()))?;

        let mut tx = conn.begin().await?;
        let tx_conn: &mut PgConnection = &mut tx;
        let result = tx_conn.execute(sqlx::raw_sql(sql)).await?;
        tx.commit().await?;
        Ok(result.rows_affected())
    }

    async fn close(&mut self) -> Result<(), sqlx::Error> {
        if let Some(conn) = self.conn.take() {
            conn.close().await?;
            debug!("Warehouse connection closed");
        }
        Ok(())
    }
}
