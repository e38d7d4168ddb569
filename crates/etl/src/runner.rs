use std::io::{self, Write};
use std::time::{Duration, Instant};

use dwh_catalog::{Catalog, Phase, Statement};
use tracing::{debug, info, warn};

use crate::echo::echo_statement;
use crate::error::EtlError;
use crate::warehouse::Warehouse;

/// Outcome of one committed statement.
#[derive(Debug, Clone)]
pub struct StatementReport {
    pub tag: &'static str,
    pub rows_affected: u64,
    pub elapsed: Duration,
}

/// Outcome of a fully committed phase. Informational only; row counts are
/// never checked.
#[derive(Debug, Clone)]
pub struct PhaseReport {
    pub phase: Phase,
    pub statements: Vec<StatementReport>,
}

impl PhaseReport {
    pub fn total_rows(&self) -> u64 {
        self.statements.iter().map(|s| s.rows_affected).sum()
    }

    pub fn elapsed(&self) -> Duration {
        self.statements.iter().map(|s| s.elapsed).sum()
    }
}

/// Executes catalog phases over one warehouse connection.
///
/// Each statement is optionally echoed to `out`, executed, and committed
/// before the next one is sent. The first failure stops the run; statements
/// already committed stay committed.
pub struct Runner<W, O = io::Stdout> {
    warehouse: W,
    verbose: bool,
    out: O,
}

impl<W: Warehouse> Runner<W> {
    /// Runner echoing to stdout when `verbose` is set.
    pub fn new(warehouse: W, verbose: bool) -> Self {
        Self {
            warehouse,
            verbose,
            out: io::stdout(),
        }
    }
}

impl<W: Warehouse, O: Write> Runner<W, O> {
    /// Redirect verbose echo to another writer.
    pub fn with_output<O2: Write>(self, out: O2) -> Runner<W, O2> {
        Runner {
            warehouse: self.warehouse,
            verbose: self.verbose,
            out,
        }
    }

    pub fn into_parts(self) -> (W, O) {
        (self.warehouse, self.out)
    }

    /// Echo, execute and commit a single statement.
    async fn run_statement(&mut self, stmt: &Statement) -> Result<StatementReport, EtlError> {
        if self.verbose {
            echo_statement(&mut self.out, stmt.tag, &stmt.sql)?;
        }
        debug!(tag = stmt.tag, sql = %stmt.sql, "executing statement");

        let started = Instant::now();
        let rows_affected = self
            .warehouse
            .execute_committed(&stmt.sql)
            .await
            .map_err(|source| EtlError::Statement {
                phase: stmt.phase,
                tag: stmt.tag,
                source,
            })?;
        let elapsed = started.elapsed();

        info!(
            tag = stmt.tag,
            rows = rows_affected,
            elapsed_ms = elapsed.as_millis() as u64,
            "statement committed"
        );
        Ok(StatementReport {
            tag: stmt.tag,
            rows_affected,
            elapsed,
        })
    }

    /// Execute `statements` in order, committing after each one.
    pub async fn run_phase(
        &mut self,
        phase: Phase,
        statements: &[Statement],
    ) -> Result<PhaseReport, EtlError> {
        info!("Phase '{}' starting ({} statements)", phase, statements.len());
        let mut report = PhaseReport {
            phase,
            statements: Vec::with_capacity(statements.len()),
        };
        for stmt in statements {
            report.statements.push(self.run_statement(stmt).await?);
        }
        log_phase_complete(&report);
        Ok(report)
    }

    /// Execute a multi-phase statement sequence in order.
    ///
    /// Consecutive statements of the same phase are grouped into one report.
    pub async fn run_statements<'a, I>(&mut self, statements: I) -> Result<Vec<PhaseReport>, EtlError>
    where
        I: IntoIterator<Item = &'a Statement>,
    {
        let mut reports = Vec::new();
        let mut current: Option<PhaseReport> = None;

        for stmt in statements {
            let mut report = match current.take() {
                Some(report) if report.phase == stmt.phase => report,
                finished => {
                    if let Some(done) = finished {
                        log_phase_complete(&done);
                        reports.push(done);
                    }
                    info!("Phase '{}' starting", stmt.phase);
                    PhaseReport {
                        phase: stmt.phase,
                        statements: Vec::new(),
                    }
                }
            };
            report.statements.push(self.run_statement(stmt).await?);
            current = Some(report);
        }

        if let Some(done) = current {
            log_phase_complete(&done);
            reports.push(done);
        }
        Ok(reports)
    }

    /// Drop every managed table, then create them all again.
    pub async fn reset_schema(&mut self, catalog: &Catalog) -> Result<Vec<PhaseReport>, EtlError> {
        self.run_statements(catalog.schema_setup()).await
    }

    /// Bulk-load both staging tables from object storage.
    pub async fn load_staging(&mut self, catalog: &Catalog) -> Result<PhaseReport, EtlError> {
        self.run_phase(Phase::Copy, catalog.phase(Phase::Copy)).await
    }

    /// Populate the fact and dimension tables from staging.
    pub async fn transform(&mut self, catalog: &Catalog) -> Result<PhaseReport, EtlError> {
        self.run_phase(Phase::Insert, catalog.phase(Phase::Insert)).await
    }

    /// Load staging, then transform.
    pub async fn load_and_transform(&mut self, catalog: &Catalog) -> Result<Vec<PhaseReport>, EtlError> {
        self.run_statements(catalog.etl()).await
    }

    /// Close the connection, keeping `result` as the outcome.
    ///
    /// When `result` is already an error a close failure is only logged.
    pub async fn finish<T>(mut self, result: Result<T, EtlError>) -> Result<T, EtlError> {
        let closed = self.warehouse.close().await.map_err(EtlError::Close);
        match (result, closed) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(e)) => Err(e),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(close_err)) => {
                warn!(error = %close_err, "failed to close warehouse connection after error");
                Err(e)
            }
        }
    }

    /// [`reset_schema`](Self::reset_schema), then close the connection.
    pub async fn run_schema_setup(mut self, catalog: &Catalog) -> Result<Vec<PhaseReport>, EtlError> {
        let result = self.reset_schema(catalog).await;
        self.finish(result).await
    }

    /// [`load_and_transform`](Self::load_and_transform), then close the connection.
    pub async fn run_etl(mut self, catalog: &Catalog) -> Result<Vec<PhaseReport>, EtlError> {
        let result = self.load_and_transform(catalog).await;
        self.finish(result).await
    }
}

fn log_phase_complete(report: &PhaseReport) {
    info!(
        "Phase '{}' complete: {} statements, {} rows, {:.1}s",
        report.phase,
        report.statements.len(),
        report.total_rows(),
        report.elapsed().as_secs_f64()
    );
}
