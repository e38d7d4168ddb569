//! Shared plumbing for the `create-tables` and `etl` binaries.

pub mod cli;

pub use cli::CommonArgs;

use dwh_etl::PhaseReport;
use tracing::info;

/// Install the fmt subscriber. Logs go to stderr so `--verbose` statement
/// echo on stdout stays clean. `RUST_LOG` overrides the default `info`.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// One summary line per phase.
pub fn log_reports(reports: &[PhaseReport]) {
    for report in reports {
        info!(
            phase = %report.phase,
            statements = report.statements.len(),
            rows = report.total_rows(),
            elapsed_s = report.elapsed().as_secs_f64(),
            "phase summary"
        );
    }
}
