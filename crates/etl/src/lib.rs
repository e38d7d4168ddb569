//! Runs the catalog's statements against the warehouse.
//!
//! [`Runner`] executes one phase at a time over a single [`Warehouse`]
//! connection, committing after every statement. [`session`] wires config,
//! catalog and a live [`PgWarehouse`] together for the two entry points.

pub mod echo;
pub mod error;
pub mod runner;
pub mod session;
pub mod warehouse;

pub use error::EtlError;
pub use runner::{PhaseReport, Runner, StatementReport};
pub use session::{create_tables, etl};
pub use warehouse::{PgWarehouse, Warehouse};
