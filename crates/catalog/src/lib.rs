//! Named SQL statements for the songplay star schema.
//!
//! The [`Catalog`] holds four ordered phases (drop, create, copy, insert).
//! Only the copy phase depends on configuration; it is rendered once in
//! [`Catalog::build`] and the catalog is then handed to the runners.

pub mod catalog;
pub mod copy;
pub mod error;
pub mod schema;
pub mod statement;
pub mod transform;

pub use catalog::Catalog;
pub use copy::quote_literal;
pub use error::CatalogError;
pub use schema::{TableDef, TABLES};
pub use statement::{Phase, Statement};
