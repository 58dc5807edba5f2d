//! slabdb - a single-node, schema-validated JSON document store with a
//! fixed-slot storage engine.

pub mod api;
pub mod cli;
pub mod config;
pub mod index;
pub mod observability;
pub mod query;
pub mod schema;
pub mod server;
pub mod store;
pub mod table;

pub use config::Config;
pub use table::{Catalog, Table};
