//! Observability for slabdb.
//!
//! Structured JSON logging only: one line per event, synchronous, no
//! buffering. There is no metrics or tracing layer.

pub mod logger;

pub use logger::Level;
