//! Storage layer: statement discovery and parsing (input), consolidated CSV report (output).

mod error;
pub use error::StoreError;

pub mod ingest;
pub use ingest::{FileError, Ingested, Ingestor};

pub mod report;
pub use report::{render_report, write_report};
