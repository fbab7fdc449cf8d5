use std::path::PathBuf;

use thiserror::Error;

/// Batch-wide storage failures. Either one aborts the run.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cannot enumerate input directory {path}: {source}")]
    InputDiscovery {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot write report to {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
}
