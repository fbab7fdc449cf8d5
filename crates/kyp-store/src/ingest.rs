//! Statement discovery: one `.json` file per company in an input directory.
//!
//! [`Ingestor::discover`] lists the directory once, up front, and fails only if
//! the directory itself cannot be enumerated. Files are then read lazily, one
//! per [`Iterator::next`] call, in lexicographic file-name order. A file that
//! cannot be read or decoded yields an [`Ingested`] carrying a [`FileError`]
//! instead of stopping the iteration.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use kyp_core::{StatementError, StatementRecord};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::StoreError;

const EXTENSION: &str = "json";

/// Why a single discovered file produced no record.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("unreadable file: {0}")]
    Read(#[from] std::io::Error),

    #[error(transparent)]
    Statement(#[from] StatementError),
}

/// One discovered input file and what it decoded to.
#[derive(Debug)]
pub struct Ingested {
    /// Position in discovery order, starting at 0.
    pub index: usize,
    /// File name (no directory), used to identify rows that failed to parse.
    pub source: String,
    pub record: Result<StatementRecord, FileError>,
}

/// Single-pass iterator over the statements in one directory.
pub struct Ingestor {
    files: std::vec::IntoIter<PathBuf>,
    next_index: usize,
    seen_ids: HashSet<String>,
}

impl Ingestor {
    /// Enumerate `dir` for statement files.
    pub fn discover(dir: &Path) -> Result<Self, StoreError> {
        let discovery_err = |source| StoreError::InputDiscovery {
            path: dir.to_path_buf(),
            source,
        };

        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(discovery_err)? {
            let path = entry.map_err(discovery_err)?.path();
            let is_statement = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(EXTENSION));
            if is_statement && path.is_file() {
                files.push(path);
            }
        }
        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        info!(dir = %dir.display(), count = files.len(), "discovered statement files");
        Ok(Self {
            files: files.into_iter(),
            next_index: 0,
            seen_ids: HashSet::new(),
        })
    }

    fn read(path: &Path) -> Result<StatementRecord, FileError> {
        let text = std::fs::read_to_string(path)?;
        Ok(StatementRecord::from_json(&text)?)
    }
}

impl Iterator for Ingestor {
    type Item = Ingested;

    fn next(&mut self) -> Option<Ingested> {
        let path = self.files.next()?;
        let index = self.next_index;
        self.next_index += 1;

        let source = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let record = Self::read(&path);
        match &record {
            Ok(rec) => {
                debug!(file = %source, company = %rec.company_id, "parsed statement");
                if !self.seen_ids.insert(rec.company_id.clone()) {
                    warn!(file = %source, company = %rec.company_id, "duplicate company identifier in batch");
                }
            }
            Err(e) => warn!(file = %source, error = %e, "statement file rejected"),
        }

        Some(Ingested {
            index,
            source,
            record,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.files.size_hint()
    }
}

impl ExactSizeIterator for Ingestor {}
