//! Core types for KYP batch credit analysis: statements, metrics, verdicts, report rows.

pub mod metrics;
pub mod result;
pub mod schema;
pub mod statement;
pub mod verdict;

pub use metrics::{DISPLAY_SCALE, Metrics, Ratio, compute_metrics};
pub use result::{BatchResult, BatchSummary, Outcome, RecordStatus};
pub use schema::report;
pub use statement::{StatementError, StatementRecord};
pub use verdict::{ClassificationVerdict, Decision, UnknownDecision};
