//! Consolidated CSV report.
//!
//! Rows are rendered into a single Arrow [`RecordBatch`] against
//! [`report::report_schema`] and serialized with the Arrow CSV writer. Undefined
//! metrics and missing decisions are nulls, which the writer emits as empty
//! fields. Row order is exactly the order of the input slice.

use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Decimal128Array, StringArray};
use arrow::csv::WriterBuilder;
use arrow::record_batch::RecordBatch;
use kyp_core::{BatchResult, DISPLAY_SCALE, Metrics, Ratio, report};
use tracing::info;

use crate::StoreError;

/// Render results into one report batch, preserving their order.
pub fn render_report(results: &[BatchResult]) -> Result<RecordBatch, StoreError> {
    let company_id = StringArray::from_iter_values(results.iter().map(|r| r.company_id.as_str()));
    let current_ratio = metric_column(results, |m| m.current_ratio)?;
    let net_margin = metric_column(results, |m| m.net_margin)?;
    let revenue_growth = metric_column(results, |m| m.revenue_growth)?;
    let decision: StringArray = results
        .iter()
        .map(|r| r.decision().map(|d| d.as_str()))
        .collect();
    let rationale = StringArray::from_iter_values(results.iter().map(|r| r.rationale()));
    let status = StringArray::from_iter_values(results.iter().map(|r| r.status().as_str()));

    let columns: Vec<ArrayRef> = vec![
        Arc::new(company_id),
        Arc::new(current_ratio),
        Arc::new(net_margin),
        Arc::new(revenue_growth),
        Arc::new(decision),
        Arc::new(rationale),
        Arc::new(status),
    ];

    Ok(RecordBatch::try_new(
        Arc::new(report::report_schema()),
        columns,
    )?)
}

fn metric_column(
    results: &[BatchResult],
    pick: impl Fn(&Metrics) -> Ratio,
) -> Result<Decimal128Array, StoreError> {
    let values: Vec<Option<i128>> = results
        .iter()
        .map(|r| {
            r.metrics
                .as_ref()
                .and_then(|m| pick(m).fixed_point(DISPLAY_SCALE))
        })
        .collect();

    Ok(Decimal128Array::from(values)
        .with_precision_and_scale(report::METRIC_PRECISION, DISPLAY_SCALE as i8)?)
}

/// Write the report to `path`, replacing any existing file.
///
/// The CSV is written to a temporary file beside `path` and renamed into
/// place, so the destination never holds a partial report. Missing parent
/// directories are created.
pub fn write_report(path: &Path, results: &[BatchResult]) -> Result<(), StoreError> {
    let write_err = |source| StoreError::OutputWrite {
        path: path.to_path_buf(),
        source,
    };

    let batch = render_report(results)?;

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(write_err)?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(write_err)?;
    {
        let mut writer = WriterBuilder::new()
            .with_header(true)
            .build(tmp.as_file_mut());
        writer.write(&batch)?;
    }
    tmp.persist(path).map_err(|e| write_err(e.error))?;

    info!(path = %path.display(), rows = batch.num_rows(), "wrote consolidated report");
    Ok(())
}
