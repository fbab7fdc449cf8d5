//! Batch pipeline: discover statements → metrics → classification → report.
//!
//! Records are classified through a bounded pool of concurrent requests.
//! Completion order is arbitrary; each finished row is slotted back by its
//! discovery index, so the report always follows discovery order. Per-record
//! failures become rows. Only input discovery and report writing abort a run.
//!
//! Statement files are read on tokio's blocking pool, one at a time, as the
//! concurrency window asks for the next record.

use std::path::{Path, PathBuf};
use std::pin::pin;
use std::time::Instant;

use anyhow::Context;
use futures::{Stream, StreamExt};
use kyp_ai::RiskClassifier;
use kyp_core::{BatchResult, BatchSummary, compute_metrics};
use kyp_store::{Ingested, Ingestor, StoreError, write_report};
use tracing::{info, warn};

pub struct RunStats {
    pub output: PathBuf,
    pub summary: BatchSummary,
    pub elapsed_secs: f64,
}

/// Run the full batch and write the report to `output`.
pub async fn run_pipeline(
    input: &Path,
    output: &Path,
    classifier: &RiskClassifier,
    concurrency: usize,
) -> anyhow::Result<RunStats> {
    let start = Instant::now();

    let results = analyze_batch(input, classifier, concurrency)
        .await
        .with_context(|| format!("reading statements from {}", input.display()))?;

    write_report(output, &results)
        .with_context(|| format!("writing report to {}", output.display()))?;

    let summary = BatchSummary::from_results(&results);
    let elapsed_secs = start.elapsed().as_secs_f64();
    info!(
        total = summary.total,
        succeeded = summary.succeeded,
        parse_errors = summary.parse_errors,
        classify_errors = summary.classify_errors,
        approvals = summary.approvals,
        elapsed_ms = (elapsed_secs * 1000.0) as u64,
        "batch complete"
    );

    Ok(RunStats {
        output: output.to_path_buf(),
        summary,
        elapsed_secs,
    })
}

/// Produce exactly one [`BatchResult`] per discovered file, in discovery order.
pub async fn analyze_batch(
    input: &Path,
    classifier: &RiskClassifier,
    concurrency: usize,
) -> Result<Vec<BatchResult>, StoreError> {
    let ingestor = Ingestor::discover(input)?;
    let total = ingestor.len();
    let mut slots: Vec<Option<BatchResult>> = vec![None; total];

    let mut in_flight = pin!(
        read_off_runtime(ingestor)
            .map(|item| process_one(classifier, item))
            .buffer_unordered(concurrency.max(1))
    );

    let mut done = 0usize;
    while let Some((index, result)) = in_flight.next().await {
        debug_assert!(slots[index].is_none(), "row {index} produced twice");
        slots[index] = Some(result);
        done += 1;
        eprint!("\r  Analyzed {done}/{total}");
    }
    if total > 0 {
        eprintln!();
    }

    Ok(slots.into_iter().flatten().collect())
}

/// Drive the ingestor from the blocking pool so file reads never stall a
/// runtime worker.
fn read_off_runtime(ingestor: Ingestor) -> impl Stream<Item = Ingested> {
    futures::stream::unfold(ingestor, |mut ingestor| async move {
        let step = tokio::task::spawn_blocking(move || {
            let item = ingestor.next();
            (item, ingestor)
        })
        .await;
        match step {
            Ok((Some(item), ingestor)) => Some((item, ingestor)),
            Ok((None, _)) => None,
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(e) => {
                warn!(error = %e, "statement reader cancelled");
                None
            }
        }
    })
}

async fn process_one(classifier: &RiskClassifier, item: Ingested) -> (usize, BatchResult) {
    let Ingested {
        index,
        source,
        record,
    } = item;

    let record = match record {
        Ok(record) => record,
        Err(e) => return (index, BatchResult::parse_failed(source, e.to_string())),
    };

    let metrics = compute_metrics(&record);
    let result = match classifier.classify(&record, &metrics).await {
        Ok(verdict) => {
            info!(
                file = %source,
                company = %record.company_id,
                decision = %verdict.decision,
                risk_score = verdict.risk_score,
                sector_context = verdict.sector_context,
                summary = verdict.summary.as_deref().unwrap_or(""),
                "classified"
            );
            BatchResult::classified(&record, metrics, verdict)
        }
        Err(e) => {
            warn!(file = %source, company = %record.company_id, error = %e, "classification failed");
            BatchResult::classify_failed(&record, metrics, e.to_string())
        }
    };
    (index, result)
}
