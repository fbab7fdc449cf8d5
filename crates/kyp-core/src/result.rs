//! Per-record outcome carried through the pipeline, and the batch roll-up.

use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::metrics::Metrics;
use crate::statement::StatementRecord;
use crate::verdict::{ClassificationVerdict, Decision};

/// Processing status of one report row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordStatus {
    Success,
    ParseError,
    ClassifyError,
}

impl RecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::ParseError => "PARSE_ERROR",
            Self::ClassifyError => "CLASSIFY_ERROR",
        }
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happened to one discovered input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Classified(ClassificationVerdict),
    /// The source file could not be read or did not match the schema.
    ParseFailed(String),
    /// Metrics were computed but the classifier gave no usable verdict.
    ClassifyFailed(String),
}

/// One report row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchResult {
    /// Company name, or the source file name when the file never parsed.
    pub company_id: String,
    /// Absent only for parse failures.
    pub metrics: Option<Metrics>,
    pub outcome: Outcome,
}

impl BatchResult {
    pub fn classified(record: &StatementRecord, metrics: Metrics, verdict: ClassificationVerdict) -> Self {
        Self {
            company_id: record.company_id.clone(),
            metrics: Some(metrics),
            outcome: Outcome::Classified(verdict),
        }
    }

    pub fn classify_failed(record: &StatementRecord, metrics: Metrics, cause: impl Into<String>) -> Self {
        Self {
            company_id: record.company_id.clone(),
            metrics: Some(metrics),
            outcome: Outcome::ClassifyFailed(cause.into()),
        }
    }

    /// A row for a file that never parsed, identified by its file name.
    pub fn parse_failed(source: impl Into<String>, cause: impl Into<String>) -> Self {
        Self {
            company_id: source.into(),
            metrics: None,
            outcome: Outcome::ParseFailed(cause.into()),
        }
    }

    pub fn status(&self) -> RecordStatus {
        match self.outcome {
            Outcome::Classified(_) => RecordStatus::Success,
            Outcome::ParseFailed(_) => RecordStatus::ParseError,
            Outcome::ClassifyFailed(_) => RecordStatus::ClassifyError,
        }
    }

    pub fn verdict(&self) -> Option<&ClassificationVerdict> {
        match &self.outcome {
            Outcome::Classified(v) => Some(v),
            _ => None,
        }
    }

    pub fn decision(&self) -> Option<Decision> {
        self.verdict().map(|v| v.decision)
    }

    /// Verdict rationale, or the failure cause for error rows.
    pub fn rationale(&self) -> &str {
        match &self.outcome {
            Outcome::Classified(v) => &v.rationale,
            Outcome::ParseFailed(cause) | Outcome::ClassifyFailed(cause) => cause,
        }
    }
}

/// Roll-up of a finished batch, shown after the report is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub parse_errors: usize,
    pub classify_errors: usize,
    pub approvals: usize,
    /// Approvals as a percentage of classified rows, one decimal place.
    pub approval_rate: Option<Decimal>,
    /// Mean risk score over classified rows, one decimal place.
    pub mean_risk_score: Option<Decimal>,
}

impl BatchSummary {
    pub fn from_results(results: &[BatchResult]) -> Self {
        let mut summary = Self {
            total: results.len(),
            succeeded: 0,
            parse_errors: 0,
            classify_errors: 0,
            approvals: 0,
            approval_rate: None,
            mean_risk_score: None,
        };
        let mut score_sum = 0u64;

        for r in results {
            match &r.outcome {
                Outcome::Classified(v) => {
                    summary.succeeded += 1;
                    score_sum += u64::from(v.risk_score);
                    if v.decision == Decision::Approve {
                        summary.approvals += 1;
                    }
                }
                Outcome::ParseFailed(_) => summary.parse_errors += 1,
                Outcome::ClassifyFailed(_) => summary.classify_errors += 1,
            }
        }

        if summary.succeeded > 0 {
            let classified = Decimal::from(summary.succeeded);
            summary.approval_rate = Some(round1(
                Decimal::from(summary.approvals) * Decimal::ONE_HUNDRED / classified,
            ));
            summary.mean_risk_score = Some(round1(Decimal::from(score_sum) / classified));
        }

        summary
    }
}

fn round1(v: Decimal) -> Decimal {
    v.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rows: {} ok, {} parse errors, {} classify errors",
            self.total, self.succeeded, self.parse_errors, self.classify_errors
        )?;
        if let (Some(rate), Some(score)) = (self.approval_rate, self.mean_risk_score) {
            write!(f, "; approval rate {rate}%, mean risk score {score}/100")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::compute_metrics;
    use rust_decimal_macros::dec;

    fn record(name: &str) -> StatementRecord {
        StatementRecord {
            company_id: name.into(),
            sector: "Retail".into(),
            current_assets: dec!(300),
            current_liabilities: dec!(150),
            revenue: dec!(200),
            net_income: dec!(50),
            prior_revenue: None,
        }
    }

    fn verdict(decision: Decision, risk_score: u8) -> ClassificationVerdict {
        ClassificationVerdict {
            decision,
            rationale: "liquid and profitable".into(),
            sector_context: true,
            risk_score,
            summary: None,
        }
    }

    #[test]
    fn status_follows_outcome() {
        let rec = record("a");
        let m = compute_metrics(&rec);
        let ok = BatchResult::classified(&rec, m, verdict(Decision::Approve, 10));
        let bad = BatchResult::classify_failed(&rec, m, "timeout");
        let corrupt = BatchResult::parse_failed("b.json", "invalid statement JSON");

        assert_eq!(ok.status(), RecordStatus::Success);
        assert_eq!(ok.decision(), Some(Decision::Approve));
        assert_eq!(bad.status(), RecordStatus::ClassifyError);
        assert_eq!(bad.rationale(), "timeout");
        assert!(bad.metrics.is_some());
        assert_eq!(corrupt.status(), RecordStatus::ParseError);
        assert_eq!(corrupt.company_id, "b.json");
        assert!(corrupt.metrics.is_none());
        assert_eq!(corrupt.decision(), None);
    }

    #[test]
    fn summary_counts_and_rates() {
        let rec = record("a");
        let m = compute_metrics(&rec);
        let results = vec![
            BatchResult::classified(&rec, m, verdict(Decision::Approve, 10)),
            BatchResult::classified(&rec, m, verdict(Decision::Deny, 90)),
            BatchResult::classified(&rec, m, verdict(Decision::DenyWithCollateral, 55)),
            BatchResult::parse_failed("4.json", "bad"),
            BatchResult::classify_failed(&rec, m, "timeout"),
        ];

        let s = BatchSummary::from_results(&results);
        assert_eq!(s.total, 5);
        assert_eq!(s.succeeded, 3);
        assert_eq!(s.parse_errors, 1);
        assert_eq!(s.classify_errors, 1);
        assert_eq!(s.approvals, 1);
        assert_eq!(s.approval_rate, Some(dec!(33.3)));
        assert_eq!(s.mean_risk_score, Some(dec!(51.7)));
        assert!(s.to_string().contains("approval rate 33.3%"));
    }

    #[test]
    fn empty_summary_has_no_rates() {
        let s = BatchSummary::from_results(&[]);
        assert_eq!(s.total, 0);
        assert_eq!(s.approval_rate, None);
        assert_eq!(s.to_string(), "0 rows: 0 ok, 0 parse errors, 0 classify errors");
    }
}
