//! Risk classification: prompt a [`TextGenerator`] with pre-computed facts and
//! parse its reply strictly into a [`ClassificationVerdict`].
//!
//! The reply is untrusted text. Only a JSON object whose `decision` is one of
//! the closed [`Decision`] labels, with a non-empty rationale and a risk score
//! in 0..=100, becomes a verdict; anything else is [`AiError::InvalidVerdict`].

use std::sync::Arc;
use std::time::{Duration, Instant};

use kyp_core::{ClassificationVerdict, Decision, Metrics, StatementRecord};
use serde::Deserialize;
use tracing::debug;

use crate::AiError;
use crate::generator::{GenerateRequest, TextGenerator};
use crate::prompt::{SYSTEM_PROMPT, build_user_prompt};

const DEFAULT_MAX_TOKENS: u32 = 1024;
const MAX_RISK_SCORE: i64 = 100;

/// Classifies one statement at a time against a shared generator.
#[derive(Clone)]
pub struct RiskClassifier {
    generator: Arc<dyn TextGenerator>,
    timeout: Duration,
    max_tokens: u32,
}

impl RiskClassifier {
    pub fn new(generator: Arc<dyn TextGenerator>, timeout: Duration) -> Self {
        Self {
            generator,
            timeout,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// The request sent for a record. Temperature 0 for repeatable verdicts.
    pub fn build_request(&self, record: &StatementRecord, metrics: &Metrics) -> GenerateRequest {
        GenerateRequest {
            system_prompt: Some(SYSTEM_PROMPT.to_string()),
            user_prompt: build_user_prompt(record, metrics),
            max_tokens: self.max_tokens,
            temperature: 0.0,
        }
    }

    /// Ask the generator for a verdict, bounded by the configured timeout.
    pub async fn classify(
        &self,
        record: &StatementRecord,
        metrics: &Metrics,
    ) -> Result<ClassificationVerdict, AiError> {
        let request = self.build_request(record, metrics);
        let start = Instant::now();

        let response = tokio::time::timeout(self.timeout, self.generator.generate(&request))
            .await
            .map_err(|_| AiError::Timeout(self.timeout))??;

        debug!(
            company = %record.company_id,
            tokens = response.tokens_used,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "classifier replied"
        );
        parse_verdict(&response.text)
    }
}

#[derive(Deserialize)]
struct VerdictReply {
    decision: String,
    rationale: String,
    sector_context: bool,
    risk_score: i64,
    #[serde(default)]
    summary: Option<String>,
}

/// Strictly parse a classifier reply.
///
/// Surrounding prose or markdown fences are tolerated: the outermost `{...}`
/// span is cut out and must decode as the verdict object.
pub fn parse_verdict(text: &str) -> Result<ClassificationVerdict, AiError> {
    let json = extract_object(text).ok_or_else(|| {
        AiError::InvalidVerdict(format!("no JSON object in reply: {:?}", truncate(text, 200)))
    })?;
    let reply: VerdictReply = serde_json::from_str(json)?;

    let decision: Decision = reply
        .decision
        .parse()
        .map_err(|e| AiError::InvalidVerdict(format!("{e}")))?;

    let rationale = reply.rationale.trim();
    if rationale.is_empty() {
        return Err(AiError::InvalidVerdict("empty rationale".into()));
    }

    if !(0..=MAX_RISK_SCORE).contains(&reply.risk_score) {
        return Err(AiError::InvalidVerdict(format!(
            "risk_score {} outside 0..={MAX_RISK_SCORE}",
            reply.risk_score
        )));
    }

    Ok(ClassificationVerdict {
        decision,
        rationale: rationale.to_string(),
        sector_context: reply.sector_context,
        risk_score: reply.risk_score as u8,
        summary: reply
            .summary
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
    })
}

fn extract_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
