//! Prompt templates for risk classification.
//!
//! Every number in the user prompt is taken from the statement or from the
//! pre-computed [`Metrics`]; the model is told to interpret them, never to
//! recompute them.

use kyp_core::{Decision, Metrics, Ratio, StatementRecord};
use rust_decimal::{Decimal, RoundingStrategy};

pub const SYSTEM_PROMPT: &str = "\
You are a senior credit analyst performing Know-Your-Partner (KYP) screening of business counterparties.

You receive one company's financial facts and indicators. The indicators are exact and already \
computed. Do NOT recalculate them; interpret them.

Risk guidelines:
1. A current ratio of 1.5 or more together with a healthy positive net margin supports APPROVE.
2. A current ratio below 1.0 signals short-term insolvency risk even if revenue is growing: \
answer DENY or DENY_WITH_COLLATERAL.
3. An operating loss (negative net margin) combined with a current ratio below 1.0 calls for DENY.
4. Weigh the indicators against what is normal for the company's sector, and report whether you did.
5. An undefined indicator means its denominator was zero. Treat it as missing information, never as zero.
6. Prioritise the safety of the lending book over volume.

Respond ONLY with a JSON object. No markdown fences, no explanation, just raw JSON:
{
  \"decision\": \"APPROVE\" or \"DENY\" or \"DENY_WITH_COLLATERAL\",
  \"rationale\": \"technical justification for the decision, citing the indicators\",
  \"sector_context\": true if sector norms influenced the decision, otherwise false,
  \"risk_score\": integer from 0 (safe) to 100 (extreme risk),
  \"summary\": \"one-sentence executive summary of the company's situation\"
}";

/// Build the per-company user prompt.
pub fn build_user_prompt(record: &StatementRecord, metrics: &Metrics) -> String {
    let prior = record
        .prior_revenue
        .map(|v| v.to_string())
        .unwrap_or_else(|| "not reported".to_string());

    format!(
        "Company: {company}\n\
         Sector: {sector}\n\
         \n\
         Financial facts (current period):\n\
         - Current assets: {assets}\n\
         - Current liabilities: {liabilities}\n\
         - Revenue: {revenue}\n\
         - Net income: {income}\n\
         - Prior-period revenue: {prior}\n\
         \n\
         Indicators (exact, already computed):\n\
         - Current ratio: {current_ratio}\n\
         - Net margin: {net_margin}\n\
         - Revenue growth: {revenue_growth}\n\
         \n\
         Allowed decisions: {decisions}",
        company = record.company_id,
        sector = record.sector,
        assets = record.current_assets,
        liabilities = record.current_liabilities,
        revenue = record.revenue,
        income = record.net_income,
        current_ratio = describe(metrics.current_ratio, "current liabilities are zero", false),
        net_margin = describe(metrics.net_margin, "revenue is zero", true),
        revenue_growth = describe(
            metrics.revenue_growth,
            if record.prior_revenue.is_some() {
                "prior-period revenue is zero"
            } else {
                "prior-period revenue not reported"
            },
            true,
        ),
        decisions = Decision::ALL.map(|d| d.as_str()).join(", "),
    )
}

fn describe(ratio: Ratio, undefined_reason: &str, as_percent: bool) -> String {
    match (ratio, as_percent) {
        (Ratio::Undefined, _) => format!("undefined ({undefined_reason})"),
        (Ratio::Value(v), true) => match percent(v) {
            Some(p) => format!("{ratio} ({p}%)"),
            None => ratio.to_string(),
        },
        (Ratio::Value(_), false) => ratio.to_string(),
    }
}

fn percent(v: Decimal) -> Option<Decimal> {
    let mut p = v
        .checked_mul(Decimal::ONE_HUNDRED)?
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    p.rescale(2);
    Some(p)
}
