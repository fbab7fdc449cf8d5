//! Canonical in-memory statement for one company and its JSON wire format.
//!
//! Source files nest the facts under `company_info` and `financials`:
//!
//! ```json
//! {
//!   "company_info": { "name": "Acme", "sector": "Retail" },
//!   "financials": {
//!     "current_year":  { "current_assets": 300, "current_liabilities": 150,
//!                        "revenue": 200, "net_income": 50 },
//!     "previous_year": { "revenue": 180 }
//!   }
//! }
//! ```

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StatementError {
    #[error("invalid statement JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("field `{0}` must not be blank")]
    Blank(&'static str),
}

/// One company's balance-sheet and income-statement facts for one period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementRecord {
    pub company_id: String,
    pub sector: String,
    pub current_assets: Decimal,
    pub current_liabilities: Decimal,
    pub revenue: Decimal,
    pub net_income: Decimal,
    /// Enables the revenue growth signal when present.
    pub prior_revenue: Option<Decimal>,
}

// ── Wire format ──

#[derive(Deserialize)]
struct StatementDoc {
    company_info: CompanyInfo,
    financials: Financials,
}

#[derive(Deserialize)]
struct CompanyInfo {
    name: String,
    sector: String,
}

#[derive(Deserialize)]
struct Financials {
    current_year: CurrentYear,
    #[serde(default)]
    previous_year: Option<PreviousYear>,
}

#[derive(Deserialize)]
struct CurrentYear {
    current_assets: Decimal,
    current_liabilities: Decimal,
    revenue: Decimal,
    net_income: Decimal,
}

#[derive(Deserialize)]
struct PreviousYear {
    #[serde(default)]
    revenue: Option<Decimal>,
}

impl StatementRecord {
    /// Decode and validate one statement document.
    pub fn from_json(text: &str) -> Result<Self, StatementError> {
        let doc: StatementDoc = serde_json::from_str(text)?;

        let company_id = doc.company_info.name.trim().to_string();
        if company_id.is_empty() {
            return Err(StatementError::Blank("company_info.name"));
        }
        let sector = doc.company_info.sector.trim().to_string();
        if sector.is_empty() {
            return Err(StatementError::Blank("company_info.sector"));
        }

        let current = doc.financials.current_year;
        Ok(Self {
            company_id,
            sector,
            current_assets: current.current_assets,
            current_liabilities: current.current_liabilities,
            revenue: current.revenue,
            net_income: current.net_income,
            prior_revenue: doc.financials.previous_year.and_then(|p| p.revenue),
        })
    }
}
