//! Deterministic solvency and efficiency indicators.
//!
//! Every quotient is computed with exact decimal arithmetic. A zero divisor,
//! or an intermediate that overflows `Decimal`, yields [`Ratio::Undefined`]
//! rather than a panic, an infinity, or a silent zero. Nothing is rounded here; the
//! prompt and the report round at presentation time via [`Ratio::rounded`].

use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::statement::StatementRecord;

/// Decimal places used wherever a ratio is rendered.
pub const DISPLAY_SCALE: u32 = 4;

/// A quotient that is either a finite decimal or explicitly undefined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ratio {
    Value(Decimal),
    Undefined,
}

impl Ratio {
    /// `numerator / denominator`, undefined when the divisor is zero.
    pub fn of(numerator: Decimal, denominator: Decimal) -> Self {
        match numerator.checked_div(denominator) {
            Some(v) => Self::Value(v),
            None => Self::Undefined,
        }
    }

    pub fn value(&self) -> Option<Decimal> {
        match self {
            Self::Value(v) => Some(*v),
            Self::Undefined => None,
        }
    }

    pub fn is_defined(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    /// The value rounded half away from zero and rescaled to `scale` places.
    ///
    /// Values with more than `28 - scale` integer digits cannot carry every
    /// trailing zero in a `Decimal` and come back at a smaller scale. Use
    /// [`Ratio::fixed_point`] where the scale must be exact.
    pub fn rounded(&self, scale: u32) -> Option<Decimal> {
        self.value().map(|v| {
            let mut r = v.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero);
            r.rescale(scale);
            r
        })
    }

    /// The rounded value as an integer count of `10^-scale` units.
    ///
    /// A `Decimal` mantissa is below 2^96, so for `scale <= 9` the widened
    /// result always fits in an `i128` and in 38 decimal digits.
    pub fn fixed_point(&self, scale: u32) -> Option<i128> {
        let r = self.rounded(scale)?;
        let shift = scale.saturating_sub(r.scale());
        Some(r.mantissa() * 10i128.pow(shift))
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.rounded(DISPLAY_SCALE) {
            Some(v) => write!(f, "{v}"),
            None => f.write_str("undefined"),
        }
    }
}

/// Derived indicators for one [`StatementRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metrics {
    /// current assets / current liabilities
    pub current_ratio: Ratio,
    /// net income / revenue, as a fraction
    pub net_margin: Ratio,
    /// (revenue - prior revenue) / prior revenue, as a fraction
    pub revenue_growth: Ratio,
}

/// Compute [`Metrics`] for a record. Pure: no I/O, never fails.
pub fn compute_metrics(record: &StatementRecord) -> Metrics {
    let revenue_growth = match record.prior_revenue {
        Some(prior) => match record.revenue.checked_sub(prior) {
            Some(delta) => Ratio::of(delta, prior),
            None => Ratio::Undefined,
        },
        None => Ratio::Undefined,
    };

    Metrics {
        current_ratio: Ratio::of(record.current_assets, record.current_liabilities),
        net_margin: Ratio::of(record.net_income, record.revenue),
        revenue_growth,
    }
}
