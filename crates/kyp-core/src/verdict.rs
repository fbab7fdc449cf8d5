//! The closed decision set and the verdict produced by risk classification.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Credit decision. Any label outside this set is a classification error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    Approve,
    Deny,
    DenyWithCollateral,
}

impl Decision {
    pub const ALL: [Decision; 3] = [Self::Approve, Self::Deny, Self::DenyWithCollateral];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approve => "APPROVE",
            Self::Deny => "DENY",
            Self::DenyWithCollateral => "DENY_WITH_COLLATERAL",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognised decision label {0:?}")]
pub struct UnknownDecision(pub String);

impl FromStr for Decision {
    type Err = UnknownDecision;

    /// Case-insensitive, surrounding whitespace ignored. No aliases.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == label)
            .ok_or_else(|| UnknownDecision(s.to_string()))
    }
}

/// AI-derived risk judgment for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationVerdict {
    pub decision: Decision,
    pub rationale: String,
    /// Whether the verdict accounted for industry norms.
    pub sector_context: bool,
    /// 0 (safe) to 100 (extreme risk).
    pub risk_score: u8,
    pub summary: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_closed_set() {
        assert_eq!("APPROVE".parse::<Decision>(), Ok(Decision::Approve));
        assert_eq!("DENY".parse::<Decision>(), Ok(Decision::Deny));
        assert_eq!(
            "DENY_WITH_COLLATERAL".parse::<Decision>(),
            Ok(Decision::DenyWithCollateral)
        );
    }

    #[test]
    fn parse_ignores_case_and_padding() {
        assert_eq!(" approve\n".parse::<Decision>(), Ok(Decision::Approve));
        assert_eq!(
            "Deny_With_Collateral".parse::<Decision>(),
            Ok(Decision::DenyWithCollateral)
        );
    }

    #[test]
    fn rejects_labels_outside_the_set() {
        for label in ["WITH_CONDITIONS", "MAYBE", "", "DENY WITH COLLATERAL", "APPROVED"] {
            let err = label.parse::<Decision>().unwrap_err();
            assert_eq!(err.0, label);
        }
    }

    #[test]
    fn display_matches_label() {
        for d in Decision::ALL {
            assert_eq!(d.to_string().parse::<Decision>(), Ok(d));
        }
    }
}
