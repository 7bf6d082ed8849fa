//! Secondary assessments shown next to the verdict.

use analysis_core::{PriceSource, Severity, Snapshot};
use serde::{Deserialize, Serialize};

/// Forward P/E below this passes the scrap test.
pub const SCRAP_TEST_MAX_FORWARD_PE: f64 = 12.0;

const FORTRESS_CASH_PCT: f64 = 30.0;
const STABLE_CASH_PCT: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CashCushion {
    Fortress,
    Stable,
    Thin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashAssessment {
    pub cushion: CashCushion,
    pub severity: Severity,
    pub cash_percent: f64,
    /// The percentage is a currency-corrected estimate.
    pub estimated: bool,
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapTest {
    pub passed: bool,
    pub forward_pe: f64,
    pub note: String,
}

pub fn assess_cash(s: &Snapshot) -> CashAssessment {
    let pct = s.cash_percent_adjusted;
    let (cushion, severity, note) = if pct > FORTRESS_CASH_PCT {
        let note = if s.currency_mismatch {
            format!(
                "Even after currency correction cash is ~{:.1}% of market cap",
                pct
            )
        } else {
            format!("Cash is {:.1}% of market cap", pct)
        };
        (CashCushion::Fortress, Severity::Positive, note)
    } else if pct > STABLE_CASH_PCT {
        (
            CashCushion::Stable,
            Severity::Neutral,
            "Balance sheet is stable".to_string(),
        )
    } else {
        (
            CashCushion::Thin,
            Severity::Warning,
            "Cash level is low".to_string(),
        )
    };

    CashAssessment {
        cushion,
        severity,
        cash_percent: pct,
        estimated: s.currency_mismatch,
        note,
    }
}

pub fn scrap_test(s: &Snapshot) -> ScrapTest {
    let passed = s.forward_pe < SCRAP_TEST_MAX_FORWARD_PE;
    let note = if passed {
        format!("Priced as scrap at {:.2}x forward earnings", s.forward_pe)
    } else {
        format!("Not cheap enough at {:.2}x forward earnings", s.forward_pe)
    };
    ScrapTest {
        passed,
        forward_pe: s.forward_pe,
        note,
    }
}

/// Caveats about how trustworthy the snapshot figures are.
pub fn data_warnings(s: &Snapshot) -> Vec<String> {
    let mut warnings = Vec::new();

    if s.currency_mismatch {
        warnings.push(format!(
            "Raw cash is {:.0}% of market cap, which is impossible; cash looks reported \
             in another currency. Corrected estimate ~{:.1}%",
            s.cash_percent_raw, s.cash_percent_adjusted
        ));
    }
    if s.ebitda_defaulted {
        warnings.push("EBITDA unavailable; leverage is not meaningful".to_string());
    }
    if s.peg.is_none() {
        warnings.push("No PEG estimate from provider".to_string());
    }
    if s.price_source == PriceSource::HistoryFallback {
        warnings.push("Price taken from the last historical close".to_string());
    }

    warnings
}
