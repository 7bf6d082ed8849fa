//! Forensic valuation engine
//!
//! Normalizes a provider's fundamentals record into a typed `Snapshot` and
//! runs it through an ordered verdict cascade (KILL SWITCH, SCRAP ELITE,
//! QUALITY COMPOUNDER, ASSET PLAY, HOLD / WATCH).

pub mod assessment;
pub mod classifier;
pub mod engine;
pub mod normalizer;
pub mod thresholds;

pub use assessment::{
    assess_cash, data_warnings, scrap_test, CashAssessment, CashCushion, ScrapTest,
};
pub use classifier::{classify, VerdictClassifier};
pub use engine::{ForensicEngine, ForensicReport};
pub use normalizer::{normalize, normalize_value, normalize_with_fallback};
pub use thresholds::VerdictThresholds;
