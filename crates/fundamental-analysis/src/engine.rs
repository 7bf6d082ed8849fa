use analysis_core::{
    ClosePriceSource, NoHistory, NormalizationError, RawFundamentals, Snapshot, Verdict,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::assessment::{assess_cash, data_warnings, scrap_test, CashAssessment, ScrapTest};
use crate::classifier::VerdictClassifier;
use crate::normalizer;
use crate::thresholds::VerdictThresholds;

/// Verdict plus the figures behind it, as handed to a presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForensicReport {
    #[serde(flatten)]
    pub verdict: Verdict,
    pub snapshot: Snapshot,
    pub cash_cushion: CashAssessment,
    pub scrap_test: ScrapTest,
    pub warnings: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

/// Normalize-then-classify pipeline. Stateless apart from its thresholds, so
/// one instance can serve concurrent requests.
pub struct ForensicEngine {
    classifier: VerdictClassifier,
}

impl ForensicEngine {
    pub fn new() -> Self {
        Self {
            classifier: VerdictClassifier::new(),
        }
    }

    pub fn with_thresholds(thresholds: VerdictThresholds) -> Self {
        Self {
            classifier: VerdictClassifier::with_thresholds(thresholds),
        }
    }

    pub fn thresholds(&self) -> &VerdictThresholds {
        self.classifier.thresholds()
    }

    pub fn analyze(&self, raw: &RawFundamentals) -> Result<ForensicReport, NormalizationError> {
        self.analyze_with_fallback(raw, &NoHistory)
    }

    pub fn analyze_with_fallback<H: ClosePriceSource + ?Sized>(
        &self,
        raw: &RawFundamentals,
        history: &H,
    ) -> Result<ForensicReport, NormalizationError> {
        let snapshot = normalizer::normalize_with_fallback(raw, history)?;
        Ok(self.report(snapshot))
    }

    pub fn analyze_value(
        &self,
        value: &serde_json::Value,
    ) -> Result<ForensicReport, NormalizationError> {
        let snapshot = normalizer::normalize_value(value)?;
        Ok(self.report(snapshot))
    }

    pub fn report(&self, snapshot: Snapshot) -> ForensicReport {
        let verdict = self.classifier.classify(&snapshot);
        tracing::info!(
            "{} verdict: {} ({})",
            snapshot.symbol,
            verdict.label.to_label(),
            verdict.rationale
        );

        ForensicReport {
            cash_cushion: assess_cash(&snapshot),
            scrap_test: scrap_test(&snapshot),
            warnings: data_warnings(&snapshot),
            verdict,
            snapshot,
            generated_at: Utc::now(),
        }
    }
}

impl Default for ForensicEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::{Severity, VerdictLabel};

    #[test]
    fn test_report_json_shape() {
        let engine = ForensicEngine::new();
        let report = engine
            .analyze_value(&serde_json::json!({
                "symbol": "acme",
                "currentPrice": 100.0,
                "marketCap": 1_000_000_000.0,
                "totalCash": 400_000_000.0,
                "totalDebt": 50_000_000.0,
                "forwardPE": 10.0,
                "revenueGrowth": 0.2,
                "pegRatio": 1.0
            }))
            .unwrap();

        assert_eq!(report.verdict.label, VerdictLabel::ScrapElite);
        assert_eq!(report.verdict.severity, Severity::Positive);
        assert!(report.scrap_test.passed);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["label"], "SCRAP_ELITE");
        assert_eq!(json["severity"], "positive");
        assert_eq!(json["triggered_rule"], "scrap_elite");
        assert!(json["rationale"].is_string());
        assert_eq!(json["snapshot"]["symbol"], "ACME");
        assert_eq!(json["snapshot"]["enterprise_value"], 650_000_000.0);
        assert_eq!(json["cash_cushion"]["cushion"], "fortress");
        assert!(json.get("cash").is_none());
    }

    #[test]
    fn test_price_unavailable_stops_pipeline() {
        let engine = ForensicEngine::new();
        let raw = RawFundamentals {
            symbol: "NOPX".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            engine.analyze(&raw),
            Err(NormalizationError::PriceUnavailable { .. })
        ));

        let history = |_: &str| Some(3.25);
        let report = engine.analyze_with_fallback(&raw, &history).unwrap();
        assert_eq!(report.snapshot.price, 3.25);
        assert!(report.warnings.iter().any(|w| w.contains("historical close")));
    }
}
