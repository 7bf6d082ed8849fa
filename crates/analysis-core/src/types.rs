use serde::{Deserialize, Serialize};

/// Quote/fundamentals record as delivered by the market-data provider.
///
/// Every numeric field may be absent or `null`. Field names follow the
/// provider's camelCase keys.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFundamentals {
    pub symbol: String,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub regular_market_price: Option<f64>,
    /// Close from a 1-day history lookup, when the collaborator fetched one up front.
    #[serde(default)]
    pub last_close: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub total_cash: Option<f64>,
    #[serde(default)]
    pub total_debt: Option<f64>,
    #[serde(default)]
    pub total_cash_per_share: Option<f64>,
    #[serde(default, rename = "forwardPE")]
    pub forward_pe: Option<f64>,
    #[serde(default)]
    pub peg_ratio: Option<f64>,
    #[serde(default, rename = "priceToSalesTrailing12Months")]
    pub price_to_sales_trailing_12_months: Option<f64>,
    /// Fraction, e.g. 0.12 for 12%.
    #[serde(default)]
    pub revenue_growth: Option<f64>,
    /// Fraction, e.g. 0.18 for 18%.
    #[serde(default)]
    pub return_on_equity: Option<f64>,
    #[serde(default)]
    pub ebitda: Option<f64>,
    #[serde(default)]
    pub shares_outstanding: Option<f64>,
    #[serde(default)]
    pub news: Vec<RawNewsItem>,
    #[serde(default)]
    pub revenue_history: Vec<RawRevenuePoint>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawNewsItem {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub publisher: Option<String>,
}

/// One column of the provider's annual revenue table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRevenuePoint {
    /// Period end, usually `YYYY-MM-DD`.
    pub date: String,
    #[serde(default)]
    pub value: Option<f64>,
}

/// Which resolution step produced `Snapshot::price`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceSource {
    CurrentPrice,
    RegularMarketPrice,
    LastClose,
    HistoryFallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub link: String,
    pub publisher: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenuePoint {
    pub year: i32,
    pub value: f64,
}

/// Strictly-typed view of one ticker, built once per request by the normalizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub symbol: String,
    pub price: f64,
    pub price_source: PriceSource,
    pub market_cap: f64,
    pub cash: f64,
    pub debt: f64,
    pub cash_per_share: f64,
    pub shares_outstanding: f64,
    pub cash_percent_raw: f64,
    /// Raw cash% above 100, most likely cash reported in another currency.
    pub currency_mismatch: bool,
    pub cash_percent_adjusted: f64,
    pub enterprise_value: f64,
    pub forward_pe: f64,
    pub price_to_sales: f64,
    pub revenue_growth_pct: f64,
    pub ebitda: f64,
    /// True when the provider had no usable EBITDA and the division guard of 1 was used.
    pub ebitda_defaulted: bool,
    pub leverage: f64,
    pub peg: Option<f64>,
    pub return_on_equity_pct: f64,
    pub news: Vec<NewsItem>,
    /// Chronological ascending, at most four entries.
    pub revenue_history: Vec<RevenuePoint>,
}

impl Snapshot {
    /// Leverage is only trusted when the provider reported a positive EBITDA.
    pub fn leverage_is_meaningful(&self) -> bool {
        !self.ebitda_defaulted && self.ebitda > 0.0
    }

    pub fn debt_to_cash(&self) -> Option<f64> {
        if self.cash > 0.0 {
            Some(self.debt / self.cash)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerdictLabel {
    KillSwitch,
    AssetPlay,
    ScrapElite,
    QualityCompounder,
    HoldWatch,
}

impl VerdictLabel {
    /// Display name as shown on the dashboard
    pub fn to_label(&self) -> &'static str {
        match self {
            VerdictLabel::KillSwitch => "KILL SWITCH",
            VerdictLabel::AssetPlay => "ASSET PLAY",
            VerdictLabel::ScrapElite => "SCRAP ELITE",
            VerdictLabel::QualityCompounder => "QUALITY COMPOUNDER",
            VerdictLabel::HoldWatch => "HOLD / WATCH",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    Positive,
    Neutral,
}

impl Severity {
    pub fn color(&self) -> &'static str {
        match self {
            Severity::Critical => "#ff2b2b",
            Severity::Warning => "#ffd700",
            Severity::Positive => "#00ff00",
            Severity::Neutral => "#b0b0b0",
        }
    }
}

/// Cascade branch that produced a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggeredRule {
    DebtRisk,
    GrowthRisk,
    ScrapElite,
    QualityCompounder,
    AssetPlay,
    NoCriteriaMet,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub label: VerdictLabel,
    pub severity: Severity,
    pub rationale: String,
    pub triggered_rule: TriggeredRule,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_fundamentals_uses_provider_keys() {
        let raw: RawFundamentals = serde_json::from_value(serde_json::json!({
            "symbol": "BIDU",
            "currentPrice": 88.5,
            "forwardPE": 9.1,
            "priceToSalesTrailing12Months": 1.7,
            "pegRatio": null,
            "news": [{"title": "Earnings beat"}],
            "revenueHistory": [{"date": "2023-12-31", "value": 1.0e9}]
        }))
        .unwrap();

        assert_eq!(raw.symbol, "BIDU");
        assert_eq!(raw.current_price, Some(88.5));
        assert_eq!(raw.forward_pe, Some(9.1));
        assert_eq!(raw.price_to_sales_trailing_12_months, Some(1.7));
        assert_eq!(raw.peg_ratio, None);
        assert!(raw.market_cap.is_none());
        assert_eq!(raw.news[0].title.as_deref(), Some("Earnings beat"));
        assert!(raw.news[0].link.is_none());
        assert_eq!(raw.revenue_history.len(), 1);
    }

    #[test]
    fn test_verdict_wire_names() {
        let verdict = Verdict {
            label: VerdictLabel::KillSwitch,
            severity: Severity::Critical,
            rationale: "x".to_string(),
            triggered_rule: TriggeredRule::DebtRisk,
        };
        let json = serde_json::to_value(&verdict).unwrap();
        assert_eq!(json["label"], "KILL_SWITCH");
        assert_eq!(json["severity"], "critical");
        assert_eq!(json["triggered_rule"], "debt_risk");
    }

    #[test]
    fn test_display_labels() {
        assert_eq!(VerdictLabel::HoldWatch.to_label(), "HOLD / WATCH");
        assert_eq!(Severity::Neutral.color(), "#b0b0b0");
    }
}
