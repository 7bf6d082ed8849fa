//! Verdict cascade
//!
//! Rules are evaluated in definition order and the first match wins. A
//! snapshot that satisfies several rules always gets the earliest one, never
//! the "most severe" one.

use analysis_core::{Severity, Snapshot, TriggeredRule, Verdict, VerdictLabel};

use crate::thresholds::VerdictThresholds;

type Rule = fn(&Snapshot, &VerdictThresholds) -> Option<Verdict>;

const CASCADE: [Rule; 5] = [
    debt_risk,
    growth_risk,
    scrap_elite,
    quality_compounder,
    asset_play,
];

pub struct VerdictClassifier {
    thresholds: VerdictThresholds,
}

impl VerdictClassifier {
    pub fn new() -> Self {
        Self {
            thresholds: VerdictThresholds::default(),
        }
    }

    pub fn with_thresholds(thresholds: VerdictThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &VerdictThresholds {
        &self.thresholds
    }

    /// Always returns exactly one verdict.
    pub fn classify(&self, snapshot: &Snapshot) -> Verdict {
        let verdict = CASCADE
            .iter()
            .find_map(|rule| rule(snapshot, &self.thresholds))
            .unwrap_or_else(hold_watch);

        tracing::debug!(
            "{}: {} via {:?}",
            snapshot.symbol,
            verdict.label.to_label(),
            verdict.triggered_rule
        );
        verdict
    }
}

impl Default for VerdictClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Classify with the default thresholds.
pub fn classify(snapshot: &Snapshot) -> Verdict {
    VerdictClassifier::new().classify(snapshot)
}

fn verdict(
    label: VerdictLabel,
    severity: Severity,
    rule: TriggeredRule,
    rationale: String,
) -> Option<Verdict> {
    Some(Verdict {
        label,
        severity,
        rationale,
        triggered_rule: rule,
    })
}

fn debt_risk(s: &Snapshot, t: &VerdictThresholds) -> Option<Verdict> {
    // Leverage against a defaulted EBITDA of 1 is meaningless; use the raw
    // debt/cash multiple instead.
    let rationale = if s.leverage_is_meaningful() {
        if s.leverage <= t.kill_max_leverage {
            return None;
        }
        format!(
            "Net debt is {:.1}x EBITDA (limit {:.1}x)",
            s.leverage, t.kill_max_leverage
        )
    } else {
        if !(s.cash > 0.0 && s.debt > s.cash * t.kill_max_debt_to_cash) {
            return None;
        }
        format!(
            "Debt is {:.1}x cash on hand (limit {:.1}x)",
            s.debt / s.cash,
            t.kill_max_debt_to_cash
        )
    };

    verdict(
        VerdictLabel::KillSwitch,
        Severity::Critical,
        TriggeredRule::DebtRisk,
        rationale,
    )
}

fn growth_risk(s: &Snapshot, t: &VerdictThresholds) -> Option<Verdict> {
    if s.revenue_growth_pct >= t.kill_min_revenue_growth_pct {
        return None;
    }
    verdict(
        VerdictLabel::KillSwitch,
        Severity::Critical,
        TriggeredRule::GrowthRisk,
        format!("Revenue contracting {:.1}%", s.revenue_growth_pct),
    )
}

fn scrap_elite(s: &Snapshot, t: &VerdictThresholds) -> Option<Verdict> {
    let peg = s.peg?;
    if !(peg < t.scrap_max_peg && s.revenue_growth_pct > t.scrap_min_revenue_growth_pct) {
        return None;
    }
    verdict(
        VerdictLabel::ScrapElite,
        Severity::Positive,
        TriggeredRule::ScrapElite,
        format!(
            "PEG {:.2} with revenue growing {:.1}%",
            peg, s.revenue_growth_pct
        ),
    )
}

fn quality_compounder(s: &Snapshot, t: &VerdictThresholds) -> Option<Verdict> {
    if !(s.return_on_equity_pct > t.quality_min_roe_pct
        && s.revenue_growth_pct > t.quality_min_revenue_growth_pct)
    {
        return None;
    }
    verdict(
        VerdictLabel::QualityCompounder,
        Severity::Positive,
        TriggeredRule::QualityCompounder,
        format!(
            "ROE {:.1}% with revenue growing {:.1}%",
            s.return_on_equity_pct, s.revenue_growth_pct
        ),
    )
}

fn asset_play(s: &Snapshot, t: &VerdictThresholds) -> Option<Verdict> {
    if !(s.cash_percent_adjusted > t.asset_min_cash_pct && s.forward_pe < t.asset_max_forward_pe) {
        return None;
    }
    let cash = if s.currency_mismatch {
        format!(
            "Cash is ~{:.1}% of market cap (currency-corrected estimate)",
            s.cash_percent_adjusted
        )
    } else {
        format!("Cash is {:.1}% of market cap", s.cash_percent_adjusted)
    };
    verdict(
        VerdictLabel::AssetPlay,
        Severity::Positive,
        TriggeredRule::AssetPlay,
        format!("{} at {:.1}x forward earnings", cash, s.forward_pe),
    )
}

fn hold_watch() -> Verdict {
    Verdict {
        label: VerdictLabel::HoldWatch,
        severity: Severity::Neutral,
        rationale: "no elite or critical criteria met.".to_string(),
        triggered_rule: TriggeredRule::NoCriteriaMet,
    }
}
