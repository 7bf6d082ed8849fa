use fundamental_analysis::ForensicReport;
use std::fmt::Write;

const MAX_HEADLINES: usize = 5;

/// Dollar amount in billions, e.g. `$12.34B`.
pub fn billions(value: f64) -> String {
    format!("${:.2}B", value / 1e9)
}

fn ratio(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => "n/a".to_string(),
    }
}

pub fn render_report(report: &ForensicReport) -> String {
    let s = &report.snapshot;
    let v = &report.verdict;
    let mut out = String::new();

    // Writing to a String cannot fail.
    let _ = writeln!(out, "== Forensic audit: {} ==", s.symbol);
    let _ = writeln!(
        out,
        "Price: ${:.2} | Market cap: {} | EV: {}",
        s.price,
        billions(s.market_cap),
        billions(s.enterprise_value)
    );

    let _ = writeln!(out, "\n-- Cash --");
    let _ = writeln!(out, "Cash (raw): {} | Debt: {}", billions(s.cash), billions(s.debt));
    if s.currency_mismatch {
        let _ = writeln!(
            out,
            "Cash/market cap: {:.0}% raw, ~{:.1}% after currency correction",
            s.cash_percent_raw, s.cash_percent_adjusted
        );
    } else {
        let _ = writeln!(out, "Cash/market cap: {:.1}%", s.cash_percent_adjusted);
    }
    let _ = writeln!(out, "{}", report.cash_cushion.note);

    let _ = writeln!(out, "\n-- Scrap test --");
    let _ = writeln!(
        out,
        "Fwd P/E: {:.2}x | P/S: {:.2}x | PEG: {} | Growth: {:.1}% | ROE: {:.1}%",
        s.forward_pe,
        s.price_to_sales,
        ratio(s.peg),
        s.revenue_growth_pct,
        s.return_on_equity_pct
    );
    let _ = writeln!(
        out,
        "{} {}",
        if report.scrap_test.passed { "PASS:" } else { "FAIL:" },
        report.scrap_test.note
    );

    if !s.revenue_history.is_empty() {
        let _ = writeln!(out, "\n-- Revenue --");
        for point in &s.revenue_history {
            let _ = writeln!(out, "{}: {}", point.year, billions(point.value));
        }
    }

    let _ = writeln!(out, "\n-- Verdict --");
    let _ = writeln!(out, "{} [{}]", v.label.to_label(), v.severity.color());
    let _ = writeln!(out, "{}", v.rationale);

    if !report.warnings.is_empty() {
        let _ = writeln!(out, "\n-- Warnings --");
        for warning in &report.warnings {
            let _ = writeln!(out, "! {}", warning);
        }
    }

    if !s.news.is_empty() {
        let _ = writeln!(out, "\n-- News --");
        for item in s.news.iter().take(MAX_HEADLINES) {
            let _ = writeln!(out, "- {} ({}) {}", item.title, item.publisher, item.link);
        }
    }

    out
}
