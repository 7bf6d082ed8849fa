//! Snapshot normalization
//!
//! Turns a provider record into a `Snapshot`. Every default and fallback rule
//! lives here so the classifier only ever sees typed, complete figures.

use analysis_core::{
    ClosePriceSource, NewsItem, NoHistory, NormalizationError, PriceSource, RawFundamentals,
    RawNewsItem, RawRevenuePoint, RevenuePoint, Snapshot,
};
use chrono::{Datelike, NaiveDate};

/// A cash-to-market-cap ratio above this (in percent) cannot be genuine.
pub const CURRENCY_MISMATCH_CEILING_PCT: f64 = 100.0;

/// Approximate CNY/USD rate used to scale a mismatched cash figure back into
/// the market cap's currency. An estimate, not a conversion.
pub const CURRENCY_CORRECTION_FACTOR: f64 = 7.2;

/// Number of most recent revenue periods kept on the snapshot.
pub const MAX_REVENUE_PERIODS: usize = 4;

const DEFAULT_NEWS_TITLE: &str = "No Title";
const DEFAULT_NEWS_LINK: &str = "#";
const DEFAULT_NEWS_PUBLISHER: &str = "Source";

/// Normalize a record without any history lookup for the price.
pub fn normalize(raw: &RawFundamentals) -> Result<Snapshot, NormalizationError> {
    normalize_with_fallback(raw, &NoHistory)
}

/// Normalize an untyped record, e.g. a request body or a file on disk.
pub fn normalize_value(value: &serde_json::Value) -> Result<Snapshot, NormalizationError> {
    if !value.is_object() {
        return Err(NormalizationError::MalformedInput(
            "fundamentals record must be a JSON object".to_string(),
        ));
    }

    let raw: RawFundamentals = serde_json::from_value(value.clone())
        .map_err(|e| NormalizationError::MalformedInput(e.to_string()))?;

    normalize(&raw)
}

/// Normalize a record, asking `history` for the last close only when neither
/// quote price nor a pre-fetched close is usable.
pub fn normalize_with_fallback<H: ClosePriceSource + ?Sized>(
    raw: &RawFundamentals,
    history: &H,
) -> Result<Snapshot, NormalizationError> {
    let symbol = raw.symbol.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(NormalizationError::MalformedInput(
            "symbol must not be empty".to_string(),
        ));
    }

    let (price, price_source) = resolve_price(&symbol, raw, history)?;

    let market_cap = non_negative(&symbol, "marketCap", raw.market_cap);
    let cash = non_negative(&symbol, "totalCash", raw.total_cash);
    let debt = non_negative(&symbol, "totalDebt", raw.total_debt);

    let cash_percent_raw = if market_cap > 0.0 {
        cash / market_cap * 100.0
    } else {
        0.0
    };

    let currency_mismatch = cash_percent_raw > CURRENCY_MISMATCH_CEILING_PCT;
    let cash_percent_adjusted = if currency_mismatch {
        tracing::warn!(
            "{}: cash is {:.0}% of market cap, assuming a currency mismatch",
            symbol,
            cash_percent_raw
        );
        cash_percent_raw / CURRENCY_CORRECTION_FACTOR
    } else {
        cash_percent_raw
    };

    let enterprise_value = market_cap - cash + debt;

    let (ebitda, ebitda_defaulted) = match usable(raw.ebitda) {
        Some(e) if e != 0.0 => (e, false),
        _ => {
            tracing::debug!("{}: no EBITDA reported, leverage uses a divisor of 1", symbol);
            (1.0, true)
        }
    };
    let leverage = (debt - cash) / ebitda;

    Ok(Snapshot {
        symbol,
        price,
        price_source,
        market_cap,
        cash,
        debt,
        cash_per_share: or_zero(raw.total_cash_per_share),
        shares_outstanding: or_zero(raw.shares_outstanding),
        cash_percent_raw,
        currency_mismatch,
        cash_percent_adjusted,
        enterprise_value,
        forward_pe: or_zero(raw.forward_pe),
        price_to_sales: or_zero(raw.price_to_sales_trailing_12_months),
        revenue_growth_pct: or_zero(raw.revenue_growth) * 100.0,
        ebitda,
        ebitda_defaulted,
        leverage,
        peg: usable(raw.peg_ratio),
        return_on_equity_pct: or_zero(raw.return_on_equity) * 100.0,
        news: raw.news.iter().map(normalize_news_item).collect(),
        revenue_history: normalize_revenue_history(&raw.revenue_history),
    })
}

fn resolve_price<H: ClosePriceSource + ?Sized>(
    symbol: &str,
    raw: &RawFundamentals,
    history: &H,
) -> Result<(f64, PriceSource), NormalizationError> {
    let quoted = [
        (raw.current_price, PriceSource::CurrentPrice),
        (raw.regular_market_price, PriceSource::RegularMarketPrice),
        (raw.last_close, PriceSource::LastClose),
    ];

    if let Some((price, source)) = quoted
        .into_iter()
        .find_map(|(value, source)| positive(value).map(|p| (p, source)))
    {
        return Ok((price, source));
    }

    tracing::debug!("{}: no quoted price, asking price history for last close", symbol);
    match positive(history.last_close(symbol)) {
        Some(price) => Ok((price, PriceSource::HistoryFallback)),
        None => Err(NormalizationError::PriceUnavailable {
            symbol: symbol.to_string(),
        }),
    }
}

fn usable(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// `value or 0`: absent, null, zero and non-finite all collapse to 0.
fn or_zero(value: Option<f64>) -> f64 {
    usable(value).unwrap_or(0.0)
}

/// Balance-sheet magnitudes cannot be negative; a negative report is treated
/// as missing.
fn non_negative(symbol: &str, field: &str, value: Option<f64>) -> f64 {
    let v = or_zero(value);
    if v < 0.0 {
        tracing::warn!("{}: negative {} ({}) clamped to 0", symbol, field, v);
        return 0.0;
    }
    v
}

fn positive(value: Option<f64>) -> Option<f64> {
    usable(value).filter(|v| *v > 0.0)
}

fn normalize_news_item(item: &RawNewsItem) -> NewsItem {
    fn or_default(value: &Option<String>, default: &str) -> String {
        value
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(default)
            .to_string()
    }

    NewsItem {
        title: or_default(&item.title, DEFAULT_NEWS_TITLE),
        link: or_default(&item.link, DEFAULT_NEWS_LINK),
        publisher: or_default(&item.publisher, DEFAULT_NEWS_PUBLISHER),
    }
}

fn period_year(date: &str) -> Option<i32> {
    let date = date.trim();
    if let Ok(d) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        return Some(d.year());
    }
    date.get(..4)
        .filter(|y| y.chars().all(|c| c.is_ascii_digit()))
        .and_then(|y| y.parse().ok())
}

fn normalize_revenue_history(points: &[RawRevenuePoint]) -> Vec<RevenuePoint> {
    let mut history: Vec<RevenuePoint> = points
        .iter()
        .filter_map(|p| {
            let value = usable(p.value)?;
            let year = period_year(&p.date)?;
            Some(RevenuePoint { year, value })
        })
        .collect();

    history.sort_by_key(|p| p.year);
    let skip = history.len().saturating_sub(MAX_REVENUE_PERIODS);
    history.split_off(skip)
}
