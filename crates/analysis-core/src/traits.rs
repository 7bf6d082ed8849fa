/// Supplies the last close from a 1-day price history, asked for only when the
/// quote record carries no usable price.
pub trait ClosePriceSource {
    fn last_close(&self, symbol: &str) -> Option<f64>;
}

/// Used when no history lookup is available.
pub struct NoHistory;

impl ClosePriceSource for NoHistory {
    fn last_close(&self, _symbol: &str) -> Option<f64> {
        None
    }
}

impl<F> ClosePriceSource for F
where
    F: Fn(&str) -> Option<f64>,
{
    fn last_close(&self, symbol: &str) -> Option<f64> {
        self(symbol)
    }
}
