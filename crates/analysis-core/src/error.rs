use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NormalizationError {
    #[error("Price unavailable for {symbol}")]
    PriceUnavailable { symbol: String },

    #[error("Malformed input: {0}")]
    MalformedInput(String),
}
