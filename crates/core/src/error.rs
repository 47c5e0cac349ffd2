use thiserror::Error;

/// Errors surfaced by the sentiment read operations.
///
/// Computation never fails; only catalog lookups and storage can.
#[derive(Error, Debug)]
pub enum SentimentError {
    #[error("unknown instrument: {0}")]
    UnknownInstrument(String),

    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

/// Why a single raw reading was dropped at ingestion.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReadingRejection {
    #[error("no instrument matches symbol {0:?}")]
    UnresolvedSymbol(String),

    #[error("unknown source {0:?}")]
    UnknownSource(String),

    #[error("source {0} is inactive")]
    InactiveSource(String),

    #[error("percentages out of range: long={long}, short={short}")]
    OutOfRange { long: f64, short: f64 },
}

pub type SentimentResult<T> = std::result::Result<T, SentimentError>;
