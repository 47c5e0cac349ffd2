pub mod blend;
pub mod changes;
pub mod contrarian;
pub mod history;
pub mod ingest;
pub mod reconciler;
pub mod service;
pub mod strength;

// Re-export components for convenience
pub use blend::{
    blend, latest_per_source, simple_average, BlendedState, SimpleAverage, SourceReadings,
    SourceSlot, SourceWeight, NEUTRAL_PERCENT,
};
pub use changes::{
    classify, detect_changes, ChangeType, SignalChange, SignalChanges, SignalComparison,
    FADING_MIN_DROP, FADING_MIN_STRENGTH,
};
pub use contrarian::{contrarian, Bias, ContrarianSignal, SignalLabel, CONTRARIAN_THRESHOLD};
pub use history::{bucket_series, HistoricalPoint, HistoryRange, Interval};
pub use reconciler::{
    normalize_symbol, MatchStrategy, NormalizedSymbol, ReconciledReading, Resolution,
    SymbolReconciler,
};
pub use strength::{
    currency_strength, risk_sentiment, CurrencyStrength, PairNet, RiskSentiment, RiskStatus,
    RISK_DELTA_THRESHOLD,
};

// Re-export the service layer
pub use ingest::{prepare_batch, prepare_reading, IngestReport, Ingestor};
pub use service::{
    HistoricalSeries, InstrumentSentiment, OverviewData, SentimentFilter, SentimentService,
    SourceBreakdown,
};
