//! Read operations over the snapshot store.
//!
//! Every call reloads the catalogs, reads the current settings and recomputes
//! from raw snapshots. Nothing derived is cached between calls.

use chrono::{DateTime, Duration, Utc};
use fx_sentiment_core::{
    AppConfig, AssetClass, Instrument, InstrumentCatalog, SentimentConfig, SentimentError,
    SentimentResult, Snapshot, SnapshotStore, Source, SourceCatalog,
};
use futures_util::future::try_join_all;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::debug;

use crate::blend::{
    blend, latest_per_source, simple_average, BlendedState, SimpleAverage, SourceReadings,
};
use crate::changes::{detect_changes, SignalChange, SignalComparison};
use crate::contrarian::ContrarianSignal;
use crate::history::{bucket_series, HistoricalPoint, HistoryRange, Interval};
use crate::reconciler::SymbolReconciler;
use crate::strength::{
    currency_strength, risk_sentiment, CurrencyStrength, PairNet, RiskSentiment,
};

/// Narrows `latest_sentiment` output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentFilter {
    /// Canonical or raw symbols; empty means all
    pub symbols: Vec<String>,
    pub asset_class: Option<AssetClass>,
    /// Skip instruments with no fresh reading
    pub with_data_only: bool,
}

impl SentimentFilter {
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn symbol(symbol: impl Into<String>) -> Self {
        Self {
            symbols: vec![symbol.into()],
            ..Self::default()
        }
    }
}

/// One source's contribution to a latest-sentiment blend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceBreakdown {
    pub source: Source,
    pub weight: u32,
    pub long_percent: f64,
    pub short_percent: f64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentSentiment {
    pub symbol: String,
    pub asset_class: AssetClass,
    pub blended: BlendedState,
    pub simple_average: SimpleAverage,
    pub signal: ContrarianSignal,
    pub sources: Vec<SourceBreakdown>,
    /// Freshest contributing reading, `None` without data
    pub last_updated: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalSeries {
    pub symbol: String,
    pub interval: Interval,
    pub points: Vec<HistoricalPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverviewData {
    pub currency_strength: Vec<CurrencyStrength>,
    pub risk_sentiment: RiskSentiment,
    pub new_signals: Vec<SignalChange>,
    pub fading_signals: Vec<SignalChange>,
    pub generated_at: DateTime<Utc>,
}

/// Consensus sentiment queries backed by a [`SnapshotStore`].
pub struct SentimentService<S> {
    store: S,
    settings: watch::Receiver<AppConfig>,
}

impl<S: SnapshotStore> SentimentService<S> {
    /// Creates a service with fixed settings.
    #[must_use]
    pub fn new(store: S, sentiment: SentimentConfig) -> Self {
        let (_tx, rx) = watch::channel(AppConfig {
            sentiment,
            ..AppConfig::default()
        });
        Self::with_config_receiver(store, rx)
    }

    /// Creates a service that follows a live config channel.
    #[must_use]
    pub fn with_config_receiver(store: S, settings: watch::Receiver<AppConfig>) -> Self {
        Self { store, settings }
    }

    fn settings(&self) -> SentimentConfig {
        self.settings.borrow().sentiment.clone()
    }

    async fn catalogs(
        &self,
        settings: &SentimentConfig,
    ) -> SentimentResult<(InstrumentCatalog, SourceCatalog)> {
        let instruments = InstrumentCatalog::new(self.store.instruments().await?);
        let sources = SourceCatalog::from_statuses(&self.store.sources().await?)
            .with_disabled(settings.disabled_sources.as_slice());
        Ok((instruments, sources))
    }

    /// Latest blended sentiment per instrument, evaluated now.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError::Storage`] if the store fails.
    pub async fn latest_sentiment(
        &self,
        filter: &SentimentFilter,
    ) -> SentimentResult<Vec<InstrumentSentiment>> {
        self.latest_sentiment_at(filter, Utc::now()).await
    }

    /// Latest blended sentiment per instrument as of `now`.
    ///
    /// Only readings inside the freshness window ending at `now` count.
    /// Unresolvable filter symbols are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError::Storage`] if the store fails.
    pub async fn latest_sentiment_at(
        &self,
        filter: &SentimentFilter,
        now: DateTime<Utc>,
    ) -> SentimentResult<Vec<InstrumentSentiment>> {
        let settings = self.settings();
        let (instruments, sources) = self.catalogs(&settings).await?;
        let selected = select_instruments(&instruments, filter);
        let start = shift_back(now, settings.freshness());

        let fetched = try_join_all(
            selected
                .iter()
                .map(|instrument| self.store.snapshots_between(&instrument.symbol, start, now)),
        )
        .await?;

        let mut results = Vec::with_capacity(selected.len());
        for (instrument, snapshots) in selected.into_iter().zip(fetched) {
            let sentiment = evaluate_latest(instrument, &snapshots, &sources);
            if filter.with_data_only && !sentiment.blended.has_data() {
                continue;
            }
            results.push(sentiment);
        }

        debug!(instruments = results.len(), "Evaluated latest sentiment");
        Ok(results)
    }

    /// Bucketed history for one instrument, ending now.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError::UnknownInstrument`] if the symbol does not
    /// resolve, or [`SentimentError::Storage`] if the store fails.
    pub async fn historical_sentiment(
        &self,
        symbol: &str,
        range: HistoryRange,
    ) -> SentimentResult<HistoricalSeries> {
        self.historical_sentiment_at(symbol, range, Utc::now()).await
    }

    /// Bucketed history for one instrument over the range ending at `now`.
    ///
    /// A symbol given in reversed order resolves to the catalog instrument and
    /// returns its series as stored.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError::UnknownInstrument`] if the symbol does not
    /// resolve, or [`SentimentError::Storage`] if the store fails.
    pub async fn historical_sentiment_at(
        &self,
        symbol: &str,
        range: HistoryRange,
        now: DateTime<Utc>,
    ) -> SentimentResult<HistoricalSeries> {
        let settings = self.settings();
        let (instruments, sources) = self.catalogs(&settings).await?;
        let instrument = SymbolReconciler::new(&instruments)
            .resolve(symbol)
            .map(|r| r.instrument)
            .ok_or_else(|| SentimentError::UnknownInstrument(symbol.to_string()))?;

        let snapshots = self
            .store
            .snapshots_between(&instrument.symbol, range.start(now), now)
            .await?;
        let points = bucket_series(&snapshots, range.interval, &sources);

        debug!(
            symbol = %instrument.symbol,
            interval = %range.interval,
            points = points.len(),
            "Built historical series"
        );

        Ok(HistoricalSeries {
            symbol: instrument.symbol.clone(),
            interval: range.interval,
            points,
        })
    }

    /// Currency strength, risk regime and signal changes, evaluated now.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError::Storage`] if the store fails.
    pub async fn overview(&self) -> SentimentResult<OverviewData> {
        self.overview_at(Utc::now()).await
    }

    /// Currency strength, risk regime and signal changes as of `now`.
    ///
    /// Each instrument is fetched once over the union of the freshness window
    /// and the historical comparison window, then split in memory.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError::Storage`] if the store fails.
    pub async fn overview_at(&self, now: DateTime<Utc>) -> SentimentResult<OverviewData> {
        let settings = self.settings();
        let (instruments, sources) = self.catalogs(&settings).await?;
        let windows = EvaluationWindows::new(&settings, now);
        let all: Vec<&Instrument> = instruments.iter().collect();

        let fetched = try_join_all(all.iter().map(|instrument| {
            self.store
                .snapshots_between(&instrument.symbol, windows.fetch_start(), now)
        }))
        .await?;

        let mut pairs = Vec::new();
        let mut comparisons = Vec::with_capacity(all.len());

        for (instrument, snapshots) in all.into_iter().zip(fetched) {
            let current = blend_window(&snapshots, &sources, windows.fresh_start, now);
            let historical = blend_window(
                &snapshots,
                &sources,
                windows.historical_start,
                windows.historical_end,
            );

            if let Some((base, quote)) = instrument.currency_pair() {
                pairs.push(PairNet::from_blend(base, quote, &current));
            }

            debug!(
                symbol = %instrument.symbol,
                current_long = current.blended_long,
                current_weight = current.total_weight,
                historical_weight = historical.total_weight,
                "Evaluated instrument for overview"
            );

            comparisons.push(SignalComparison {
                symbol: instrument.symbol.clone(),
                current: ContrarianSignal::from_blend(&current),
                historical: historical
                    .has_data()
                    .then(|| ContrarianSignal::from_blend(&historical)),
            });
        }

        let strengths = currency_strength(&pairs);
        let risk = risk_sentiment(&strengths);
        let changes = detect_changes(comparisons, settings.signal_list_limit);

        Ok(OverviewData {
            currency_strength: strengths,
            risk_sentiment: risk,
            new_signals: changes.new_signals,
            fading_signals: changes.fading_signals,
            generated_at: now,
        })
    }
}

/// Time windows used by one overview evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct EvaluationWindows {
    fresh_start: DateTime<Utc>,
    historical_start: DateTime<Utc>,
    historical_end: DateTime<Utc>,
}

impl EvaluationWindows {
    fn new(settings: &SentimentConfig, now: DateTime<Utc>) -> Self {
        let target = shift_back(now, settings.change_lookback());
        let half = settings.change_half_window();
        Self {
            fresh_start: shift_back(now, settings.freshness()),
            historical_start: shift_back(target, half),
            historical_end: target.checked_add_signed(half).unwrap_or(target),
        }
    }

    fn fetch_start(&self) -> DateTime<Utc> {
        self.fresh_start.min(self.historical_start)
    }
}

/// `at - by`, saturating at the earliest representable instant.
fn shift_back(at: DateTime<Utc>, by: Duration) -> DateTime<Utc> {
    at.checked_sub_signed(by).unwrap_or(DateTime::<Utc>::MIN_UTC)
}

fn select_instruments<'a>(
    catalog: &'a InstrumentCatalog,
    filter: &SentimentFilter,
) -> Vec<&'a Instrument> {
    let by_class = |i: &&Instrument| filter.asset_class.map_or(true, |c| i.asset_class == c);

    if filter.symbols.is_empty() {
        return catalog.iter().filter(by_class).collect();
    }

    let reconciler = SymbolReconciler::new(catalog);
    let mut selected: Vec<&Instrument> = Vec::new();
    for symbol in &filter.symbols {
        match reconciler.resolve(symbol) {
            Some(r) if by_class(&r.instrument) => {
                if !selected.iter().any(|i| i.symbol == r.instrument.symbol) {
                    selected.push(r.instrument);
                }
            }
            Some(_) => {}
            None => debug!(symbol = %symbol, "Filter symbol does not resolve"),
        }
    }
    selected
}

/// Blend of each active source's latest valid reading within `[start, end]`.
fn blend_window(
    snapshots: &[Snapshot],
    sources: &SourceCatalog,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> BlendedState {
    let in_window: Vec<Snapshot> = snapshots
        .iter()
        .filter(|s| s.timestamp >= start && s.timestamp <= end)
        .cloned()
        .collect();
    blend(&SourceReadings::from_latest(&latest_per_source(&in_window, sources)))
}

fn evaluate_latest(
    instrument: &Instrument,
    snapshots: &[Snapshot],
    sources: &SourceCatalog,
) -> InstrumentSentiment {
    let latest = latest_per_source(snapshots, sources);
    let readings = SourceReadings::from_latest(&latest);
    let blended = blend(&readings);

    let breakdown: Vec<SourceBreakdown> = latest
        .iter()
        .flatten()
        .map(|s| SourceBreakdown {
            source: s.source,
            weight: s.source.weight(),
            long_percent: s.long_percent,
            short_percent: s.short_percent,
            timestamp: s.timestamp,
        })
        .collect();

    InstrumentSentiment {
        symbol: instrument.symbol.clone(),
        asset_class: instrument.asset_class,
        signal: ContrarianSignal::from_blend(&blended),
        simple_average: simple_average(&readings),
        last_updated: breakdown.iter().map(|b| b.timestamp).max(),
        sources: breakdown,
        blended,
    }
}
