//! Weighted blend of per-source positioning readings.
//!
//! Every blend runs over a fixed-size set of slots built from the static
//! weight table, so a missing source is just an empty slot.

use fx_sentiment_core::{
    round_dp, Reading, Snapshot, Source, SourceCatalog, SOURCE_COUNT, SOURCE_WEIGHTS,
};
use serde::{Deserialize, Serialize};

/// Long/short split reported when no source has data.
pub const NEUTRAL_PERCENT: f64 = 50.0;

/// One source's slot in a blend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceSlot {
    pub source: Source,
    pub weight: u32,
    pub reading: Option<Reading>,
}

/// Readings for every known source, absent where a source has nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceReadings {
    slots: [SourceSlot; SOURCE_COUNT],
}

impl Default for SourceReadings {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceReadings {
    /// All slots empty.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: SOURCE_WEIGHTS.map(|(source, weight)| SourceSlot {
                source,
                weight,
                reading: None,
            }),
        }
    }

    pub fn set(&mut self, source: Source, reading: Reading) {
        self.slots[source.index()].reading = Some(reading);
    }

    pub fn clear(&mut self, source: Source) {
        self.slots[source.index()].reading = None;
    }

    /// Builder method to fill a slot.
    #[must_use]
    pub fn with(mut self, source: Source, reading: Reading) -> Self {
        self.set(source, reading);
        self
    }

    #[must_use]
    pub fn get(&self, source: Source) -> Option<Reading> {
        self.slots[source.index()].reading
    }

    /// Slots holding a valid reading, in weight-table order.
    pub fn valid(&self) -> impl Iterator<Item = (&SourceSlot, Reading)> {
        self.slots
            .iter()
            .filter_map(|slot| slot.reading.filter(Reading::is_valid).map(|r| (slot, r)))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|s| s.reading.is_none())
    }

    /// Builds readings from the latest snapshot per source.
    #[must_use]
    pub fn from_latest(latest: &[Option<&Snapshot>; SOURCE_COUNT]) -> Self {
        let mut readings = Self::new();
        for snapshot in latest.iter().flatten() {
            readings.set(snapshot.source, snapshot.reading());
        }
        readings
    }
}

impl FromIterator<(Source, Reading)> for SourceReadings {
    fn from_iter<T: IntoIterator<Item = (Source, Reading)>>(iter: T) -> Self {
        let mut readings = Self::new();
        for (source, reading) in iter {
            readings.set(source, reading);
        }
        readings
    }
}

/// Weight a source actually contributed to a blend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceWeight {
    pub source: Source,
    pub weight: u32,
}

/// Consensus long/short split for one instrument at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlendedState {
    pub blended_long: f64,
    pub blended_short: f64,
    pub total_weight: u32,
    /// Contributing sources in weight-table order
    pub sources_used: Vec<Source>,
    pub weights: Vec<SourceWeight>,
}

impl BlendedState {
    /// The "no data" result: 50/50 with zero weight.
    #[must_use]
    pub fn neutral() -> Self {
        Self {
            blended_long: NEUTRAL_PERCENT,
            blended_short: NEUTRAL_PERCENT,
            total_weight: 0,
            sources_used: Vec::new(),
            weights: Vec::new(),
        }
    }

    /// Long minus short, in percentage points.
    #[must_use]
    pub fn net(&self) -> f64 {
        self.blended_long - self.blended_short
    }

    #[must_use]
    pub fn has_data(&self) -> bool {
        self.total_weight > 0
    }
}

/// Blends valid readings by the fixed source weights.
///
/// Short is the complement of the rounded long so the pair always sums to 100.
#[must_use]
pub fn blend(readings: &SourceReadings) -> BlendedState {
    let mut total_weight = 0u32;
    let mut weighted_long = 0.0;
    let mut sources_used = Vec::new();
    let mut weights = Vec::new();

    for (slot, reading) in readings.valid() {
        total_weight += slot.weight;
        weighted_long += f64::from(slot.weight) * reading.long_percent;
        sources_used.push(slot.source);
        weights.push(SourceWeight {
            source: slot.source,
            weight: slot.weight,
        });
    }

    if total_weight == 0 {
        return BlendedState::neutral();
    }

    let blended_long = round_dp(weighted_long / f64::from(total_weight), 2);
    BlendedState {
        blended_long,
        blended_short: round_dp(100.0 - blended_long, 2),
        total_weight,
        sources_used,
        weights,
    }
}

/// Unweighted mean of the valid readings, kept for older consumers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimpleAverage {
    pub long_percent: f64,
    pub short_percent: f64,
    pub sources: usize,
}

#[must_use]
pub fn simple_average(readings: &SourceReadings) -> SimpleAverage {
    let (sum, count) = readings
        .valid()
        .fold((0.0, 0usize), |(sum, n), (_, r)| (sum + r.long_percent, n + 1));

    if count == 0 {
        return SimpleAverage {
            long_percent: NEUTRAL_PERCENT,
            short_percent: NEUTRAL_PERCENT,
            sources: 0,
        };
    }

    let long_percent = round_dp(sum / count as f64, 2);
    SimpleAverage {
        long_percent,
        short_percent: round_dp(100.0 - long_percent, 2),
        sources: count,
    }
}

/// Picks the most recent valid snapshot per active source.
///
/// Ties on timestamp go to the later element of the slice.
#[must_use]
pub fn latest_per_source<'a>(
    snapshots: &'a [Snapshot],
    sources: &SourceCatalog,
) -> [Option<&'a Snapshot>; SOURCE_COUNT] {
    let mut latest: [Option<&Snapshot>; SOURCE_COUNT] = [None; SOURCE_COUNT];
    for snapshot in snapshots {
        if !sources.is_active(snapshot.source) || !snapshot.reading().is_valid() {
            continue;
        }
        let slot = &mut latest[snapshot.source.index()];
        if slot.map_or(true, |current| snapshot.timestamp >= current.timestamp) {
            *slot = Some(snapshot);
        }
    }
    latest
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn empty_blend_is_neutral() {
        let state = blend(&SourceReadings::new());
        assert_eq!(state, BlendedState::neutral());
        assert_close(state.blended_long, 50.0);
        assert_close(state.blended_short, 50.0);
        assert_eq!(state.total_weight, 0);
        assert!(state.sources_used.is_empty());
    }

    #[test]
    fn weighted_blend_of_three_sources() {
        let readings = SourceReadings::new()
            .with(Source::Myfxbook, Reading::new(80.0, 20.0))
            .with(Source::Oanda, Reading::new(70.0, 30.0))
            .with(Source::Dukascopy, Reading::new(60.0, 40.0));

        let state = blend(&readings);

        assert_close(state.blended_long, 72.0);
        assert_close(state.blended_short, 28.0);
        assert_eq!(state.total_weight, 5);
        assert_eq!(
            state.sources_used,
            vec![Source::Myfxbook, Source::Oanda, Source::Dukascopy]
        );
        assert_eq!(state.weights[0].weight, 2);
        assert_eq!(state.weights[2].weight, 1);
    }

    #[test]
    fn nan_reading_is_excluded() {
        let readings = SourceReadings::new()
            .with(Source::Myfxbook, Reading::new(80.0, 20.0))
            .with(Source::Fxblue, Reading::new(f64::NAN, 50.0));

        let state = blend(&readings);

        assert_close(state.blended_long, 80.0);
        assert_eq!(state.total_weight, 2);
        assert_eq!(state.sources_used, vec![Source::Myfxbook]);
    }

    #[test]
    fn only_invalid_readings_yield_neutral() {
        let readings = SourceReadings::new().with(Source::Oanda, Reading::new(f64::NAN, f64::NAN));
        assert_eq!(blend(&readings), BlendedState::neutral());
    }

    #[test]
    fn short_is_complement_of_long() {
        let readings = SourceReadings::new()
            .with(Source::Myfxbook, Reading::new(33.33, 70.0))
            .with(Source::Dukascopy, Reading::new(41.7, 58.3))
            .with(Source::Forexfactory, Reading::new(66.0, 34.0));

        let state = blend(&readings);

        assert_close(state.blended_long + state.blended_short, 100.0);
        // (2*33.33 + 41.7 + 66.0) / 4 = 43.59
        assert_close(state.blended_long, 43.59);
        assert_close(state.blended_short, 56.41);
    }

    #[test]
    fn blend_is_idempotent() {
        let readings = SourceReadings::new()
            .with(Source::Oanda, Reading::new(57.3, 42.7))
            .with(Source::Fxblue, Reading::new(61.0, 39.0));
        assert_eq!(blend(&readings), blend(&readings));
    }

    #[test]
    fn simple_average_ignores_weights() {
        let readings = SourceReadings::new()
            .with(Source::Myfxbook, Reading::new(80.0, 20.0))
            .with(Source::Fxblue, Reading::new(60.0, 40.0));

        let avg = simple_average(&readings);

        assert_close(avg.long_percent, 70.0);
        assert_close(avg.short_percent, 30.0);
        assert_eq!(avg.sources, 2);
        assert_eq!(simple_average(&SourceReadings::new()).sources, 0);
    }

    #[test]
    fn latest_per_source_skips_invalid_and_inactive() {
        let t0 = Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap();
        let snapshots = vec![
            Snapshot::new("EUR/USD", Source::Oanda, Reading::new(60.0, 40.0), t0),
            Snapshot::new(
                "EUR/USD",
                Source::Oanda,
                Reading::new(65.0, 35.0),
                t0 + Duration::minutes(5),
            ),
            Snapshot::new(
                "EUR/USD",
                Source::Oanda,
                Reading::new(f64::NAN, 35.0),
                t0 + Duration::minutes(10),
            ),
            Snapshot::new("EUR/USD", Source::Fxblue, Reading::new(90.0, 10.0), t0),
        ];
        let sources = SourceCatalog::default().with_disabled(&["fxblue"]);

        let latest = latest_per_source(&snapshots, &sources);
        let readings = SourceReadings::from_latest(&latest);

        assert_eq!(readings.get(Source::Oanda), Some(Reading::new(65.0, 35.0)));
        assert!(readings.get(Source::Fxblue).is_none());
        assert!(latest[Source::Myfxbook.index()].is_none());
    }

    #[test]
    fn from_iter_and_clear() {
        let mut readings: SourceReadings = vec![
            (Source::Oanda, Reading::new(55.0, 45.0)),
            (Source::Dukascopy, Reading::new(45.0, 55.0)),
        ]
        .into_iter()
        .collect();
        assert!(!readings.is_empty());
        readings.clear(Source::Oanda);
        readings.clear(Source::Dukascopy);
        assert!(readings.is_empty());
    }
}
