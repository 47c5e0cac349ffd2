//! New and fading signal detection against the state ~24h earlier.

use fx_sentiment_core::round_dp;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::contrarian::{ContrarianSignal, SignalLabel};

/// A past signal must have been at least this strong to count as fading.
pub const FADING_MIN_STRENGTH: f64 = 25.0;

/// Strength drop that counts as fading even when the label survives.
pub const FADING_MIN_DROP: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    New,
    Fading,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalChange {
    pub symbol: String,
    pub previous_label: SignalLabel,
    pub current_label: SignalLabel,
    pub previous_strength: f64,
    pub current_strength: f64,
    pub change_type: ChangeType,
}

impl SignalChange {
    /// How much strength was lost since the earlier reading, to 2 decimals.
    #[must_use]
    pub fn strength_drop(&self) -> f64 {
        strength_drop(self.previous_strength, self.current_strength)
    }
}

/// Current and historical signal for one instrument.
///
/// `historical` is `None` when nothing was recorded in the comparison window.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalComparison {
    pub symbol: String,
    pub current: ContrarianSignal,
    pub historical: Option<ContrarianSignal>,
}

/// Ranked new and fading lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalChanges {
    pub new_signals: Vec<SignalChange>,
    pub fading_signals: Vec<SignalChange>,
}

/// Classifies a single instrument. `None` means no reportable change.
#[must_use]
pub fn classify(
    symbol: &str,
    current: &ContrarianSignal,
    historical: &ContrarianSignal,
) -> Option<SignalChange> {
    let change_type = if !historical.label.is_directional() {
        if current.label.is_directional() {
            ChangeType::New
        } else {
            return None;
        }
    } else if historical.strength >= FADING_MIN_STRENGTH
        && (!current.label.is_directional()
            || strength_drop(historical.strength, current.strength) >= FADING_MIN_DROP)
    {
        ChangeType::Fading
    } else {
        return None;
    };

    Some(SignalChange {
        symbol: symbol.to_string(),
        previous_label: historical.label,
        current_label: current.label,
        previous_strength: historical.strength,
        current_strength: current.strength,
        change_type,
    })
}

/// Detects changes across instruments and keeps the top `limit` of each list.
///
/// Instruments without a historical signal are skipped. New signals rank by
/// current strength, fading signals by strength drop, both descending.
#[must_use]
pub fn detect_changes<I>(comparisons: I, limit: usize) -> SignalChanges
where
    I: IntoIterator<Item = SignalComparison>,
{
    let mut changes = SignalChanges::default();

    for comparison in comparisons {
        let Some(historical) = comparison.historical else {
            continue;
        };
        match classify(&comparison.symbol, &comparison.current, &historical) {
            Some(change) if change.change_type == ChangeType::New => {
                changes.new_signals.push(change);
            }
            Some(change) => changes.fading_signals.push(change),
            None => {}
        }
    }

    changes
        .new_signals
        .sort_by(|a, b| descending(a.current_strength, b.current_strength));
    changes
        .fading_signals
        .sort_by(|a, b| descending(a.strength_drop(), b.strength_drop()));
    changes.new_signals.truncate(limit);
    changes.fading_signals.truncate(limit);

    changes
}

/// Strengths are already rounded to 2 decimals; their raw `f64` difference is
/// not, so 73.99 - 63.99 lands just under 10.
fn strength_drop(previous: f64, current: f64) -> f64 {
    round_dp(previous - current, 2)
}

fn descending(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}
