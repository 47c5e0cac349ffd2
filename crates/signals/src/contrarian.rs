//! Contrarian signal from a blended long/short split.
//!
//! Retail crowds tend to be positioned against the next move, so a crowd that
//! is heavily long produces a short bias and vice versa.

use fx_sentiment_core::round_dp;
use serde::{Deserialize, Serialize};

use crate::blend::BlendedState;

/// Minimum long/short gap, in percentage points, for a directional signal.
///
/// Inclusive: a gap of exactly 19.0 fires.
pub const CONTRARIAN_THRESHOLD: f64 = 19.0;

/// Trading stance implied by the crowd.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Bias {
    Long,
    Short,
    Neutral,
}

/// Display label for a bias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalLabel {
    Bullish,
    Bearish,
    Neutral,
}

impl SignalLabel {
    #[must_use]
    pub const fn is_directional(self) -> bool {
        !matches!(self, Self::Neutral)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContrarianSignal {
    pub bias: Bias,
    pub label: SignalLabel,
    /// `|long - short|`, 0..=100
    pub strength: f64,
}

impl ContrarianSignal {
    #[must_use]
    pub fn from_blend(state: &BlendedState) -> Self {
        contrarian(state.blended_long, state.blended_short)
    }
}

/// Derives the contrarian signal for a long/short split.
#[must_use]
pub fn contrarian(long_percent: f64, short_percent: f64) -> ContrarianSignal {
    let gap = (long_percent - short_percent).abs();
    let strength = round_dp(gap, 2);

    let (bias, label) = if gap < CONTRARIAN_THRESHOLD {
        (Bias::Neutral, SignalLabel::Neutral)
    } else if long_percent > short_percent {
        (Bias::Short, SignalLabel::Bearish)
    } else {
        (Bias::Long, SignalLabel::Bullish)
    };

    ContrarianSignal {
        bias,
        label,
        strength,
    }
}
