//! Currency strength and risk regime.
//!
//! Each currency pair's net positioning (`long - short`) is credited to the
//! base currency and debited from the quote currency. A currency's strength
//! is the mean of those contributions; the risk regime compares growth-linked
//! currencies against safe havens.

use fx_sentiment_core::{round_dp, Currency};
use serde::{Deserialize, Serialize};

use crate::blend::BlendedState;

/// Risk minus safe-haven gap, in strength points, needed to call a regime.
pub const RISK_DELTA_THRESHOLD: f64 = 5.0;

/// Blended net positioning for one currency pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairNet {
    pub base: Currency,
    pub quote: Currency,
    /// `blended_long - blended_short`
    pub net: f64,
}

impl PairNet {
    #[must_use]
    pub fn from_blend(base: Currency, quote: Currency, state: &BlendedState) -> Self {
        Self {
            base,
            quote,
            net: state.net(),
        }
    }

    /// Signed contribution to `currency`, if the pair contains it.
    #[must_use]
    pub fn contribution(&self, currency: Currency) -> Option<f64> {
        if currency == self.base {
            Some(self.net)
        } else if currency == self.quote {
            Some(-self.net)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurrencyStrength {
    pub currency: Currency,
    pub strength: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskStatus {
    #[serde(rename = "RISK-ON")]
    RiskOn,
    #[serde(rename = "RISK-OFF")]
    RiskOff,
    #[serde(rename = "NEUTRAL")]
    Neutral,
}

impl RiskStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            RiskStatus::RiskOn => "RISK-ON",
            RiskStatus::RiskOff => "RISK-OFF",
            RiskStatus::Neutral => "NEUTRAL",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskSentiment {
    pub status: RiskStatus,
    pub risk_score: f64,
    pub safe_haven_score: f64,
    pub delta: f64,
}

/// Strength for each of the eight majors, strongest first.
///
/// A currency in no pair scores 0. Ties keep the base-priority order.
#[must_use]
pub fn currency_strength(pairs: &[PairNet]) -> Vec<CurrencyStrength> {
    let mut strengths: Vec<CurrencyStrength> = Currency::ALL
        .into_iter()
        .map(|currency| {
            let (sum, count) = pairs
                .iter()
                .filter_map(|p| p.contribution(currency))
                .fold((0.0, 0usize), |(sum, n), c| (sum + c, n + 1));
            let strength = if count == 0 {
                0.0
            } else {
                round_dp(sum / count as f64, 1)
            };
            CurrencyStrength { currency, strength }
        })
        .collect();

    strengths.sort_by(|a, b| b.strength.total_cmp(&a.strength));
    strengths
}

/// Classifies the risk regime from currency strengths.
#[must_use]
pub fn risk_sentiment(strengths: &[CurrencyStrength]) -> RiskSentiment {
    let mean_of = |group: &[Currency]| {
        let total: f64 = group
            .iter()
            .map(|c| {
                strengths
                    .iter()
                    .find(|s| s.currency == *c)
                    .map_or(0.0, |s| s.strength)
            })
            .sum();
        round_dp(total / group.len() as f64, 1)
    };

    let risk_score = mean_of(&Currency::RISK);
    let safe_haven_score = mean_of(&Currency::SAFE_HAVEN);
    let delta = round_dp(risk_score - safe_haven_score, 1);

    let status = if delta > RISK_DELTA_THRESHOLD {
        RiskStatus::RiskOn
    } else if delta < -RISK_DELTA_THRESHOLD {
        RiskStatus::RiskOff
    } else {
        RiskStatus::Neutral
    };

    RiskSentiment {
        status,
        risk_score,
        safe_haven_score,
        delta,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(base: Currency, quote: Currency, long: f64) -> PairNet {
        PairNet {
            base,
            quote,
            net: long - (100.0 - long),
        }
    }

    fn strength_of(list: &[CurrencyStrength], c: Currency) -> f64 {
        list.iter().find(|s| s.currency == c).unwrap().strength
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn base_gains_quote_loses() {
        // EUR/USD 70/30 → net +40
        let list = currency_strength(&[pair(Currency::Eur, Currency::Usd, 70.0)]);
        assert_close(strength_of(&list, Currency::Eur), 40.0);
        assert_close(strength_of(&list, Currency::Usd), -40.0);
    }

    #[test]
    fn strength_is_mean_of_contributions() {
        let list = currency_strength(&[
            pair(Currency::Eur, Currency::Usd, 70.0), // USD -40
            pair(Currency::Usd, Currency::Jpy, 55.0), // USD +10
            pair(Currency::Gbp, Currency::Usd, 40.0), // USD +20
        ]);
        // (-40 + 10 + 20) / 3 = -3.333 → -3.3
        assert_close(strength_of(&list, Currency::Usd), -3.3);
    }

    #[test]
    fn absent_currency_scores_zero_and_ranks_last() {
        let list = currency_strength(&[
            pair(Currency::Eur, Currency::Usd, 60.0),
            pair(Currency::Gbp, Currency::Jpy, 60.0),
            pair(Currency::Aud, Currency::Cad, 60.0),
            pair(Currency::Nzd, Currency::Chf, 60.0),
        ]);
        assert_eq!(list.len(), 8);
        // Bases at +20, quotes at -20
        assert!(list[..4].iter().all(|s| s.strength > 0.0));

        let list = currency_strength(&[pair(Currency::Eur, Currency::Usd, 70.0)]);
        assert_close(strength_of(&list, Currency::Nzd), 0.0);
        let last = list.last().unwrap();
        assert_eq!(last.currency, Currency::Usd);
        // Zero-strength currencies sit between EUR and USD, in priority order
        let zeros: Vec<_> = list
            .iter()
            .filter(|s| s.strength == 0.0)
            .map(|s| s.currency)
            .collect();
        assert_eq!(
            zeros,
            vec![
                Currency::Gbp,
                Currency::Aud,
                Currency::Nzd,
                Currency::Cad,
                Currency::Chf,
                Currency::Jpy
            ]
        );
    }

    #[test]
    fn no_pairs_all_zero() {
        let list = currency_strength(&[]);
        assert!(list.iter().all(|s| s.strength == 0.0));
        assert_eq!(list[0].currency, Currency::Eur);
    }

    #[test]
    fn risk_on_when_commodity_currencies_lead() {
        let strengths = currency_strength(&[
            pair(Currency::Aud, Currency::Jpy, 70.0),
            pair(Currency::Nzd, Currency::Chf, 70.0),
            pair(Currency::Cad, Currency::Jpy, 70.0),
        ]);
        let risk = risk_sentiment(&strengths);
        assert_close(risk.risk_score, 40.0);
        assert_close(risk.safe_haven_score, -40.0);
        assert_close(risk.delta, 80.0);
        assert_eq!(risk.status, RiskStatus::RiskOn);
    }

    #[test]
    fn risk_off_when_safe_havens_lead() {
        let strengths = currency_strength(&[pair(Currency::Aud, Currency::Jpy, 30.0)]);
        let risk = risk_sentiment(&strengths);
        // AUD -40, NZD 0, CAD 0 → risk -13.3; JPY +40, CHF 0 → safe 20
        assert_close(risk.risk_score, -13.3);
        assert_close(risk.safe_haven_score, 20.0);
        assert_eq!(risk.status, RiskStatus::RiskOff);
    }

    #[test]
    fn neutral_inside_band() {
        let strengths = currency_strength(&[pair(Currency::Aud, Currency::Usd, 52.0)]);
        let risk = risk_sentiment(&strengths);
        // AUD +4 → risk 1.3, safe 0
        assert_eq!(risk.status, RiskStatus::Neutral);
        assert_eq!(risk_sentiment(&[]).status, RiskStatus::Neutral);
    }

    #[test]
    fn status_serializes_with_hyphen() {
        assert_eq!(
            serde_json::to_string(&RiskStatus::RiskOff).unwrap(),
            "\"RISK-OFF\""
        );
        assert_eq!(RiskStatus::RiskOn.as_str(), "RISK-ON");
    }
}
