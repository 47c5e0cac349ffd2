//! Symbol reconciliation.
//!
//! Scrapers report symbols as "EURUSD", "EUR_USD", "EUR-USD" or "EUR/USD",
//! sometimes with base and quote reversed relative to the catalog. The
//! reconciler maps them onto a catalog instrument and reports whether the
//! reading has to be inverted (long A/B is short B/A).

use fx_sentiment_core::{compact, Instrument, InstrumentCatalog, Reading};
use serde::Serialize;

/// Lookup strategy that produced a match, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// Normalized symbol equals the canonical symbol
    Exact,
    /// Normalized symbol with legs swapped equals the canonical symbol
    Swapped,
    /// Separator-stripped literal match
    Compact,
    /// Instrument base/quote fields match the legs
    Legs,
    /// Instrument base/quote fields match the swapped legs
    SwappedLegs,
}

impl MatchStrategy {
    /// True when the match was found by reversing base and quote.
    #[must_use]
    pub const fn requires_inversion(self) -> bool {
        matches!(self, Self::Swapped | Self::SwappedLegs)
    }
}

/// A scraped symbol after separator normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedSymbol {
    /// Uppercase, `/`-separated where legs could be identified
    pub symbol: String,
    /// `(base, quote)` when the symbol splits into two legs
    pub legs: Option<(String, String)>,
}

impl NormalizedSymbol {
    /// The symbol with legs reversed, if it has legs.
    #[must_use]
    pub fn swapped(&self) -> Option<String> {
        self.legs.as_ref().map(|(b, q)| format!("{q}/{b}"))
    }
}

/// Normalizes separators to `/` and splits bare 6-character symbols 3/3.
#[must_use]
pub fn normalize_symbol(raw: &str) -> NormalizedSymbol {
    let upper = raw.trim().to_ascii_uppercase();
    let unified: String = upper
        .chars()
        .map(|c| match c {
            '_' | '-' | ' ' | '\\' => '/',
            other => other,
        })
        .collect();

    let parts: Vec<&str> = unified.split('/').filter(|p| !p.is_empty()).collect();

    match parts.as_slice() {
        [base, quote] => NormalizedSymbol {
            symbol: format!("{base}/{quote}"),
            legs: Some(((*base).to_string(), (*quote).to_string())),
        },
        [single] if single.len() == 6 && single.is_ascii() => {
            let (base, quote) = single.split_at(3);
            NormalizedSymbol {
                symbol: format!("{base}/{quote}"),
                legs: Some((base.to_string(), quote.to_string())),
            }
        }
        _ => NormalizedSymbol {
            symbol: parts.join("/"),
            legs: None,
        },
    }
}

/// A resolved instrument and how it was found.
#[derive(Debug, Clone, Copy)]
pub struct Resolution<'a> {
    pub instrument: &'a Instrument,
    pub strategy: MatchStrategy,
}

impl Resolution<'_> {
    #[must_use]
    pub const fn requires_inversion(&self) -> bool {
        self.strategy.requires_inversion()
    }
}

/// A reading mapped onto its canonical instrument.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciledReading {
    pub symbol: String,
    /// Long/short already swapped when `inverted` is set
    pub reading: Reading,
    pub inverted: bool,
    pub strategy: MatchStrategy,
}

/// Maps scraped symbols onto the instrument catalog.
#[derive(Debug, Clone, Copy)]
pub struct SymbolReconciler<'a> {
    catalog: &'a InstrumentCatalog,
}

impl<'a> SymbolReconciler<'a> {
    #[must_use]
    pub const fn new(catalog: &'a InstrumentCatalog) -> Self {
        Self { catalog }
    }

    /// Resolves a raw symbol, trying each strategy in turn.
    #[must_use]
    pub fn resolve(&self, raw_symbol: &str) -> Option<Resolution<'a>> {
        let normalized = normalize_symbol(raw_symbol);
        let found = |instrument: Option<&'a Instrument>, strategy| {
            instrument.map(|instrument| Resolution {
                instrument,
                strategy,
            })
        };

        if let Some(r) = found(self.catalog.get(&normalized.symbol), MatchStrategy::Exact) {
            return Some(r);
        }
        if let Some(swapped) = normalized.swapped() {
            if let Some(r) = found(self.catalog.get(&swapped), MatchStrategy::Swapped) {
                return Some(r);
            }
        }
        if let Some(r) = found(
            self.catalog.get_compact(&compact(raw_symbol)),
            MatchStrategy::Compact,
        ) {
            return Some(r);
        }

        let (base, quote) = normalized.legs.as_ref()?;
        found(self.catalog.get_by_legs(base, quote), MatchStrategy::Legs).or_else(|| {
            found(
                self.catalog.get_by_legs(quote, base),
                MatchStrategy::SwappedLegs,
            )
        })
    }

    /// Resolves a symbol and orients the reading to the canonical instrument.
    ///
    /// Returns `None` when no strategy matches.
    #[must_use]
    pub fn reconcile(&self, raw_symbol: &str, reading: Reading) -> Option<ReconciledReading> {
        let resolution = self.resolve(raw_symbol)?;
        let inverted = resolution.requires_inversion();
        if inverted {
            tracing::debug!(
                raw = raw_symbol,
                symbol = %resolution.instrument.symbol,
                "Inverting reading for reversed symbol"
            );
        }

        Some(ReconciledReading {
            symbol: resolution.instrument.symbol.clone(),
            reading: if inverted { reading.inverted() } else { reading },
            inverted,
            strategy: resolution.strategy,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fx_sentiment_core::AssetClass;

    fn catalog() -> InstrumentCatalog {
        InstrumentCatalog::new(vec![
            Instrument::forex("EUR", "USD"),
            Instrument::forex("CHF", "USD"),
            Instrument::forex("GBP", "JPY"),
            Instrument::new("XAU", "USD", AssetClass::Commodity),
            Instrument {
                symbol: "US30".to_string(),
                base: "US30".to_string(),
                quote: "USD".to_string(),
                asset_class: AssetClass::Index,
            },
            Instrument {
                symbol: "BTCUSD".to_string(),
                base: "BTC".to_string(),
                quote: "USD".to_string(),
                asset_class: AssetClass::Crypto,
            },
        ])
    }

    #[test]
    fn normalize_handles_every_separator() {
        for raw in ["EURUSD", "EUR_USD", "EUR-USD", "EUR/USD", " eur/usd "] {
            let n = normalize_symbol(raw);
            assert_eq!(n.symbol, "EUR/USD", "raw={raw}");
            assert_eq!(n.legs, Some(("EUR".to_string(), "USD".to_string())));
        }
    }

    #[test]
    fn normalize_leaves_unsplittable_symbols() {
        let n = normalize_symbol("US30");
        assert_eq!(n.symbol, "US30");
        assert!(n.legs.is_none());
    }

    #[test]
    fn exact_match_does_not_invert() {
        let c = catalog();
        let r = SymbolReconciler::new(&c)
            .reconcile("EUR_USD", Reading::new(70.0, 30.0))
            .unwrap();
        assert_eq!(r.symbol, "EUR/USD");
        assert_eq!(r.strategy, MatchStrategy::Exact);
        assert!(!r.inverted);
        assert_eq!(r.reading, Reading::new(70.0, 30.0));
    }

    #[test]
    fn reversed_symbol_swaps_long_and_short() {
        let c = catalog();
        let r = SymbolReconciler::new(&c)
            .reconcile("USDCHF", Reading::new(62.0, 38.0))
            .unwrap();
        assert_eq!(r.symbol, "CHF/USD");
        assert_eq!(r.strategy, MatchStrategy::Swapped);
        assert!(r.inverted);
        assert_eq!(r.reading, Reading::new(38.0, 62.0));
    }

    #[test]
    fn compact_match_for_non_slash_symbols() {
        let c = catalog();
        let reconciler = SymbolReconciler::new(&c);
        let r = reconciler.resolve("us-30").unwrap();
        assert_eq!(r.instrument.symbol, "US30");
        assert_eq!(r.strategy, MatchStrategy::Compact);
    }

    #[test]
    fn leg_lookup_when_symbol_format_differs() {
        let c = catalog();
        let reconciler = SymbolReconciler::new(&c);

        // BTCUSD is stored without a slash; "BTC/USD" compacts to it first
        let r = reconciler.resolve("BTC/USD").unwrap();
        assert_eq!(r.instrument.symbol, "BTCUSD");
        assert_eq!(r.strategy, MatchStrategy::Compact);

        let r = reconciler.resolve("USD-BTC").unwrap();
        assert_eq!(r.instrument.symbol, "BTCUSD");
        assert_eq!(r.strategy, MatchStrategy::SwappedLegs);
        assert!(r.requires_inversion());
    }

    #[test]
    fn legs_strategy_matches_stored_fields() {
        let c = InstrumentCatalog::new(vec![Instrument {
            symbol: "GOLD".to_string(),
            base: "XAU".to_string(),
            quote: "USD".to_string(),
            asset_class: AssetClass::Commodity,
        }]);
        let r = SymbolReconciler::new(&c).resolve("XAU_USD").unwrap();
        assert_eq!(r.instrument.symbol, "GOLD");
        assert_eq!(r.strategy, MatchStrategy::Legs);
        assert!(!r.requires_inversion());
    }

    #[test]
    fn unknown_symbol_is_unresolved() {
        let c = catalog();
        let reconciler = SymbolReconciler::new(&c);
        assert!(reconciler.resolve("NZDSEK").is_none());
        assert!(reconciler
            .reconcile("???", Reading::new(50.0, 50.0))
            .is_none());
    }
}
