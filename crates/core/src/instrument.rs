//! Instrument catalog.
//!
//! Instruments are created by catalog setup outside this workspace and are
//! read-only here. The catalog indexes them three ways so the symbol
//! reconciler can try each lookup strategy in constant time.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::currency::Currency;

/// Asset class of an instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetClass {
    Forex,
    Commodity,
    Index,
    Crypto,
}

impl AssetClass {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            AssetClass::Forex => "forex",
            AssetClass::Commodity => "commodity",
            AssetClass::Index => "index",
            AssetClass::Crypto => "crypto",
        }
    }

    /// Parses from string (non-failing version).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "forex" | "fx" => Some(Self::Forex),
            "commodity" | "commodities" => Some(Self::Commodity),
            "index" | "indices" => Some(Self::Index),
            "crypto" => Some(Self::Crypto),
            _ => None,
        }
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AssetClass {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| anyhow::anyhow!("Invalid asset class: {}", s))
    }
}

/// A tradable instrument with its canonical `BASE/QUOTE` symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    /// Canonical uppercase symbol, e.g. "EUR/USD"
    pub symbol: String,
    /// Base leg, e.g. "EUR"
    pub base: String,
    /// Quote leg, e.g. "USD"
    pub quote: String,
    pub asset_class: AssetClass,
}

impl Instrument {
    /// Creates an instrument, deriving the symbol from its legs as given.
    pub fn new(base: impl Into<String>, quote: impl Into<String>, asset_class: AssetClass) -> Self {
        let base = base.into().trim().to_ascii_uppercase();
        let quote = quote.into().trim().to_ascii_uppercase();
        Self {
            symbol: format!("{base}/{quote}"),
            base,
            quote,
            asset_class,
        }
    }

    /// Shorthand for a forex instrument.
    pub fn forex(base: impl Into<String>, quote: impl Into<String>) -> Self {
        Self::new(base, quote, AssetClass::Forex)
    }

    /// Returns the `(base, quote)` majors if this is a forex pair of two majors.
    #[must_use]
    pub fn currency_pair(&self) -> Option<(Currency, Currency)> {
        if self.asset_class != AssetClass::Forex {
            return None;
        }
        Some((Currency::parse(&self.base)?, Currency::parse(&self.quote)?))
    }

    /// Symbol with separators removed, e.g. "EURUSD".
    #[must_use]
    pub fn compact_symbol(&self) -> String {
        compact(&self.symbol)
    }
}

/// Strips every non-alphanumeric character and uppercases.
#[must_use]
pub fn compact(symbol: &str) -> String {
    symbol
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Read-only, indexed view over the instrument catalog.
#[derive(Debug, Clone, Default)]
pub struct InstrumentCatalog {
    instruments: Vec<Instrument>,
    by_symbol: HashMap<String, usize>,
    by_compact: HashMap<String, usize>,
    by_legs: HashMap<(String, String), usize>,
}

impl InstrumentCatalog {
    /// Builds the catalog. Duplicate symbols keep the first occurrence.
    #[must_use]
    pub fn new(instruments: Vec<Instrument>) -> Self {
        let mut catalog = Self::default();
        for instrument in instruments {
            if catalog.by_symbol.contains_key(&instrument.symbol) {
                tracing::warn!(symbol = %instrument.symbol, "Duplicate instrument in catalog, ignoring");
                continue;
            }
            let idx = catalog.instruments.len();
            catalog.by_symbol.insert(instrument.symbol.clone(), idx);
            catalog
                .by_compact
                .entry(instrument.compact_symbol())
                .or_insert(idx);
            catalog
                .by_legs
                .entry((instrument.base.clone(), instrument.quote.clone()))
                .or_insert(idx);
            catalog.instruments.push(instrument);
        }
        catalog
    }

    /// Exact lookup by canonical symbol.
    #[must_use]
    pub fn get(&self, symbol: &str) -> Option<&Instrument> {
        self.by_symbol.get(symbol).map(|&i| &self.instruments[i])
    }

    /// Lookup by separator-stripped symbol.
    #[must_use]
    pub fn get_compact(&self, compact_symbol: &str) -> Option<&Instrument> {
        self.by_compact
            .get(compact_symbol)
            .map(|&i| &self.instruments[i])
    }

    /// Lookup by the instrument's stored base and quote fields.
    #[must_use]
    pub fn get_by_legs(&self, base: &str, quote: &str) -> Option<&Instrument> {
        self.by_legs
            .get(&(base.to_string(), quote.to_string()))
            .map(|&i| &self.instruments[i])
    }

    /// Iterates instruments in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Instrument> {
        self.instruments.iter()
    }

    /// Iterates forex instruments whose legs are both majors.
    pub fn currency_pairs(&self) -> impl Iterator<Item = (&Instrument, Currency, Currency)> {
        self.instruments
            .iter()
            .filter_map(|i| i.currency_pair().map(|(b, q)| (i, b, q)))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }
}

impl FromIterator<Instrument> for InstrumentCatalog {
    fn from_iter<T: IntoIterator<Item = Instrument>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
