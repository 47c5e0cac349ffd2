//! Instrument and source catalog rows.
//!
//! Both catalogs are owned by an external setup step; this crate only reads them.

use anyhow::{anyhow, Result};
use fx_sentiment_core::{AssetClass, Instrument, SourceStatus};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct InstrumentRecord {
    pub symbol: String,
    pub base: String,
    pub quote: String,
    /// "forex", "commodity", "index" or "crypto"
    pub asset_class: String,
}

impl InstrumentRecord {
    #[must_use]
    pub fn from_instrument(instrument: &Instrument) -> Self {
        Self {
            symbol: instrument.symbol.clone(),
            base: instrument.base.clone(),
            quote: instrument.quote.clone(),
            asset_class: instrument.asset_class.as_str().to_string(),
        }
    }

    /// # Errors
    /// Returns an error if the asset class is not recognised.
    pub fn to_instrument(&self) -> Result<Instrument> {
        let asset_class = AssetClass::parse(&self.asset_class).ok_or_else(|| {
            anyhow!(
                "Unknown asset class {} for {}",
                self.asset_class,
                self.symbol
            )
        })?;

        Ok(Instrument {
            symbol: self.symbol.trim().to_ascii_uppercase(),
            base: self.base.trim().to_ascii_uppercase(),
            quote: self.quote.trim().to_ascii_uppercase(),
            asset_class,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SourceRecord {
    pub name: String,
    pub active: bool,
}

impl From<SourceRecord> for SourceStatus {
    fn from(record: SourceRecord) -> Self {
        Self {
            name: record.name,
            active: record.active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instrument_record_round_trip_keeps_symbol() {
        let record = InstrumentRecord {
            symbol: "xau/usd".to_string(),
            base: "xau".to_string(),
            quote: "usd".to_string(),
            asset_class: "commodities".to_string(),
        };

        let instrument = record.to_instrument().unwrap();

        assert_eq!(instrument.symbol, "XAU/USD");
        assert_eq!(instrument.asset_class, AssetClass::Commodity);
        assert_eq!(
            InstrumentRecord::from_instrument(&instrument).asset_class,
            "commodity"
        );
    }

    #[test]
    fn unknown_asset_class_is_an_error() {
        let record = InstrumentRecord {
            symbol: "FOO/BAR".to_string(),
            base: "FOO".to_string(),
            quote: "BAR".to_string(),
            asset_class: "bonds".to_string(),
        };
        assert!(record.to_instrument().is_err());
    }

    #[test]
    fn source_record_into_status() {
        let status: SourceStatus = SourceRecord {
            name: "fxblue".to_string(),
            active: false,
        }
        .into();
        assert_eq!(status.name, "fxblue");
        assert!(!status.active);
    }
}
