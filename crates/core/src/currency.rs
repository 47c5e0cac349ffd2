//! Major currencies and the canonical pair ordering.
//!
//! The base leg of a canonical forex symbol is chosen by a fixed priority
//! table (EUR > GBP > AUD > NZD > USD > CAD > CHF > JPY), never alphabetically.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the eight tracked major currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Eur,
    Gbp,
    Aud,
    Nzd,
    Usd,
    Cad,
    Chf,
    Jpy,
}

impl Currency {
    /// All majors in priority order.
    pub const ALL: [Self; 8] = [
        Self::Eur,
        Self::Gbp,
        Self::Aud,
        Self::Nzd,
        Self::Usd,
        Self::Cad,
        Self::Chf,
        Self::Jpy,
    ];

    /// Growth-sensitive currencies used for the risk score.
    pub const RISK: [Self; 3] = [Self::Aud, Self::Nzd, Self::Cad];

    /// Safe-haven currencies used for the safe-haven score.
    pub const SAFE_HAVEN: [Self; 2] = [Self::Jpy, Self::Chf];

    /// ISO code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Eur => "EUR",
            Self::Gbp => "GBP",
            Self::Aud => "AUD",
            Self::Nzd => "NZD",
            Self::Usd => "USD",
            Self::Cad => "CAD",
            Self::Chf => "CHF",
            Self::Jpy => "JPY",
        }
    }

    /// Position in the base-selection table. Lower wins the base slot.
    #[must_use]
    pub const fn priority(self) -> usize {
        self as usize
    }

    /// Parses an ISO code, case-insensitive.
    #[must_use]
    pub fn parse(code: &str) -> Option<Self> {
        let code = code.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.code().eq_ignore_ascii_case(code))
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Currency {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| anyhow::anyhow!("Unknown currency: {}", s))
    }
}

/// Orders two legs into `(base, quote)` using the priority table.
///
/// Reordering only happens when both legs are majors; anything else keeps
/// the order it was given in.
#[must_use]
pub fn canonical_legs<'a>(first: &'a str, second: &'a str) -> (&'a str, &'a str) {
    match (Currency::parse(first), Currency::parse(second)) {
        (Some(a), Some(b)) if b.priority() < a.priority() => (second, first),
        _ => (first, second),
    }
}

/// Builds the canonical uppercase `BASE/QUOTE` symbol for two legs.
#[must_use]
pub fn canonical_symbol(first: &str, second: &str) -> String {
    let (base, quote) = canonical_legs(first, second);
    format!(
        "{}/{}",
        base.trim().to_ascii_uppercase(),
        quote.trim().to_ascii_uppercase()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_follows_table_not_alphabet() {
        assert!(Currency::Eur.priority() < Currency::Gbp.priority());
        assert!(Currency::Aud.priority() < Currency::Usd.priority());
        assert!(Currency::Chf.priority() < Currency::Jpy.priority());
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(Currency::parse("usd"), Some(Currency::Usd));
        assert_eq!(Currency::parse(" Jpy "), Some(Currency::Jpy));
        assert_eq!(Currency::parse("XAU"), None);
    }

    #[test]
    fn canonical_symbol_picks_base_by_priority() {
        assert_eq!(canonical_symbol("USD", "EUR"), "EUR/USD");
        assert_eq!(canonical_symbol("jpy", "aud"), "AUD/JPY");
        // Alphabetical order would give CAD/USD
        assert_eq!(canonical_symbol("CAD", "USD"), "USD/CAD");
    }

    #[test]
    fn canonical_symbol_keeps_order_for_non_majors() {
        assert_eq!(canonical_symbol("XAU", "USD"), "XAU/USD");
        assert_eq!(canonical_symbol("USD", "XAU"), "USD/XAU");
    }

    #[test]
    fn currency_serializes_uppercase() {
        let json = serde_json::to_string(&Currency::Nzd).unwrap();
        assert_eq!(json, "\"NZD\"");
    }
}
