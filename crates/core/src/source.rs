//! Positioning sources and their fixed blend weights.
//!
//! The weight table is a constant of the engine. Adding a source means adding
//! one enum variant and one row to [`SOURCE_WEIGHTS`]; every blend is driven
//! from that table.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A retail positioning source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Myfxbook,
    Oanda,
    Dukascopy,
    Forexfactory,
    Fxblue,
}

/// Number of known sources.
pub const SOURCE_COUNT: usize = 5;

/// Fixed blend weights, in display order.
pub const SOURCE_WEIGHTS: [(Source, u32); SOURCE_COUNT] = [
    (Source::Myfxbook, 2),
    (Source::Oanda, 2),
    (Source::Dukascopy, 1),
    (Source::Forexfactory, 1),
    (Source::Fxblue, 1),
];

impl Source {
    /// All sources in weight-table order.
    pub const ALL: [Self; SOURCE_COUNT] = [
        Self::Myfxbook,
        Self::Oanda,
        Self::Dukascopy,
        Self::Forexfactory,
        Self::Fxblue,
    ];

    /// Canonical lowercase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Source::Myfxbook => "myfxbook",
            Source::Oanda => "oanda",
            Source::Dukascopy => "dukascopy",
            Source::Forexfactory => "forexfactory",
            Source::Fxblue => "fxblue",
        }
    }

    /// Slot index in the weight table.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Blend weight from the static table.
    #[must_use]
    pub const fn weight(self) -> u32 {
        SOURCE_WEIGHTS[self.index()].1
    }

    /// Parses a source name, case-insensitive.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|s| s.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Source {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| anyhow::anyhow!("Unknown source: {}", s))
    }
}

/// A source catalog row as stored by the catalog owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceStatus {
    pub name: String,
    pub active: bool,
}

/// Active flags per source.
///
/// Sources missing from the stored catalog are active; the weight table is the
/// authority on which sources exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceCatalog {
    active: [bool; SOURCE_COUNT],
}

impl Default for SourceCatalog {
    fn default() -> Self {
        Self {
            active: [true; SOURCE_COUNT],
        }
    }
}

impl SourceCatalog {
    /// Builds the catalog from stored rows. Unknown names are ignored.
    #[must_use]
    pub fn from_statuses(rows: &[SourceStatus]) -> Self {
        let mut catalog = Self::default();
        for row in rows {
            match Source::parse(&row.name) {
                Some(source) => catalog.active[source.index()] = row.active,
                None => tracing::debug!(name = %row.name, "Ignoring unknown source in catalog"),
            }
        }
        catalog
    }

    /// Applies configuration overrides that switch sources off.
    #[must_use]
    pub fn with_disabled<S: AsRef<str>>(mut self, disabled: &[S]) -> Self {
        for name in disabled {
            match Source::parse(name.as_ref()) {
                Some(source) => self.active[source.index()] = false,
                None => tracing::warn!(name = name.as_ref(), "Unknown source in disabled list"),
            }
        }
        self
    }

    #[must_use]
    pub fn is_active(&self, source: Source) -> bool {
        self.active[source.index()]
    }

    /// Active sources in weight-table order.
    pub fn active_sources(&self) -> impl Iterator<Item = Source> + '_ {
        Source::ALL.into_iter().filter(|s| self.is_active(*s))
    }
}
