//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can
//! be used in-memory by the stores and exported/inspected without conversion.

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// ISO-3 alpha territory code: the primary join key across all datasets.
///
/// Stored uppercase exactly as the source provides it. A newtype rather than a
/// bare `String` so the registry, series and join APIs cannot mix up codes and
/// display names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CountryCode(String);

impl CountryCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CountryCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CountryCode {
    fn from(code: &str) -> Self {
        Self(code.to_string())
    }
}

/// Daily reported counts for one country.
///
/// Malformed or missing numeric source fields are coerced to 0 during
/// normalization, so these are always usable values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCounts {
    pub cases: u64,
    pub deaths: u64,
}

/// One normalized epidemiological record: a single country on a single day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseRecord {
    pub date: NaiveDate,
    pub code: CountryCode,
    pub name: String,
    pub counts: DailyCounts,
}

/// One normalized auxiliary record: a scalar keyed by country name or code,
/// depending on the configured [`AuxKey`].
#[derive(Debug, Clone, PartialEq)]
pub struct AuxRecord {
    pub key: String,
    pub value: f64,
}

/// A country observed in the world boundary file: code plus display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountrySighting {
    pub code: CountryCode,
    pub name: String,
}

/// Which field keys the auxiliary dataset.
///
/// Both shapes appear in the wild: `{name, value}` in the revision that joins
/// by display name, `{code, value}` in later ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AuxKey {
    /// Join by country display name via the registry.
    Name,
    /// Join by ISO-3 code directly.
    Code,
}

impl std::fmt::Display for AuxKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            AuxKey::Name => "name",
            AuxKey::Code => "code",
        })
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct AtlasConfig {
    /// Carry the most recent prior per-country value into dates with no
    /// record. Off by default; later revisions of the source feed made the
    /// raw per-day shape the one to display.
    pub fill_gaps: bool,
    /// Which field keys the auxiliary dataset.
    pub aux_key: AuxKey,
    /// Initial cursor date; `None` means the latest ingested date.
    pub target_date: Option<NaiveDate>,
    /// Row count for the snapshot report and the TUI table.
    pub top_n: usize,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            fill_gaps: false,
            aux_key: AuxKey::Name,
            target_date: None,
            top_n: 20,
        }
    }
}
