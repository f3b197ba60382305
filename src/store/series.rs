//! Date-indexed time series store.
//!
//! Two phases: a mutable [`SeriesBuilder`] accumulates records while fetch
//! callbacks arrive, then `finalize` freezes it into a read-only
//! [`CaseSeries`] whose date index is the single source of truth for
//! ordering. Keying by `NaiveDate` keeps the index in true calendar order no
//! matter what order (or format) records arrived in.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;

use crate::domain::{CaseRecord, CountryCode, DailyCounts};
use crate::error::AtlasError;
use crate::store::CountryRegistry;

type CountryTable = HashMap<CountryCode, DailyCounts>;

/// Accumulates records before the date index exists.
#[derive(Debug, Clone, Default)]
pub struct SeriesBuilder {
    by_date: BTreeMap<NaiveDate, CountryTable>,
}

impl SeriesBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert normalized records, registering each country sighting.
    ///
    /// A repeated (date, country) pair overwrites: the last record in feed
    /// order is the one the feed intends.
    pub fn ingest(&mut self, records: &[CaseRecord], registry: &mut CountryRegistry) {
        for rec in records {
            registry.register_sighting(&rec.code, &rec.name);
            self.by_date
                .entry(rec.date)
                .or_default()
                .insert(rec.code.clone(), rec.counts);
        }
    }

    /// Freeze into a read-only store with a sorted distinct date index.
    ///
    /// With `fill_gaps` set, each country's most recent prior value is carried
    /// forward into dates where it has no record.
    pub fn finalize(self, fill_gaps: bool) -> CaseSeries {
        let mut by_date = self.by_date;
        let dates: Vec<NaiveDate> = by_date.keys().copied().collect();

        if fill_gaps {
            // values_mut walks dates in ascending key order, which is exactly
            // the order carry-forward needs.
            let mut last_seen: CountryTable = HashMap::new();
            for table in by_date.values_mut() {
                for (code, counts) in table.iter() {
                    last_seen.insert(code.clone(), *counts);
                }
                for (code, counts) in &last_seen {
                    table.entry(code.clone()).or_insert(*counts);
                }
            }
        }

        CaseSeries { dates, by_date }
    }
}

/// Read-only date → country → counts store.
#[derive(Debug, Clone)]
pub struct CaseSeries {
    /// Distinct dates, ascending calendar order.
    dates: Vec<NaiveDate>,
    by_date: BTreeMap<NaiveDate, CountryTable>,
}

impl CaseSeries {
    /// The sorted date index.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Counts for `code` on `date`; `None` means "no data", not an error.
    pub fn record_at(&self, date: NaiveDate, code: &CountryCode) -> Option<DailyCounts> {
        self.by_date.get(&date)?.get(code).copied()
    }

    pub fn latest_date(&self) -> Result<NaiveDate, AtlasError> {
        self.dates.last().copied().ok_or(AtlasError::EmptyStore)
    }

    /// Map a normalized slider position in [0, 1] to an indexed date.
    ///
    /// `floor(f * date_count)` clamped to the valid index range, so 0.0 maps
    /// to the first date and 1.0 to the last. Pure and deterministic.
    pub fn date_at_fraction(&self, fraction: f64) -> Result<NaiveDate, AtlasError> {
        if self.dates.is_empty() {
            return Err(AtlasError::EmptyStore);
        }
        let f = fraction.clamp(0.0, 1.0);
        let idx = ((f * self.dates.len() as f64) as usize).min(self.dates.len() - 1);
        Ok(self.dates[idx])
    }

    /// The nearest indexed date at or before `date`; the first date when
    /// `date` precedes the whole index.
    pub fn nearest_date(&self, date: NaiveDate) -> Result<NaiveDate, AtlasError> {
        if self.dates.is_empty() {
            return Err(AtlasError::EmptyStore);
        }
        let idx = self.dates.partition_point(|&d| d <= date);
        Ok(self.dates[idx.saturating_sub(1)])
    }

    /// Per-date counts for one country across the whole index, `None` where
    /// it has no record. Used by the chart front-end.
    pub fn country_series(&self, code: &CountryCode) -> Vec<(NaiveDate, Option<DailyCounts>)> {
        self.dates
            .iter()
            .map(|&d| (d, self.record_at(d, code)))
            .collect()
    }
}
