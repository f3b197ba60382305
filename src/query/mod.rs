//! The read surface a renderer draws from.
//!
//! [`MapView`] owns the frozen stores plus the only mutable piece of state in
//! the system: the date cursor. Everything a front-end needs for one frame
//! (name, bubble magnitude, color value, counts) is answered here without
//! touching the ingestion layer.

use chrono::NaiveDate;

use crate::domain::{CountryCode, DailyCounts};
use crate::error::AtlasError;
use crate::store::{AuxJoin, CaseSeries, CountryRegistry};

/// Bubble radius scale applied to `ln(cases)`.
///
/// A presentation parameter; the invariants are monotonicity in `cases` and
/// zero-at-zero.
pub const BUBBLE_SCALE: f64 = 3.0;

/// One visualization instance: stores plus the current date cursor.
///
/// Owning everything in one struct (rather than module-level state) means
/// multiple independent views can coexist and tests need no setup rituals.
#[derive(Debug, Clone)]
pub struct MapView {
    registry: CountryRegistry,
    series: CaseSeries,
    aux: AuxJoin,
    cursor: NaiveDate,
}

impl MapView {
    /// Build a view over finalized stores, starting at the latest date.
    ///
    /// Fails with `EmptyStore` when nothing was ingested: a view with no
    /// dates has no valid cursor position.
    pub fn new(
        registry: CountryRegistry,
        series: CaseSeries,
        aux: AuxJoin,
    ) -> Result<Self, AtlasError> {
        let cursor = series.latest_date()?;
        Ok(Self {
            registry,
            series,
            aux,
            cursor,
        })
    }

    pub fn registry(&self) -> &CountryRegistry {
        &self.registry
    }

    pub fn series(&self) -> &CaseSeries {
        &self.series
    }

    pub fn aux(&self) -> &AuxJoin {
        &self.aux
    }

    /// The currently selected date.
    pub fn cursor(&self) -> NaiveDate {
        self.cursor
    }

    /// Move the cursor to `date`, snapping to the nearest indexed date at or
    /// before it. The cursor always lands on a date the series contains.
    pub fn set_cursor(&mut self, date: NaiveDate) {
        if let Ok(snapped) = self.series.nearest_date(date) {
            self.cursor = snapped;
        }
    }

    /// Slider entry point: move the cursor by normalized position in [0, 1].
    pub fn set_cursor_fraction(&mut self, fraction: f64) {
        if let Ok(date) = self.series.date_at_fraction(fraction) {
            self.cursor = date;
        }
    }

    pub fn name_of(&self, code: &CountryCode) -> Result<&str, AtlasError> {
        self.registry.name_of(code)
    }

    /// Counts for `code` at the cursor date; `None` means no data.
    pub fn record_at_cursor(&self, code: &CountryCode) -> Option<DailyCounts> {
        self.series.record_at(self.cursor, code)
    }

    /// Display magnitude for the case bubble at the cursor date.
    ///
    /// 0 when the country has no data or no cases; otherwise a
    /// log-compressed, monotonically increasing function of the case count.
    pub fn bubble_magnitude(&self, code: &CountryCode) -> f64 {
        match self.record_at_cursor(code) {
            None => 0.0,
            Some(DailyCounts { cases: 0, .. }) => 0.0,
            Some(DailyCounts { cases, .. }) => BUBBLE_SCALE * (cases as f64).ln(),
        }
    }

    /// Joined auxiliary value for the color channel.
    ///
    /// `None` is the no-data sentinel; negative source values are outside the
    /// domain convention (valid values are ≥ 0) and also read as no data.
    pub fn aux_color_value(&self, code: &CountryCode) -> Option<f64> {
        self.aux.value(code).filter(|v| *v >= 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CaseRecord, DailyCounts};
    use crate::store::SeriesBuilder;

    fn rec(day: u32, code: &str, cases: u64) -> CaseRecord {
        CaseRecord {
            date: NaiveDate::from_ymd_opt(2020, 3, day).unwrap(),
            code: CountryCode::from(code),
            name: format!("{code}-land"),
            counts: DailyCounts { cases, deaths: 0 },
        }
    }

    fn view(records: &[CaseRecord], aux: AuxJoin) -> MapView {
        let mut registry = CountryRegistry::new();
        let mut builder = SeriesBuilder::new();
        builder.ingest(records, &mut registry);
        MapView::new(registry, builder.finalize(false), aux).unwrap()
    }

    #[test]
    fn starts_at_latest_date() {
        let v = view(&[rec(1, "ITA", 5), rec(9, "ITA", 8)], AuxJoin::default());
        assert_eq!(v.cursor(), NaiveDate::from_ymd_opt(2020, 3, 9).unwrap());
    }

    #[test]
    fn empty_series_cannot_become_a_view() {
        let registry = CountryRegistry::new();
        let series = SeriesBuilder::new().finalize(false);
        assert!(matches!(
            MapView::new(registry, series, AuxJoin::default()),
            Err(AtlasError::EmptyStore)
        ));
    }

    #[test]
    fn bubble_magnitude_is_monotonic_and_zero_at_zero() {
        let v = view(
            &[rec(1, "ZER", 0), rec(1, "ONE", 1), rec(1, "MID", 50), rec(1, "BIG", 5000)],
            AuxJoin::default(),
        );

        let zero = v.bubble_magnitude(&CountryCode::from("ZER"));
        let one = v.bubble_magnitude(&CountryCode::from("ONE"));
        let mid = v.bubble_magnitude(&CountryCode::from("MID"));
        let big = v.bubble_magnitude(&CountryCode::from("BIG"));

        assert_eq!(zero, 0.0);
        assert!(one <= mid && mid < big);
        // No data at all behaves like zero cases.
        assert_eq!(v.bubble_magnitude(&CountryCode::from("N_A")), 0.0);
    }

    #[test]
    fn cursor_moves_by_fraction_and_by_date() {
        let mut v = view(
            &[rec(1, "ITA", 1), rec(2, "ITA", 2), rec(3, "ITA", 3)],
            AuxJoin::default(),
        );

        v.set_cursor_fraction(0.0);
        assert_eq!(v.cursor(), NaiveDate::from_ymd_opt(2020, 3, 1).unwrap());
        assert_eq!(
            v.record_at_cursor(&CountryCode::from("ITA")),
            Some(DailyCounts { cases: 1, deaths: 0 })
        );

        v.set_cursor_fraction(1.0);
        assert_eq!(v.cursor(), NaiveDate::from_ymd_opt(2020, 3, 3).unwrap());

        // An indexed date is taken as-is.
        v.set_cursor(NaiveDate::from_ymd_opt(2020, 3, 2).unwrap());
        assert_eq!(v.cursor(), NaiveDate::from_ymd_opt(2020, 3, 2).unwrap());

        // A date past the index snaps back to the nearest earlier entry.
        v.set_cursor(NaiveDate::from_ymd_opt(2020, 4, 15).unwrap());
        assert_eq!(v.cursor(), NaiveDate::from_ymd_opt(2020, 3, 3).unwrap());
    }

    #[test]
    fn aux_color_value_filters_missing_and_negative() {
        let mut aux = AuxJoin::default();
        aux.values.insert(CountryCode::from("ITA"), 42.0);
        aux.values.insert(CountryCode::from("FRA"), -1.0);

        let v = view(&[rec(1, "ITA", 5), rec(1, "FRA", 5)], aux);

        assert_eq!(v.aux_color_value(&CountryCode::from("ITA")), Some(42.0));
        assert_eq!(v.aux_color_value(&CountryCode::from("FRA")), None);
        assert_eq!(v.aux_color_value(&CountryCode::from("DEU")), None);
    }

    #[test]
    fn unknown_code_reads_as_no_data_not_error() {
        let v = view(&[rec(1, "ITA", 5)], AuxJoin::default());
        let ghost = CountryCode::from("GHO");

        assert_eq!(v.record_at_cursor(&ghost), None);
        assert_eq!(v.bubble_magnitude(&ghost), 0.0);
        assert_eq!(v.aux_color_value(&ghost), None);
        // The registry lookup, by contrast, is explicit.
        assert!(v.name_of(&ghost).is_err());
    }
}
