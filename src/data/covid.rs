//! COVID feed deserialization and row-level normalization.
//!
//! The feed is `{records: [...]}` with per-record `day`/`month`/`year` split
//! date fields, a `dateRep` string, an ISO-3 territory code, a display name,
//! and `cases`/`deaths`. Numeric fields arrive as JSON numbers or strings
//! depending on feed revision; both are accepted and malformed values coerce
//! to 0. A record whose date cannot be formed, or that has no territory code,
//! is dropped with a [`RowError`] and ingestion continues.

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;

use crate::data::RowError;
use crate::domain::{CaseRecord, CountryCode, DailyCounts};
use crate::error::{AppError, AtlasError};

#[derive(Debug, Deserialize)]
struct RawFeed {
    records: Vec<RawRecord>,
}

#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(default, rename = "dateRep")]
    date_rep: Option<String>,
    #[serde(default)]
    day: Option<Value>,
    #[serde(default)]
    month: Option<Value>,
    #[serde(default)]
    year: Option<Value>,
    #[serde(default, rename = "countryterritoryCode")]
    country_territory_code: Option<String>,
    #[serde(default, rename = "countriesAndTerritories")]
    countries_and_territories: Option<String>,
    #[serde(default)]
    cases: Option<Value>,
    #[serde(default)]
    deaths: Option<Value>,
}

/// Normalization output: usable records plus what was dropped along the way.
#[derive(Debug, Clone)]
pub struct CovidIngest {
    pub records: Vec<CaseRecord>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

/// Parse the feed body and normalize every record.
pub fn parse_covid_feed(body: &str) -> Result<CovidIngest, AppError> {
    let feed: RawFeed = serde_json::from_str(body)
        .map_err(|e| AppError::new(4, format!("Invalid COVID feed JSON: {e}")))?;

    let rows_read = feed.records.len();
    let mut records = Vec::with_capacity(rows_read);
    let mut row_errors = Vec::new();

    for (index, raw) in feed.records.iter().enumerate() {
        match normalize_record(raw) {
            Ok(rec) => records.push(rec),
            Err(message) => row_errors.push(RowError {
                index,
                id: raw
                    .countries_and_territories
                    .clone()
                    .or_else(|| raw.country_territory_code.clone()),
                message,
            }),
        }
    }

    Ok(CovidIngest {
        records,
        row_errors,
        rows_read,
    })
}

fn normalize_record(raw: &RawRecord) -> Result<CaseRecord, String> {
    let code = raw
        .country_territory_code
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| "missing territory code".to_string())?;

    let date = record_date(raw).map_err(|e| e.to_string())?;

    // Feed display names use underscores ("United_States_of_America");
    // registry names are the spaced form so the by-name aux join can match.
    let name = raw
        .countries_and_territories
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.replace('_', " "))
        .unwrap_or_else(|| code.to_string());

    Ok(CaseRecord {
        date,
        code: CountryCode::from(code),
        name,
        counts: DailyCounts {
            cases: coerce_count(raw.cases.as_ref()),
            deaths: coerce_count(raw.deaths.as_ref()),
        },
    })
}

/// Build the record date from the split fields, falling back to `dateRep`.
fn record_date(raw: &RawRecord) -> Result<NaiveDate, AtlasError> {
    if let (Some(y), Some(m), Some(d)) = (
        field_number(raw.year.as_ref()),
        field_number(raw.month.as_ref()),
        field_number(raw.day.as_ref()),
    ) {
        return NaiveDate::from_ymd_opt(y as i32, m, d)
            .ok_or_else(|| AtlasError::InvalidDate(format!("{y:04}-{m:02}-{d:02}")));
    }

    let Some(rep) = raw.date_rep.as_deref().map(str::trim).filter(|s| !s.is_empty()) else {
        return Err(AtlasError::InvalidDate("missing date fields".to_string()));
    };

    // The feed's dateRep is DD/MM/YYYY; also accept ISO for fixture data.
    const FMTS: [&str; 2] = ["%d/%m/%Y", "%Y-%m-%d"];
    for fmt in FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(rep, fmt) {
            return Ok(d);
        }
    }
    Err(AtlasError::InvalidDate(rep.to_string()))
}

/// A day/month/year field as a number, from either a JSON number or string.
fn field_number(value: Option<&Value>) -> Option<u32> {
    match value? {
        Value::Number(n) => n.as_u64().map(|v| v as u32),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    }
}

/// Coerce a count field to a non-negative integer; anything unusable is 0.
fn coerce_count(value: Option<&Value>) -> u64 {
    match value {
        Some(Value::Number(n)) => {
            if let Some(v) = n.as_u64() {
                v
            } else {
                // Negative corrections and float-typed counts appear in some
                // feed revisions; clamp into the non-negative integers.
                n.as_f64().map_or(0, |f| if f > 0.0 { f as u64 } else { 0 })
            }
        }
        Some(Value::String(s)) => s.trim().parse::<u64>().unwrap_or(0),
        _ => 0,
    }
}
