//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the country join key (`CountryCode`) and per-day counts (`DailyCounts`)
//! - normalized dataset records (`CaseRecord`, `AuxRecord`, `CountrySighting`)
//! - run configuration (`AtlasConfig`, `AuxKey`)

pub mod types;

pub use types::*;
