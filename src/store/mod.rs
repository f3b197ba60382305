//! Country-code-keyed, date-indexed stores.
//!
//! - code↔name registry (`registry`)
//! - time series builder + frozen read-only store (`series`)
//! - best-effort auxiliary value join (`join`)

pub mod join;
pub mod registry;
pub mod series;

pub use join::*;
pub use registry::*;
pub use series::*;
