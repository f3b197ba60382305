//! Reporting utilities: snapshot rows and formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the stores and the view stay clean and testable
//! - output changes are localized
//!
//! The row-building half is shared with the TUI, which renders the same
//! content as widgets instead of text.

pub mod format;

pub use format::*;
