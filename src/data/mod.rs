//! Dataset acquisition and normalization.
//!
//! - URL-or-file sources with env overrides (`source`)
//! - COVID feed → normalized case records (`covid`)
//! - auxiliary food-security dataset (`foodsec`)
//! - world boundary GeoJSON → country sightings (`world`)

pub mod covid;
pub mod foodsec;
pub mod source;
pub mod world;

pub use covid::*;
pub use foodsec::*;
pub use source::*;
pub use world::*;

/// A row-level problem encountered while normalizing a dataset.
///
/// Bad rows are dropped and reported, never fatal to the whole dataset.
#[derive(Debug, Clone)]
pub struct RowError {
    /// Zero-based index of the row in the source.
    pub index: usize,
    /// Country name or code when the row carried one.
    pub id: Option<String>,
    pub message: String,
}

impl std::fmt::Display for RowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.id {
            Some(id) => write!(f, "row {} ({id}): {}", self.index, self.message),
            None => write!(f, "row {}: {}", self.index, self.message),
        }
    }
}
