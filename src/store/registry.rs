//! Bidirectional country code ↔ display name registry.

use std::collections::HashMap;

use crate::domain::CountryCode;
use crate::error::AtlasError;

/// Code↔name mapping populated incrementally as records are ingested.
///
/// First-seen wins: once a code is registered, later sightings are no-ops.
/// The pipeline ingests sources in a fixed order, so the canonical name for a
/// session is deterministic.
#[derive(Debug, Clone, Default)]
pub struct CountryRegistry {
    name_by_code: HashMap<CountryCode, String>,
    code_by_name: HashMap<String, CountryCode>,
}

impl CountryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `code` was seen with display name `name`.
    ///
    /// Idempotent; a code already present keeps its original name.
    pub fn register_sighting(&mut self, code: &CountryCode, name: &str) {
        if self.name_by_code.contains_key(code) {
            return;
        }
        self.name_by_code.insert(code.clone(), name.to_string());
        self.code_by_name.insert(name.to_string(), code.clone());
    }

    pub fn name_of(&self, code: &CountryCode) -> Result<&str, AtlasError> {
        self.name_by_code
            .get(code)
            .map(String::as_str)
            .ok_or_else(|| AtlasError::UnknownCode(code.clone()))
    }

    pub fn code_of(&self, name: &str) -> Result<&CountryCode, AtlasError> {
        self.code_by_name
            .get(name)
            .ok_or_else(|| AtlasError::UnknownName(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.name_by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.name_by_code.is_empty()
    }

    /// All registered codes, in no particular order.
    pub fn codes(&self) -> impl Iterator<Item = &CountryCode> {
        self.name_by_code.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_code_and_name() {
        let mut registry = CountryRegistry::new();
        registry.register_sighting(&CountryCode::from("ITA"), "Italy");

        assert_eq!(registry.name_of(&CountryCode::from("ITA")).unwrap(), "Italy");
        assert_eq!(
            registry.code_of("Italy").unwrap(),
            &CountryCode::from("ITA")
        );
    }

    #[test]
    fn first_sighting_wins() {
        let mut registry = CountryRegistry::new();
        let ita = CountryCode::from("ITA");
        registry.register_sighting(&ita, "Italy");
        registry.register_sighting(&ita, "Italian Republic");

        assert_eq!(registry.name_of(&ita).unwrap(), "Italy");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn unknown_lookups_fail_explicitly() {
        let registry = CountryRegistry::new();

        assert_eq!(
            registry.name_of(&CountryCode::from("ATL")),
            Err(AtlasError::UnknownCode(CountryCode::from("ATL")))
        );
        assert_eq!(
            registry.code_of("Atlantis"),
            Err(AtlasError::UnknownName("Atlantis".to_string()))
        );
    }
}
