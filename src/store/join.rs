//! Best-effort join of an auxiliary scalar dataset onto country codes.

use std::collections::HashMap;

use crate::domain::{AuxKey, AuxRecord, CountryCode};
use crate::store::CountryRegistry;

/// Join result: resolved values plus the entries that found no country.
///
/// Unmatched rows are data, not log lines; the caller decides whether to
/// print, count, or ignore them.
#[derive(Debug, Clone, Default)]
pub struct AuxJoin {
    pub values: HashMap<CountryCode, f64>,
    pub unmatched: Vec<AuxRecord>,
}

impl AuxJoin {
    pub fn value(&self, code: &CountryCode) -> Option<f64> {
        self.values.get(code).copied()
    }
}

/// Resolve each record's key to a country code and collect its value.
///
/// One unresolvable row never fails the operation; it lands in `unmatched`.
pub fn join_aux(records: &[AuxRecord], registry: &CountryRegistry, key: AuxKey) -> AuxJoin {
    let mut join = AuxJoin::default();

    for rec in records {
        let code = match key {
            AuxKey::Name => match registry.code_of(&rec.key) {
                Ok(code) => code.clone(),
                Err(_) => {
                    join.unmatched.push(rec.clone());
                    continue;
                }
            },
            AuxKey::Code => {
                let code = CountryCode::new(rec.key.clone());
                // A code the registry never saw would color nothing on the
                // map; treat it like an unmatched name.
                if registry.name_of(&code).is_err() {
                    join.unmatched.push(rec.clone());
                    continue;
                }
                code
            }
        };
        join.values.insert(code, rec.value);
    }

    join
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with(entries: &[(&str, &str)]) -> CountryRegistry {
        let mut registry = CountryRegistry::new();
        for (code, name) in entries {
            registry.register_sighting(&CountryCode::from(*code), name);
        }
        registry
    }

    fn aux(key: &str, value: f64) -> AuxRecord {
        AuxRecord {
            key: key.to_string(),
            value,
        }
    }

    #[test]
    fn joins_by_name_through_registry() {
        let registry = registry_with(&[("ITA", "Italy"), ("FRA", "France")]);
        let records = vec![aux("Italy", 42.0), aux("France", 7.5)];

        let join = join_aux(&records, &registry, AuxKey::Name);

        assert_eq!(join.value(&CountryCode::from("ITA")), Some(42.0));
        assert_eq!(join.value(&CountryCode::from("FRA")), Some(7.5));
        assert!(join.unmatched.is_empty());
    }

    #[test]
    fn unmatched_name_is_skipped_without_affecting_others() {
        let registry = registry_with(&[("ITA", "Italy")]);
        let records = vec![aux("Italy", 42.0), aux("Narnia", 99.0)];

        let join = join_aux(&records, &registry, AuxKey::Name);

        assert_eq!(join.value(&CountryCode::from("ITA")), Some(42.0));
        assert_eq!(join.unmatched, vec![aux("Narnia", 99.0)]);
    }

    #[test]
    fn joins_by_code_when_configured() {
        let registry = registry_with(&[("ITA", "Italy")]);
        let records = vec![aux("ITA", 42.0), aux("ZZZ", 1.0)];

        let join = join_aux(&records, &registry, AuxKey::Code);

        assert_eq!(join.value(&CountryCode::from("ITA")), Some(42.0));
        assert_eq!(join.unmatched.len(), 1);
        assert_eq!(join.unmatched[0].key, "ZZZ");
    }
}
