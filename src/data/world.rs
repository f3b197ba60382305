//! World boundary GeoJSON: country sightings for the registry.
//!
//! The geometry itself is the renderer's business; here we only read each
//! feature's `ISO3CD` code and display-name properties (`MAPLAB`, falling
//! back to `ROMNAM`) so map-only countries still resolve to names.

use geojson::GeoJson;
use serde_json::Value;

use crate::domain::{CountryCode, CountrySighting};
use crate::error::AppError;

/// Extract `(code, name)` sightings from a FeatureCollection body.
///
/// Features without a usable code are skipped; boundary files carry disputed
/// or unlabeled geometries that simply are not join targets.
pub fn parse_world_sightings(body: &str) -> Result<Vec<CountrySighting>, AppError> {
    let geojson: GeoJson = body
        .parse()
        .map_err(|e| AppError::new(4, format!("Invalid world GeoJSON: {e}")))?;

    let GeoJson::FeatureCollection(fc) = geojson else {
        return Err(AppError::new(
            4,
            "World GeoJSON is not a FeatureCollection.",
        ));
    };

    let mut sightings = Vec::with_capacity(fc.features.len());
    for feature in &fc.features {
        let props = feature.properties.as_ref();

        let Some(code) = props
            .and_then(|p| p.get("ISO3CD"))
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
        else {
            continue;
        };

        let name = props
            .and_then(|p| p.get("MAPLAB").or_else(|| p.get("ROMNAM")))
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(code);

        sightings.push(CountrySighting {
            code: CountryCode::from(code),
            name: name.to_string(),
        });
    }

    Ok(sightings)
}
