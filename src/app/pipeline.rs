//! Shared load pipeline used by both the snapshot command and the TUI.
//!
//! fetch (×3, parallel) -> normalize -> registry/series build -> aux join -> view
//!
//! The three inputs are independent network/file reads, so each runs on its
//! own scoped thread; the scope join is the barrier that gates `finalize` and
//! view construction. Any one failed source fails the whole load: there is
//! no partial map.

use std::thread;

use crate::data::{
    parse_aux_dataset, parse_covid_feed, parse_world_sightings, AuxIngest, CovidIngest,
    DatasetClient, RowError, SourceConfig,
};
use crate::domain::{AtlasConfig, CountrySighting};
use crate::error::AppError;
use crate::query::MapView;
use crate::store::{join_aux, CountryRegistry, SeriesBuilder};

/// Everything a front-end needs after one load: the view plus ingestion
/// diagnostics worth surfacing.
#[derive(Debug, Clone)]
pub struct LoadOutput {
    pub view: MapView,
    pub covid_rows_read: usize,
    pub covid_row_errors: Vec<RowError>,
    pub aux_rows_read: usize,
    pub aux_row_errors: Vec<RowError>,
    pub world_countries: usize,
}

/// Fetch all three sources, build the stores, and open a view.
pub fn load_view(sources: &SourceConfig, config: &AtlasConfig) -> Result<LoadOutput, AppError> {
    let client = DatasetClient::new()?;
    let (covid, world, aux) = fetch_all(&client, sources, config)?;

    let mut registry = CountryRegistry::new();
    let mut builder = SeriesBuilder::new();

    // Fixed ingestion order keeps the first-seen registry deterministic:
    // feed records first, then map-only countries.
    builder.ingest(&covid.records, &mut registry);
    for sighting in &world {
        registry.register_sighting(&sighting.code, &sighting.name);
    }

    let series = builder.finalize(config.fill_gaps);
    let joined = join_aux(&aux.records, &registry, config.aux_key);

    let mut view = MapView::new(registry, series, joined)?;
    if let Some(date) = config.target_date {
        view.set_cursor(date);
    }

    Ok(LoadOutput {
        view,
        covid_rows_read: covid.rows_read,
        covid_row_errors: covid.row_errors,
        aux_rows_read: aux.rows_read,
        aux_row_errors: aux.row_errors,
        world_countries: world.len(),
    })
}

/// Fetch and normalize the three sources in parallel.
///
/// Each worker owns its whole fetch+parse path, so a source is usable the
/// moment its own input is ready; the barrier is only the scope join.
fn fetch_all(
    client: &DatasetClient,
    sources: &SourceConfig,
    config: &AtlasConfig,
) -> Result<(CovidIngest, Vec<CountrySighting>, AuxIngest), AppError> {
    let aux_key = config.aux_key;

    thread::scope(|scope| {
        let covid = scope.spawn(|| {
            let body = client.fetch_text(&sources.covid)?;
            parse_covid_feed(&body)
        });
        let world = scope.spawn(|| {
            let body = client.fetch_text(&sources.world)?;
            parse_world_sightings(&body)
        });
        let aux = scope.spawn(move || {
            let body = client.fetch_text(&sources.aux)?;
            parse_aux_dataset(&body, aux_key)
        });

        Ok((
            join_worker(covid.join())?,
            join_worker(world.join())?,
            join_worker(aux.join())?,
        ))
    })
}

fn join_worker<T>(
    joined: thread::Result<Result<T, AppError>>,
) -> Result<T, AppError> {
    joined.map_err(|_| AppError::new(4, "Dataset worker panicked."))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_fixture(dir: &std::path::Path, name: &str, body: &str) -> String {
        let path = dir.join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(body.as_bytes()).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn loads_a_view_from_local_fixtures() {
        let dir = std::env::temp_dir().join("epimap-pipeline-test");
        std::fs::create_dir_all(&dir).unwrap();

        let covid = write_fixture(
            &dir,
            "covid.json",
            r#"{"records": [
                {"day": 1, "month": 3, "year": 2020,
                 "countryterritoryCode": "ITA",
                 "countriesAndTerritories": "Italy",
                 "cases": 10, "deaths": 1},
                {"day": 2, "month": 3, "year": 2020,
                 "countryterritoryCode": "ITA",
                 "countriesAndTerritories": "Italy",
                 "cases": 20, "deaths": 2}
            ]}"#,
        );
        let world = write_fixture(
            &dir,
            "world.json",
            r#"{"type": "FeatureCollection", "features": [
                {"type": "Feature",
                 "properties": {"ISO3CD": "GRL", "MAPLAB": "Greenland"},
                 "geometry": null}
            ]}"#,
        );
        let aux = write_fixture(&dir, "aux.json", r#"[{"name": "Italy", "value": 42}]"#);

        let sources = SourceConfig {
            covid,
            world,
            aux,
        };
        let out = load_view(&sources, &AtlasConfig::default()).unwrap();

        // Cursor starts at the latest date.
        assert_eq!(
            out.view.cursor(),
            chrono::NaiveDate::from_ymd_opt(2020, 3, 2).unwrap()
        );
        // Aux joined through the registry by name.
        assert_eq!(
            out.view.aux_color_value(&crate::domain::CountryCode::from("ITA")),
            Some(42.0)
        );
        // Map-only country still resolves to a name.
        assert_eq!(
            out.view
                .name_of(&crate::domain::CountryCode::from("GRL"))
                .unwrap(),
            "Greenland"
        );
        assert_eq!(out.covid_rows_read, 2);
        assert_eq!(out.world_countries, 1);
    }

    #[test]
    fn one_failed_source_fails_the_load() {
        let dir = std::env::temp_dir().join("epimap-pipeline-test-fail");
        std::fs::create_dir_all(&dir).unwrap();

        let covid = write_fixture(
            &dir,
            "covid.json",
            r#"{"records": []}"#,
        );
        let sources = SourceConfig {
            covid,
            world: dir.join("missing.geojson").to_string_lossy().into_owned(),
            aux: write_fixture(&dir, "aux.json", "[]"),
        };

        let err = load_view(&sources, &AtlasConfig::default()).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }
}
