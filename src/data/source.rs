//! Dataset sources: where the three inputs come from.
//!
//! Each source is either an `http(s)://` URL fetched with a blocking client
//! or a local file path, so the same binary works against the live feeds and
//! against checked-in fixtures. Resolution order per source: CLI flag, then
//! environment (`.env` honored), then the built-in default.

use std::fs;
use std::time::Duration;

use reqwest::blocking::Client;

use crate::error::AppError;

const DEFAULT_COVID_URL: &str =
    "https://opendata.ecdc.europa.eu/covid19/casedistribution/json/";
const DEFAULT_WORLD_PATH: &str = "geo_un_simple_boundaries.geojson";
const DEFAULT_AUX_PATH: &str = "faostat.json";

const ENV_COVID: &str = "EPIMAP_COVID_URL";
const ENV_WORLD: &str = "EPIMAP_WORLD_URL";
const ENV_AUX: &str = "EPIMAP_AUX_URL";

const FETCH_TIMEOUT: Duration = Duration::from_secs(60);

/// Resolved locations of the three inputs.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub covid: String,
    pub world: String,
    pub aux: String,
}

impl SourceConfig {
    /// Resolve sources from optional CLI overrides, the environment, and
    /// defaults, in that order.
    pub fn resolve(
        covid: Option<String>,
        world: Option<String>,
        aux: Option<String>,
    ) -> Self {
        dotenvy::dotenv().ok();
        Self {
            covid: resolve_one(covid, ENV_COVID, DEFAULT_COVID_URL),
            world: resolve_one(world, ENV_WORLD, DEFAULT_WORLD_PATH),
            aux: resolve_one(aux, ENV_AUX, DEFAULT_AUX_PATH),
        }
    }
}

fn resolve_one(cli: Option<String>, env_key: &str, default: &str) -> String {
    cli.or_else(|| std::env::var(env_key).ok())
        .unwrap_or_else(|| default.to_string())
}

/// Blocking fetcher shared by the three dataset workers.
pub struct DatasetClient {
    client: Client,
}

impl DatasetClient {
    pub fn new() -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| AppError::new(4, format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Fetch the raw text of a source, from the network or the filesystem.
    pub fn fetch_text(&self, source: &str) -> Result<String, AppError> {
        if source.starts_with("http://") || source.starts_with("https://") {
            let resp = self
                .client
                .get(source)
                .send()
                .map_err(|e| AppError::new(4, format!("Request to {source} failed: {e}")))?;

            if !resp.status().is_success() {
                return Err(AppError::new(
                    4,
                    format!("Request to {source} failed with status {}.", resp.status()),
                ));
            }

            resp.text()
                .map_err(|e| AppError::new(4, format!("Failed to read body from {source}: {e}")))
        } else {
            fs::read_to_string(source)
                .map_err(|e| AppError::new(4, format!("Failed to read '{source}': {e}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_override_beats_env_and_default() {
        let cfg = SourceConfig::resolve(Some("local.json".to_string()), None, None);
        assert_eq!(cfg.covid, "local.json");
        assert_eq!(cfg.aux, DEFAULT_AUX_PATH);
    }

    #[test]
    fn missing_file_surfaces_as_fetch_error() {
        let client = DatasetClient::new().unwrap();
        let err = client.fetch_text("definitely-not-here.json").unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }
}
