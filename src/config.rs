//! Service configuration: YAML file plus environment overrides.
//!
//! Lookup order for the file: `COVID_API_CONFIG`, then
//! `config/covid_api.yaml` if it exists, then built-in defaults.
//! `COVID_API_BIND` and `COVID_API_DATA_DIR` override the loaded values.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::builder::SourceSpec;
use crate::data::index::DuplicatePolicy;
use crate::data::metric::Metric;

pub const CONFIG_PATH_ENV: &str = "COVID_API_CONFIG";
pub const BIND_ENV: &str = "COVID_API_BIND";
pub const DATA_DIR_ENV: &str = "COVID_API_DATA_DIR";
pub const DEFAULT_CONFIG_PATH: &str = "config/covid_api.yaml";
pub const DEFAULT_BIND: &str = "127.0.0.1:8080";
pub const DEFAULT_DATA_DIR: &str = "data";

const DEFAULT_SERIES_DIR: &str = "csse_covid_19_data/csse_covid_19_time_series";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to read config '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to parse config '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub bind: String,
    /// Base directory for relative source paths.
    pub data_dir: PathBuf,
    /// Ingested in this order.
    pub sources: Vec<SourceSpec>,
    pub duplicate_policy: DuplicatePolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        let series = |file: &str, metric| {
            SourceSpec::new(Path::new(DEFAULT_SERIES_DIR).join(file), metric)
        };
        Self {
            bind: DEFAULT_BIND.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            sources: vec![
                series("time_series_19-covid-Confirmed.csv", Metric::Confirmed),
                series("time_series_19-covid-Deaths.csv", Metric::Deaths),
                series("time_series_19-covid-Recovered.csv", Metric::Recovered),
            ],
            duplicate_policy: DuplicatePolicy::default(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from the environment-selected file and applies
    /// environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let config = match env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::from_yaml_file(path.trim())?,
            _ if Path::new(DEFAULT_CONFIG_PATH).is_file() => {
                Self::from_yaml_file(DEFAULT_CONFIG_PATH)?
            }
            _ => Self::default(),
        };
        Ok(config.with_env_overrides())
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(raw)
    }

    pub fn with_env_overrides(mut self) -> Self {
        if let Some(bind) = non_empty_env(BIND_ENV) {
            self.bind = bind;
        }
        if let Some(data_dir) = non_empty_env(DATA_DIR_ENV) {
            self.data_dir = PathBuf::from(data_dir);
        }
        self
    }

    /// Sources with relative paths joined onto `data_dir`.
    pub fn resolved_sources(&self) -> Vec<SourceSpec> {
        self.sources
            .iter()
            .map(|spec| SourceSpec {
                path: self.data_dir.join(&spec.path),
                metric: spec.metric,
            })
            .collect()
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}
