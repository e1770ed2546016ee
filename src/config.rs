// Runtime configuration read from environment variables.

use std::path::PathBuf;

use crate::api::OMDB_API_URL;
use crate::error::ConfigError;
use crate::storage::StorageFormat;

pub const DEFAULT_STORAGE_PATH: &str = "storage/movies.csv";
pub const DEFAULT_OUTPUT_PATH: &str = "movies.html";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_key: String,
    pub api_url: String,
    pub storage_path: PathBuf,
    pub storage_format: StorageFormat,
    /// Explicit template path. `None` means the installed template is used.
    pub template_path: Option<PathBuf>,
    pub output_path: PathBuf,
}

impl Config {
    /// Read configuration from the process environment.
    ///
    /// `API_KEY` is required; everything else has a default.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = non_empty("API_KEY").ok_or(ConfigError::MissingApiKey)?;
        let api_url = non_empty("OMDB_API_URL").unwrap_or_else(|| OMDB_API_URL.into());
        let storage_path =
            PathBuf::from(non_empty("MOVIES_STORAGE").unwrap_or_else(|| DEFAULT_STORAGE_PATH.into()));
        let storage_format = match non_empty("MOVIES_FORMAT") {
            Some(raw) => raw.parse()?,
            None => StorageFormat::from_path(&storage_path),
        };

        Ok(Config {
            api_key,
            api_url,
            storage_path,
            storage_format,
            template_path: non_empty("MOVIES_TEMPLATE").map(PathBuf::from),
            output_path: PathBuf::from(
                non_empty("MOVIES_OUTPUT").unwrap_or_else(|| DEFAULT_OUTPUT_PATH.into()),
            ),
        })
    }
}
