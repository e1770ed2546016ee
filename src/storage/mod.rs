// Storage abstraction over the flat-file catalog backends.
//
// Every operation loads the whole catalog from disk, applies its change
// and writes the whole catalog back. Nothing is cached between calls.
// The process is assumed to be the only writer: there is no locking, and
// two overlapping writers lose updates (last writer wins).

mod csv_store;
mod json_store;

pub use self::csv_store::CsvStorage;
pub use self::json_store::JsonStorage;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use tracing::info;

use crate::error::{ConfigError, StorageResult};
use crate::movie::{Catalog, Movie};

/// CRUD contract shared by all backends.
///
/// Implementors only provide `load_catalog` and `save_catalog`. A missing
/// backend file must load as an empty catalog.
pub trait MovieStorage {
    fn load_catalog(&self) -> StorageResult<Catalog>;

    fn save_catalog(&self, catalog: &Catalog) -> StorageResult<()>;

    fn list_movies(&self) -> StorageResult<Catalog> {
        self.load_catalog()
    }

    /// Set or silently overwrite the entry for `title`.
    fn add_movie(&self, title: &str, year: i32, rating: f64, poster: &str) -> StorageResult<()> {
        let mut catalog = self.load_catalog()?;
        catalog.insert(title.to_string(), Movie::new(year, rating, poster));
        self.save_catalog(&catalog)?;
        info!(title, year, rating, "movie stored");
        Ok(())
    }

    /// Remove `title`. Returns whether it was present; absence is not an error.
    fn delete_movie(&self, title: &str) -> StorageResult<bool> {
        let mut catalog = self.load_catalog()?;
        if catalog.remove(title).is_none() {
            return Ok(false);
        }
        self.save_catalog(&catalog)?;
        info!(title, "movie deleted");
        Ok(true)
    }

    /// Change only the rating of `title`. Returns whether it was present.
    fn update_movie(&self, title: &str, rating: f64) -> StorageResult<bool> {
        let mut catalog = self.load_catalog()?;
        match catalog.get_mut(title) {
            Some(movie) => movie.rating = rating,
            None => return Ok(false),
        }
        self.save_catalog(&catalog)?;
        info!(title, rating, "movie rating updated");
        Ok(true)
    }
}

/// On-disk format of the catalog file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageFormat {
    Csv,
    Json,
}

impl StorageFormat {
    /// `.json` files are JSON; everything else is CSV.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => StorageFormat::Json,
            _ => StorageFormat::Csv,
        }
    }
}

impl FromStr for StorageFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(StorageFormat::Csv),
            "json" => Ok(StorageFormat::Json),
            other => Err(ConfigError::InvalidFormat(other.to_string())),
        }
    }
}

impl fmt::Display for StorageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageFormat::Csv => f.write_str("csv"),
            StorageFormat::Json => f.write_str("json"),
        }
    }
}

/// Build the backend for `path` in the given format.
pub fn open(path: impl AsRef<Path>, format: StorageFormat) -> Box<dyn MovieStorage> {
    let path = path.as_ref();
    match format {
        StorageFormat::Csv => Box::new(CsvStorage::new(path)),
        StorageFormat::Json => Box::new(JsonStorage::new(path)),
    }
}

/// Read the backend file, mapping a missing file to `None`.
pub(crate) fn read_if_exists(path: &Path) -> StorageResult<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Replace the backend file with `contents`, creating parent directories.
pub(crate) fn write_whole(path: &Path, contents: &[u8]) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, contents)?;
    Ok(())
}
