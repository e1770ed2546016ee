// Structured-text backend: one JSON object keyed by title, each value
// holding `year`, `rating` and `poster`.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use super::{read_if_exists, write_whole, MovieStorage};
use crate::error::{StorageError, StorageResult};
use crate::movie::{Catalog, Movie};

pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonStorage { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn as_year(value: Option<&Value>) -> Option<i32> {
    match value? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .and_then(|y| i32::try_from(y).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_rating(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|r| r.is_finite()),
        _ => None,
    }
}

/// Decode one entry, defaulting every malformed or missing field.
fn parse_entry(title: &str, value: &Value) -> Movie {
    let fields = value.as_object();
    let get = |key: &str| fields.and_then(|f| f.get(key));

    let year = as_year(get("year")).unwrap_or_else(|| {
        warn!(title, "malformed year, defaulting to 0");
        0
    });
    let rating = as_rating(get("rating")).unwrap_or_else(|| {
        warn!(title, "malformed rating, defaulting to 0");
        0.0
    });
    let poster = match get("poster") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    };

    Movie { year, rating, poster }
}

impl MovieStorage for JsonStorage {
    fn load_catalog(&self) -> StorageResult<Catalog> {
        let text = match read_if_exists(&self.path)? {
            Some(text) if !text.trim().is_empty() => text,
            _ => {
                debug!(path = %self.path.display(), "no catalog file, starting empty");
                return Ok(Catalog::new());
            }
        };

        let document: Value = serde_json::from_str(&text)?;
        let entries = match document {
            Value::Object(entries) => entries,
            _ => {
                return Err(StorageError::Corrupt(
                    "JSON catalog must be an object keyed by title".into(),
                ))
            }
        };

        let catalog: Catalog = entries
            .iter()
            .map(|(title, value)| (title.clone(), parse_entry(title, value)))
            .collect();
        debug!(path = %self.path.display(), count = catalog.len(), "catalog loaded");
        Ok(catalog)
    }

    fn save_catalog(&self, catalog: &Catalog) -> StorageResult<()> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        serde::Serialize::serialize(catalog, &mut ser)?;

        write_whole(&self.path, &buf)?;
        debug!(path = %self.path.display(), count = catalog.len(), "catalog saved");
        Ok(())
    }
}
