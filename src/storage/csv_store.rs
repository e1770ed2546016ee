// Delimited-text backend: a header row `title,rating,year,poster` followed
// by one row per movie.

use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Writer};
use tracing::{debug, warn};

use super::{read_if_exists, write_whole, MovieStorage};
use crate::error::{StorageError, StorageResult};
use crate::movie::{Catalog, Movie};

const HEADER: [&str; 4] = ["title", "rating", "year", "poster"];

pub struct CsvStorage {
    path: PathBuf,
}

impl CsvStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CsvStorage { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Column positions resolved from the header row.
struct Columns {
    title: usize,
    rating: Option<usize>,
    year: Option<usize>,
    poster: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> StorageResult<Self> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let title = find("title")
            .ok_or_else(|| StorageError::Corrupt("CSV header has no 'title' column".into()))?;
        Ok(Columns {
            title,
            rating: find("rating"),
            year: find("year"),
            poster: find("poster"),
        })
    }
}

fn field<'r>(record: &'r StringRecord, idx: Option<usize>) -> &'r str {
    idx.and_then(|i| record.get(i)).unwrap_or("")
}

fn parse_row(record: &StringRecord, cols: &Columns) -> Option<(String, Movie)> {
    let title = record.get(cols.title).unwrap_or("");
    if title.is_empty() {
        return None;
    }

    let raw_year = field(record, cols.year);
    let year = raw_year.trim().parse::<i32>().unwrap_or_else(|_| {
        warn!(title, value = raw_year, "malformed year, defaulting to 0");
        0
    });
    let raw_rating = field(record, cols.rating);
    // Non-finite ratings read as 0, matching what the JSON backend stores.
    let rating = raw_rating
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|r| r.is_finite())
        .unwrap_or_else(|| {
            warn!(title, value = raw_rating, "malformed rating, defaulting to 0");
            0.0
        });
    let poster = field(record, cols.poster).to_string();

    Some((title.to_string(), Movie { year, rating, poster }))
}

impl MovieStorage for CsvStorage {
    fn load_catalog(&self) -> StorageResult<Catalog> {
        let text = match read_if_exists(&self.path)? {
            Some(text) if !text.trim().is_empty() => text,
            _ => {
                debug!(path = %self.path.display(), "no catalog file, starting empty");
                return Ok(Catalog::new());
            }
        };

        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .from_reader(text.as_bytes());
        let cols = Columns::from_headers(reader.headers()?)?;

        let mut catalog = Catalog::new();
        for record in reader.records() {
            if let Some((title, movie)) = parse_row(&record?, &cols) {
                catalog.insert(title, movie);
            }
        }
        debug!(path = %self.path.display(), count = catalog.len(), "catalog loaded");
        Ok(catalog)
    }

    fn save_catalog(&self, catalog: &Catalog) -> StorageResult<()> {
        let mut writer = Writer::from_writer(Vec::new());
        writer.write_record(HEADER)?;
        for (title, movie) in catalog {
            let rating = movie.rating.to_string();
            let year = movie.year.to_string();
            writer.write_record([title.as_str(), rating.as_str(), year.as_str(), movie.poster.as_str()])?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| StorageError::Io(e.into_error()))?;

        write_whole(&self.path, &bytes)?;
        debug!(path = %self.path.display(), count = catalog.len(), "catalog saved");
        Ok(())
    }
}
