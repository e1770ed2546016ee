// Movie data model: the per-title record stored in a backend and a few
// read-only queries the menu commands run over a loaded catalog.

use rand::seq::IteratorRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

/// Stored fields of a movie. The title is the catalog key.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Movie {
    pub year: i32,
    pub rating: f64,
    pub poster: String,
}

/// A movie together with its title, as returned by the metadata lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieRecord {
    pub title: String,
    pub movie: Movie,
}

/// Complete title -> movie mapping held by a backend. Titles are
/// case-sensitive and unique.
pub type Catalog = BTreeMap<String, Movie>;

impl Movie {
    pub fn new(year: i32, rating: f64, poster: impl Into<String>) -> Self {
        Movie {
            year,
            rating,
            poster: poster.into(),
        }
    }
}

impl fmt::Display for Movie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Year: {}, Rating: {}, Poster: {}",
            self.year, self.rating, self.poster
        )
    }
}

/// Summary numbers shown by the stats command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatalogStats {
    pub count: usize,
    pub average_rating: f64,
}

pub fn catalog_stats(catalog: &Catalog) -> CatalogStats {
    let count = catalog.len();
    let average_rating = if count == 0 {
        0.0
    } else {
        catalog.values().map(|m| m.rating).sum::<f64>() / count as f64
    };
    CatalogStats {
        count,
        average_rating,
    }
}

/// Movies ordered by rating, highest first. Equal ratings keep title order.
pub fn sorted_by_rating(catalog: &Catalog) -> Vec<(&str, &Movie)> {
    let mut movies: Vec<(&str, &Movie)> = catalog.iter().map(|(t, m)| (t.as_str(), m)).collect();
    movies.sort_by(|a, b| {
        b.1.rating
            .partial_cmp(&a.1.rating)
            .unwrap_or(Ordering::Equal)
    });
    movies
}

pub fn random_movie<'a, R: Rng + ?Sized>(
    catalog: &'a Catalog,
    rng: &mut R,
) -> Option<(&'a str, &'a Movie)> {
    catalog.iter().map(|(t, m)| (t.as_str(), m)).choose(rng)
}
