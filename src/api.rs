// API client module: a small blocking HTTP client that resolves a movie
// title into year, rating and poster through the OMDb lookup service.
// One request per lookup, no retries and no caching.

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::Config;
use crate::error::FetchError;
use crate::movie::{Movie, MovieRecord};

/// Default endpoint of the OMDb service.
pub const OMDB_API_URL: &str = "http://www.omdbapi.com/";

/// Resolves a title into a full movie record.
pub trait MetadataFetcher {
    fn fetch(&self, title: &str) -> Result<MovieRecord, FetchError>;
}

/// Blocking OMDb client holding a reqwest client, the endpoint URL and the
/// API key sent with every request.
#[derive(Clone)]
pub struct OmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
}

/// Subset of the OMDb JSON body we rely on. OMDb reports every field as a
/// string, including numbers, and uses `"N/A"` for unknown values.
#[derive(Deserialize, Debug, Default)]
pub struct OmdbResponse {
    #[serde(rename = "Title")]
    pub title: Option<String>,
    #[serde(rename = "Year")]
    pub year: Option<String>,
    #[serde(rename = "imdbRating")]
    pub imdb_rating: Option<String>,
    #[serde(rename = "Poster")]
    pub poster: Option<String>,
    #[serde(rename = "Response")]
    pub response: Option<String>,
    #[serde(rename = "Error")]
    pub error: Option<String>,
}

impl OmdbClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self::with_client(client, base_url, api_key))
    }

    /// Use an already configured reqwest client.
    pub fn with_client(client: Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        OmdbClient {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Create a client from the endpoint and key in `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.api_url.clone(), config.api_key.clone())
    }
}

impl MetadataFetcher for OmdbClient {
    fn fetch(&self, title: &str) -> Result<MovieRecord, FetchError> {
        debug!(title, url = %self.base_url, "looking up movie");
        let res = self
            .client
            .get(&self.base_url)
            .query(&[("apikey", self.api_key.as_str()), ("t", title)])
            .send()
            .map_err(|e| FetchError::Connectivity(e.to_string()))?;

        if !res.status().is_success() {
            let status = res.status();
            return Err(FetchError::Connectivity(format!("HTTP status {}", status)));
        }

        let body: OmdbResponse = res
            .json()
            .map_err(|e| FetchError::MalformedResponse(e.to_string()))?;
        interpret_response(title, body)
    }
}

/// Turn a decoded OMDb body into a record, classifying "not found" replies
/// and unparsable numeric fields.
pub fn interpret_response(requested: &str, body: OmdbResponse) -> Result<MovieRecord, FetchError> {
    if body.response.as_deref() == Some("False") {
        let reason = body.error.unwrap_or_else(|| "Movie not found".into());
        return Err(FetchError::NotFound(reason));
    }

    let raw_year = body.year.unwrap_or_default();
    let year = parse_year(&raw_year)
        .ok_or_else(|| FetchError::MalformedResponse(format!("invalid year '{}'", raw_year)))?;

    let raw_rating = body.imdb_rating.unwrap_or_default();
    let rating = raw_rating
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|r| r.is_finite())
        .ok_or_else(|| FetchError::MalformedResponse(format!("invalid rating '{}'", raw_rating)))?;

    let title = body
        .title
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| requested.to_string());

    Ok(MovieRecord {
        title,
        movie: Movie {
            year,
            rating,
            poster: body.poster.unwrap_or_default(),
        },
    })
}

/// First run of digits in an OMDb year, so ranges like `2010–2013` yield
/// their start year.
fn parse_year(raw: &str) -> Option<i32> {
    let start = raw.find(|c: char| c.is_ascii_digit())?;
    let digits: String = raw[start..].chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}
