// Menu commands. Each command works against the configured storage and
// fetcher and returns the text the UI prints, so the whole flow can be
// exercised without a terminal.

use std::fmt;
use std::path::PathBuf;

use anyhow::Result;
use tracing::error;

use crate::api::MetadataFetcher;
use crate::movie::{catalog_stats, random_movie, sorted_by_rating, Movie};
use crate::report;
use crate::storage::MovieStorage;

/// Entries of the numbered main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Exit,
    List,
    Add,
    Delete,
    Update,
    Stats,
    Random,
    Search,
    SortedByRating,
    GenerateWebsite,
}

impl MenuChoice {
    pub const ALL: [MenuChoice; 10] = [
        MenuChoice::Exit,
        MenuChoice::List,
        MenuChoice::Add,
        MenuChoice::Delete,
        MenuChoice::Update,
        MenuChoice::Stats,
        MenuChoice::Random,
        MenuChoice::Search,
        MenuChoice::SortedByRating,
        MenuChoice::GenerateWebsite,
    ];

    /// Parse a line typed at the menu prompt. Only a single digit `0`-`9`
    /// selects an entry; `"03"` or `"+3"` do not.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().as_bytes() {
            &[d @ b'0'..=b'9'] => Self::ALL.get(usize::from(d - b'0')).copied(),
            _ => None,
        }
    }

    pub fn number(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            MenuChoice::Exit => "Exit",
            MenuChoice::List => "List movies",
            MenuChoice::Add => "Add movie",
            MenuChoice::Delete => "Delete movie",
            MenuChoice::Update => "Update movie",
            MenuChoice::Stats => "Stats",
            MenuChoice::Random => "Random movie",
            MenuChoice::Search => "Search movie",
            MenuChoice::SortedByRating => "Movies sorted by rating",
            MenuChoice::GenerateWebsite => "Generate website",
        }
    }
}

impl fmt::Display for MenuChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.number(), self.label())
    }
}

pub fn movie_line(title: &str, movie: &Movie) -> String {
    format!("Title: {}, {}", title, movie)
}

/// The application state shared by every command: where movies are stored,
/// how titles are resolved, and where the website goes.
pub struct App {
    storage: Box<dyn MovieStorage>,
    fetcher: Box<dyn MetadataFetcher>,
    template_path: PathBuf,
    output_path: PathBuf,
}

impl App {
    pub fn new(
        storage: Box<dyn MovieStorage>,
        fetcher: Box<dyn MetadataFetcher>,
        template_path: PathBuf,
        output_path: PathBuf,
    ) -> Self {
        App {
            storage,
            fetcher,
            template_path,
            output_path,
        }
    }

    pub fn list(&self) -> Result<String> {
        let catalog = self.storage.list_movies()?;
        if catalog.is_empty() {
            return Ok("No movies in the catalog.".into());
        }
        let lines: Vec<String> = catalog.iter().map(|(t, m)| movie_line(t, m)).collect();
        Ok(lines.join("\n"))
    }

    /// Look `title` up and store the result. Lookup and storage failures are
    /// reported in the returned text rather than as errors.
    pub fn add(&self, title: &str) -> String {
        let record = match self.fetcher.fetch(title) {
            Ok(record) => record,
            Err(e) => {
                error!(title, error = %e, "movie lookup failed");
                return e.to_string();
            }
        };

        let movie = &record.movie;
        match self
            .storage
            .add_movie(&record.title, movie.year, movie.rating, &movie.poster)
        {
            Ok(()) => format!("Movie '{}' successfully added.", title),
            Err(e) => {
                error!(title, error = %e, "storing movie failed");
                format!("An unexpected error occurred: {}", e)
            }
        }
    }

    pub fn delete(&self, title: &str) -> Result<String> {
        if self.storage.delete_movie(title)? {
            Ok(format!("Movie '{}' deleted successfully.", title))
        } else {
            Ok(format!("Movie '{}' not found.", title))
        }
    }

    /// Updating from the menu is not wired up; only the storage layer
    /// supports it.
    pub fn update(&self) -> String {
        "Update movie functionality is not available.".into()
    }

    pub fn stats(&self) -> Result<String> {
        let stats = catalog_stats(&self.storage.list_movies()?);
        Ok(format!(
            "Number of movies: {}\nAverage rating: {:.2}",
            stats.count, stats.average_rating
        ))
    }

    pub fn random(&self) -> Result<String> {
        let catalog = self.storage.list_movies()?;
        Ok(match random_movie(&catalog, &mut rand::thread_rng()) {
            Some((title, movie)) => format!("Random Movie:\n{}", movie_line(title, movie)),
            None => "No movies available.".into(),
        })
    }

    /// Exact, case-sensitive title lookup.
    pub fn search(&self, title: &str) -> Result<String> {
        let catalog = self.storage.list_movies()?;
        Ok(match catalog.get(title) {
            Some(movie) => format!("Found Movie:\n{}", movie_line(title, movie)),
            None => "Movie not found.".into(),
        })
    }

    pub fn sorted_by_rating(&self) -> Result<String> {
        let catalog = self.storage.list_movies()?;
        if catalog.is_empty() {
            return Ok("No movies in the catalog.".into());
        }
        let lines: Vec<String> = sorted_by_rating(&catalog)
            .into_iter()
            .map(|(t, m)| movie_line(t, m))
            .collect();
        Ok(lines.join("\n"))
    }

    pub fn generate_website(&self) -> Result<String> {
        let catalog = self.storage.list_movies()?;
        report::generate_website(&catalog, &self.template_path, &self.output_path)?;
        Ok("Website generated successfully".into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::movie::MovieRecord;
    use crate::storage::JsonStorage;
    use std::collections::HashMap;
    use tempfile::TempDir;

    /// Fetcher answering from a fixed table, or failing every lookup.
    struct StubFetcher {
        known: HashMap<String, MovieRecord>,
        offline: bool,
    }

    impl MetadataFetcher for StubFetcher {
        fn fetch(&self, title: &str) -> Result<MovieRecord, FetchError> {
            if self.offline {
                return Err(FetchError::Connectivity("offline".into()));
            }
            self.known
                .get(title)
                .cloned()
                .ok_or_else(|| FetchError::NotFound("Movie not found!".into()))
        }
    }

    fn app(dir: &TempDir, offline: bool) -> App {
        let mut known = HashMap::new();
        known.insert(
            "inception".to_string(),
            MovieRecord {
                title: "Inception".into(),
                movie: Movie::new(2010, 8.8, "posterA.jpg"),
            },
        );
        let template = dir.path().join("template.html");
        std::fs::write(&template, "<h1>__TEMPLATE_TITLE__</h1><ol>__TEMPLATE_MOVIE_GRID__</ol>").unwrap();
        App::new(
            Box::new(JsonStorage::new(dir.path().join("movies.json"))),
            Box::new(StubFetcher { known, offline }),
            template,
            dir.path().join("movies.html"),
        )
    }

    fn seeded(dir: &TempDir) -> App {
        let app = app(dir, false);
        app.storage.add_movie("Alien", 1979, 8.5, "alien.jpg").unwrap();
        app.storage.add_movie("Cats", 2019, 2.8, "cats.jpg").unwrap();
        app.storage.add_movie("Heat", 1995, 8.3, "heat.jpg").unwrap();
        app
    }

    #[test]
    fn test_menu_parse() {
        assert_eq!(MenuChoice::parse("0"), Some(MenuChoice::Exit));
        assert_eq!(MenuChoice::parse(" 9 \n"), Some(MenuChoice::GenerateWebsite));
        assert_eq!(MenuChoice::parse("4"), Some(MenuChoice::Update));
        assert_eq!(MenuChoice::parse("10"), None);
        assert_eq!(MenuChoice::parse("list"), None);
        assert_eq!(MenuChoice::parse(""), None);
        assert_eq!(MenuChoice::parse("03"), None);
        assert_eq!(MenuChoice::parse("+3"), None);
        assert_eq!(MenuChoice::parse("٣"), None);
        assert_eq!(MenuChoice::SortedByRating.to_string(), "8. Movies sorted by rating");
    }

    #[test]
    fn test_add_uses_fetched_record() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir, false);
        assert_eq!(app.add("inception"), "Movie 'inception' successfully added.");
        let catalog = app.storage.list_movies().unwrap();
        assert_eq!(catalog["Inception"], Movie::new(2010, 8.8, "posterA.jpg"));
    }

    #[test]
    fn test_add_reports_lookup_failures() {
        let dir = TempDir::new().unwrap();
        assert_eq!(app(&dir, false).add("nope"), "Movie not found!");
        assert_eq!(app(&dir, true).add("inception"), "Failed to connect to OMDb API");
        assert!(app(&dir, false).storage.list_movies().unwrap().is_empty());
    }

    #[test]
    fn test_list_and_empty_list() {
        let dir = TempDir::new().unwrap();
        assert_eq!(app(&dir, false).list().unwrap(), "No movies in the catalog.");

        let listing = seeded(&dir).list().unwrap();
        assert_eq!(
            listing.lines().next(),
            Some("Title: Alien, Year: 1979, Rating: 8.5, Poster: alien.jpg")
        );
        assert_eq!(listing.lines().count(), 3);
    }

    #[test]
    fn test_delete_existing_and_missing() {
        let dir = TempDir::new().unwrap();
        let app = seeded(&dir);
        assert_eq!(app.delete("Cats").unwrap(), "Movie 'Cats' deleted successfully.");
        assert_eq!(app.delete("Cats").unwrap(), "Movie 'Cats' not found.");
    }

    #[test]
    fn test_update_is_disabled() {
        let dir = TempDir::new().unwrap();
        assert_eq!(seeded(&dir).update(), "Update movie functionality is not available.");
    }

    #[test]
    fn test_stats() {
        let dir = TempDir::new().unwrap();
        assert_eq!(
            app(&dir, false).stats().unwrap(),
            "Number of movies: 0\nAverage rating: 0.00"
        );
        assert_eq!(
            seeded(&dir).stats().unwrap(),
            "Number of movies: 3\nAverage rating: 6.53"
        );
    }

    #[test]
    fn test_random() {
        let dir = TempDir::new().unwrap();
        assert_eq!(app(&dir, false).random().unwrap(), "No movies available.");
        assert!(seeded(&dir).random().unwrap().starts_with("Random Movie:\nTitle: "));
    }

    #[test]
    fn test_search_is_exact() {
        let dir = TempDir::new().unwrap();
        let app = seeded(&dir);
        assert_eq!(
            app.search("Heat").unwrap(),
            "Found Movie:\nTitle: Heat, Year: 1995, Rating: 8.3, Poster: heat.jpg"
        );
        assert_eq!(app.search("heat").unwrap(), "Movie not found.");
    }

    #[test]
    fn test_sorted_by_rating() {
        let dir = TempDir::new().unwrap();
        let listing = seeded(&dir).sorted_by_rating().unwrap();
        let titles: Vec<&str> = listing
            .lines()
            .map(|l| l.trim_start_matches("Title: ").split(',').next().unwrap())
            .collect();
        assert_eq!(titles, vec!["Alien", "Heat", "Cats"]);
    }

    #[test]
    fn test_generate_website() {
        let dir = TempDir::new().unwrap();
        let app = seeded(&dir);
        assert_eq!(app.generate_website().unwrap(), "Website generated successfully");
        let page = std::fs::read_to_string(dir.path().join("movies.html")).unwrap();
        assert!(page.starts_with("<h1>My Movie List</h1>"));
        assert_eq!(page.matches("class=\"movie\"").count(), 3);
    }
}
