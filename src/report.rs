// Static HTML report: the catalog rendered as a movie grid and substituted
// into a template file.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::ReportError;
use crate::movie::Catalog;

pub const PAGE_TITLE: &str = "My Movie List";
pub const TITLE_PLACEHOLDER: &str = "__TEMPLATE_TITLE__";
pub const GRID_PLACEHOLDER: &str = "__TEMPLATE_MOVIE_GRID__";

const TEMPLATE_RELATIVE: &str = "_static/index_template.html";

/// Escape text for use inside HTML element content and quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// One `<li class="movie">` per catalog entry.
pub fn render_movie_grid(catalog: &Catalog) -> String {
    let mut grid = String::new();
    for (title, movie) in catalog {
        let title = escape_html(title);
        // writing into a String cannot fail
        let _ = write!(
            grid,
            r#"
            <li class="movie">
                <img class="movie-poster" src="{poster}" alt="Poster of {title}">
                <div class="movie-title">{title}</div>
                <div class="movie-year">{year}</div>
            </li>
            "#,
            poster = escape_html(&movie.poster),
            title = title,
            year = movie.year,
        );
    }
    grid
}

pub fn render_page(template: &str, page_title: &str, grid: &str) -> String {
    template
        .replace(TITLE_PLACEHOLDER, &escape_html(page_title))
        .replace(GRID_PLACEHOLDER, grid)
}

/// Render `catalog` through the template at `template_path` and write the
/// page to `output_path`.
pub fn generate_website(
    catalog: &Catalog,
    template_path: &Path,
    output_path: &Path,
) -> Result<(), ReportError> {
    let template = std::fs::read_to_string(template_path).map_err(|source| ReportError::Template {
        path: template_path.to_path_buf(),
        source,
    })?;

    let page = render_page(&template, PAGE_TITLE, &render_movie_grid(catalog));
    std::fs::write(output_path, page).map_err(|source| ReportError::Write {
        path: output_path.to_path_buf(),
        source,
    })?;

    info!(output = %output_path.display(), movies = catalog.len(), "website generated");
    Ok(())
}

/// Locate the page template: an explicit override, then next to the
/// installed binary, then the copy bundled with the crate sources.
pub fn resolve_template(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    if let Some(installed) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(TEMPLATE_RELATIVE)))
        .filter(|path| path.is_file())
    {
        return installed;
    }
    Path::new(env!("CARGO_MANIFEST_DIR")).join(TEMPLATE_RELATIVE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movie::Movie;
    use tempfile::TempDir;

    fn catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.insert("Inception".into(), Movie::new(2010, 8.8, "posterA.jpg"));
        catalog.insert("Tom & Jerry".into(), Movie::new(2021, 5.2, "tj.jpg"));
        catalog
    }

    #[test]
    fn test_grid_contains_every_movie() {
        let grid = render_movie_grid(&catalog());
        assert_eq!(grid.matches("<li class=\"movie\">").count(), 2);
        assert!(grid.contains(r#"<img class="movie-poster" src="posterA.jpg" alt="Poster of Inception">"#));
        assert!(grid.contains("<div class=\"movie-year\">2010</div>"));
        assert!(grid.contains("<div class=\"movie-title\">Tom &amp; Jerry</div>"));
    }

    #[test]
    fn test_render_page_replaces_placeholders() {
        let page = render_page(
            "<title>__TEMPLATE_TITLE__</title><ul>__TEMPLATE_MOVIE_GRID__</ul>",
            PAGE_TITLE,
            "<li>x</li>",
        );
        assert_eq!(page, "<title>My Movie List</title><ul><li>x</li></ul>");
    }

    #[test]
    fn test_generate_website() {
        let dir = TempDir::new().unwrap();
        let template = dir.path().join("template.html");
        let output = dir.path().join("movies.html");
        std::fs::write(&template, "<h1>__TEMPLATE_TITLE__</h1>__TEMPLATE_MOVIE_GRID__").unwrap();

        generate_website(&catalog(), &template, &output).unwrap();
        let page = std::fs::read_to_string(&output).unwrap();
        assert!(page.starts_with("<h1>My Movie List</h1>"));
        assert!(page.contains("Inception"));
        assert!(!page.contains(GRID_PLACEHOLDER));
    }

    #[test]
    fn test_missing_template_is_error() {
        let dir = TempDir::new().unwrap();
        let err = generate_website(
            &catalog(),
            &dir.path().join("absent.html"),
            &dir.path().join("out.html"),
        )
        .unwrap_err();
        assert!(matches!(err, ReportError::Template { .. }));
    }

    #[test]
    fn test_bundled_template_has_placeholders() {
        let bundled = Path::new(env!("CARGO_MANIFEST_DIR")).join(TEMPLATE_RELATIVE);
        let template = std::fs::read_to_string(bundled).unwrap();
        assert!(template.contains(TITLE_PLACEHOLDER));
        assert!(template.contains(GRID_PLACEHOLDER));
    }

    #[test]
    fn test_explicit_template_wins() {
        let path = PathBuf::from("/tmp/custom.html");
        assert_eq!(resolve_template(Some(&path)), path);
    }
}
