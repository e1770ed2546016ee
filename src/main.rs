// Entrypoint for the movie catalog CLI.
// - Reads configuration from the environment; a missing API key aborts
//   here, before the menu starts.
// - Builds the storage backend and OMDb client and hands them to the UI loop.

use anyhow::Context;
use movie_catalog::{
    api::OmdbClient, commands::App, config::Config, report, storage, ui::main_menu,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they never interleave with menu output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env().context("Invalid configuration")?;
    info!(
        path = %config.storage_path.display(),
        format = %config.storage_format,
        "opening movie storage"
    );

    let fetcher = OmdbClient::from_config(&config)?;
    let app = App::new(
        storage::open(&config.storage_path, config.storage_format),
        Box::new(fetcher),
        report::resolve_template(config.template_path.as_deref()),
        config.output_path.clone(),
    );

    // Blocks until the user exits.
    main_menu(&app)?;
    Ok(())
}
