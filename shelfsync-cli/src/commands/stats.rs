use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;
use crate::settings::Settings;

use super::open_existing_catalog;

pub(crate) fn run_stats(settings: &Settings) -> Result<(), CliError> {
    let Some(conn) = open_existing_catalog(settings)? else {
        return Ok(());
    };

    let stats = shelfsync_db::catalog_stats(&conn)
        .map_err(|e| CliError::database(format!("Failed to query catalog stats: {}", e)))?;

    log::info!(
        "{}",
        "Catalog Statistics".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("  Database: {}", settings.database.value.display());
    crate::log_blank();
    log::info!(
        "  Categories:     {:>8} active, {} inactive",
        stats.categories_active,
        stats.categories_inactive
    );
    log::info!(
        "  Products:       {:>8} active, {} inactive",
        stats.products_active,
        stats.products_inactive
    );
    log::info!("  Product images: {:>8}", stats.product_images);
    log::info!("  Redirects:      {:>8}", stats.redirects);
    log::info!("  Import runs:    {:>8}", stats.import_runs);

    Ok(())
}
