use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;
use crate::settings::Settings;

use super::open_existing_catalog;

pub(crate) fn run_runs(settings: &Settings, limit: u32, errors: bool) -> Result<(), CliError> {
    let Some(conn) = open_existing_catalog(settings)? else {
        return Ok(());
    };

    let runs = shelfsync_db::list_import_runs(&conn, limit)
        .map_err(|e| CliError::database(format!("Failed to list import runs: {}", e)))?;

    if runs.is_empty() {
        log::info!("No import runs recorded.");
        return Ok(());
    }

    for run in &runs {
        let c = &run.counters;
        log::info!(
            "{} {} {}",
            format!("#{}", run.id).if_supports_color(Stdout, |t| t.bold()),
            run.file_name,
            run.finished_at.if_supports_color(Stdout, |t| t.dimmed()),
        );
        log::info!(
            "    rows {} (skipped {})  products +{} ~{} ={} -{}  categories +{} ~{} -{}",
            c.rows_total,
            c.rows_skipped,
            c.products_created,
            c.products_updated,
            c.products_unchanged,
            c.products_deactivated,
            c.categories_created,
            c.categories_updated,
            c.categories_deactivated,
        );
        log::info!(
            "    redirects {}  images {} converted, {} reused, {} failed",
            c.redirects_created,
            c.images_converted,
            c.images_reused,
            c.images_failed,
        );

        if errors && c.rows_skipped > 0 {
            let records = shelfsync_db::row_errors_for_run(&conn, run.id).map_err(|e| {
                CliError::database(format!("Failed to load row errors for run {}: {}", run.id, e))
            })?;
            for rec in &records {
                log::info!(
                    "      line {:>5}  {:<16} {:<20} {}",
                    rec.line,
                    rec.sku.as_deref().unwrap_or("-"),
                    rec.code.if_supports_color(Stdout, |t| t.yellow()),
                    rec.message,
                );
            }
        }
    }
    Ok(())
}
