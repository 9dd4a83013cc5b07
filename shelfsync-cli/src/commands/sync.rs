use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;
use crate::progress::BarProgress;
use crate::settings::Settings;

use super::report::print_report;
use super::{open_catalog, sync_options};

/// Drain the inbox: apply every pending CSV in name order and archive it.
pub(crate) fn run_inbox(settings: &Settings, dry_run: bool, quiet: bool) -> Result<(), CliError> {
    let conn = open_catalog(settings)?;
    let options = sync_options(settings, dry_run);
    let progress = BarProgress::new(quiet);

    let outcome = shelfsync_import::process_inbox(&conn, &options, &progress)
        .map_err(|e| CliError::batch(e.to_string()))?;

    for report in &outcome.reports {
        print_report(report);
        crate::log_blank();
    }

    if let Some(failed) = outcome.failed {
        return Err(CliError::batch(format!(
            "{} was not applied: {}. Later files were left in the inbox.",
            failed.file.display(),
            failed.error
        )));
    }

    if outcome.reports.is_empty() {
        log::info!(
            "{}",
            "Nothing to import.".if_supports_color(Stdout, |t| t.dimmed())
        );
    } else {
        log::info!(
            "{} {} batch(es){}",
            "Done:".if_supports_color(Stdout, |t| t.green()),
            outcome.reports.len(),
            if dry_run { " checked" } else { " applied" }
        );
    }
    Ok(())
}

/// Apply a single CSV file from anywhere on disk.
pub(crate) fn run_import(
    settings: &Settings,
    file: PathBuf,
    no_archive: bool,
    dry_run: bool,
    quiet: bool,
) -> Result<(), CliError> {
    if !file.is_file() {
        return Err(CliError::batch(format!("{} is not a file", file.display())));
    }

    let conn = open_catalog(settings)?;
    let options = sync_options(settings, dry_run);
    let progress = BarProgress::new(quiet);

    let report = shelfsync_import::sync_file(&conn, &file, &options, &progress)
        .map_err(|e| CliError::batch(format!("{}: {}", file.display(), e)))?;
    print_report(&report);

    if !dry_run && !no_archive {
        let dest = shelfsync_import::archive_file(&file, &options.paths.archive_dir)
            .map_err(|e| CliError::batch(e.to_string()))?;
        log::info!("Archived to {}", dest.display());
    }
    Ok(())
}
