pub(crate) mod config;
pub(crate) mod redirects;
pub(crate) mod report;
pub(crate) mod runs;
pub(crate) mod seo;
pub(crate) mod stats;
pub(crate) mod sync;

use rusqlite::Connection;
use shelfsync_import::SyncOptions;

use crate::CliError;
use crate::settings::Settings;

/// Open (or create) the catalog database named by the settings.
pub(crate) fn open_catalog(settings: &Settings) -> Result<Connection, CliError> {
    let path = &settings.database.value;
    shelfsync_db::open_database(path).map_err(|e| {
        CliError::database(format!(
            "Failed to open catalog database at {}: {}",
            path.display(),
            e
        ))
    })
}

/// Open the catalog only if it already exists. Read-only commands use this
/// so they never create an empty database.
pub(crate) fn open_existing_catalog(settings: &Settings) -> Result<Option<Connection>, CliError> {
    let path = &settings.database.value;
    if !path.exists() {
        log::warn!("No catalog database found at {}", path.display());
        log::info!("Run 'shelfsync run' to create one.");
        return Ok(None);
    }
    open_catalog(settings).map(Some)
}

pub(crate) fn sync_options(settings: &Settings, dry_run: bool) -> SyncOptions {
    SyncOptions {
        paths: settings.catalog_paths(),
        currency: settings.currency.value.clone(),
        workers: settings.workers.value,
        dry_run,
    }
}

/// Truncate a string to a maximum width in characters, appending "..." if needed.
pub(crate) fn truncate_str(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else if max > 3 {
        let head: String = s.chars().take(max - 3).collect();
        format!("{head}...")
    } else {
        s.chars().take(max).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::truncate_str;

    #[test]
    fn truncates_on_char_boundaries() {
        assert_eq!(truncate_str("armatura", 20), "armatura");
        assert_eq!(truncate_str("Арматура 12мм A500C", 10), "Арматур...");
        assert_eq!(truncate_str("abcdef", 2), "ab");
    }
}
