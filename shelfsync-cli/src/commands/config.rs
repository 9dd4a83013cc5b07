use std::fmt::Display;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;
use crate::settings::{Setting, Settings, user_settings_path};

fn show_setting<T: Display>(label: &str, setting: &Setting<T>) {
    log::info!(
        "  {:<14} {} {}",
        label,
        setting.value,
        format!("({})", setting.source).if_supports_color(Stdout, |t| t.dimmed()),
    );
}

/// Print every effective setting and where it came from.
pub(crate) fn run_config_show(settings: &Settings) -> Result<(), CliError> {
    log::info!(
        "{}",
        "Effective settings".if_supports_color(Stdout, |t| t.bold())
    );
    match &settings.file {
        Some(path) => log::info!("  Settings file: {}", path.display()),
        None => log::info!(
            "  Settings file: {}",
            "(none)".if_supports_color(Stdout, |t| t.dimmed())
        ),
    }
    crate::log_blank();

    let display = |s: &Setting<std::path::PathBuf>| Setting {
        value: s.value.display().to_string(),
        source: s.source.clone(),
    };
    show_setting("data_dir", &display(&settings.data_dir));
    show_setting("output_dir", &display(&settings.output_dir));
    show_setting("database", &display(&settings.database));
    show_setting("public_prefix", &settings.public_prefix);
    show_setting("currency", &settings.currency);
    show_setting("workers", &settings.workers);

    let paths = settings.catalog_paths();
    crate::log_blank();
    log::info!("  inbox:    {}", paths.inbox_dir.display());
    log::info!("  uploads:  {}", paths.uploads_dir.display());
    log::info!("  archive:  {}", paths.archive_dir.display());
    Ok(())
}

/// Print the per-user settings file location.
pub(crate) fn run_config_path() -> Result<(), CliError> {
    match user_settings_path() {
        Some(path) => {
            let status = if path.exists() { "exists" } else { "not created" };
            log::info!("{} ({})", path.display(), status);
            Ok(())
        }
        None => Err(CliError::config(
            "Could not determine the user configuration directory",
        )),
    }
}
