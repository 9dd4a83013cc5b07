use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use shelfsync_catalog::types::EntityType;

use crate::CliError;
use crate::settings::Settings;

use super::{open_existing_catalog, truncate_str};

pub(crate) fn run_redirects(
    settings: &Settings,
    entity: Option<EntityType>,
) -> Result<(), CliError> {
    let Some(conn) = open_existing_catalog(settings)? else {
        return Ok(());
    };

    let redirects = shelfsync_db::list_redirects(&conn, entity)
        .map_err(|e| CliError::database(format!("Failed to list redirects: {}", e)))?;

    if redirects.is_empty() {
        log::info!("No redirects recorded.");
        return Ok(());
    }

    log::info!(
        "{}",
        format!(
            "{:<10} {:<20} {:<32} {:<32} {}",
            "Type", "Entity", "Old slug", "New slug", "Created"
        )
        .if_supports_color(Stdout, |t| t.bold())
    );
    for r in &redirects {
        log::info!(
            "{:<10} {:<20} {:<32} {:<32} {}",
            r.entity_type.as_str(),
            truncate_str(&r.entity_key, 20),
            truncate_str(&r.old_slug, 32),
            truncate_str(&r.new_slug, 32),
            r.created_at.if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    crate::log_blank();
    log::info!("{} redirect(s)", redirects.len());
    Ok(())
}
