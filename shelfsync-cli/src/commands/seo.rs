use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use rusqlite::Connection;
use shelfsync_catalog::types::Category;

use crate::CliError;
use crate::settings::Settings;

use super::open_existing_catalog;

/// Requested SEO edit. `None` keeps the stored value, an empty string clears it.
#[derive(Debug, Default)]
pub(crate) struct SeoEdit {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl SeoEdit {
    fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none()
    }
}

fn merge(current: Option<&str>, edit: Option<&str>) -> Option<String> {
    match edit {
        Some("") => None,
        Some(value) => Some(value.to_string()),
        None => current.map(str::to_string),
    }
}

/// Apply an edit to the category with `slug` and return the updated row.
pub(crate) fn apply_seo(
    conn: &Connection,
    slug: &str,
    edit: &SeoEdit,
) -> Result<Category, CliError> {
    let categories = shelfsync_db::load_categories(conn)
        .map_err(|e| CliError::database(format!("Failed to load categories: {}", e)))?;
    let Some(mut category) = categories.into_iter().find(|c| c.slug == slug) else {
        return Err(CliError::database(format!("No category with slug '{}'", slug)));
    };
    if edit.is_empty() {
        return Ok(category);
    }

    category.seo_title = merge(category.seo_title.as_deref(), edit.title.as_deref());
    category.seo_description =
        merge(category.seo_description.as_deref(), edit.description.as_deref());
    shelfsync_db::set_category_seo(
        conn,
        slug,
        category.seo_title.as_deref(),
        category.seo_description.as_deref(),
    )
    .map_err(|e| CliError::database(format!("Failed to update category '{}': {}", slug, e)))?;
    Ok(category)
}

/// Show or edit a category's SEO metadata. Imports never overwrite it.
pub(crate) fn run_seo(settings: &Settings, slug: &str, edit: SeoEdit) -> Result<(), CliError> {
    let Some(conn) = open_existing_catalog(settings)? else {
        return Ok(());
    };
    let changed = !edit.is_empty();
    let category = apply_seo(&conn, slug, &edit)?;

    let none = || "(none)".if_supports_color(Stdout, |t| t.dimmed()).to_string();
    log::info!(
        "{} {}",
        category.name.if_supports_color(Stdout, |t| t.bold()),
        format!("({})", category.slug).if_supports_color(Stdout, |t| t.dimmed()),
    );
    log::info!(
        "  Title:       {}",
        category.seo_title.clone().unwrap_or_else(none)
    );
    log::info!(
        "  Description: {}",
        category.seo_description.clone().unwrap_or_else(none)
    );
    if changed {
        log::info!("{}", "Updated.".if_supports_color(Stdout, |t| t.green()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelfsync_db::{find_category_by_name, open_memory, upsert_category};

    fn catalog() -> Connection {
        let conn = open_memory().unwrap();
        upsert_category(
            &conn,
            &Category {
                slug: "armatura".to_string(),
                name: "Арматура".to_string(),
                image_path: "/assets/img/no-photo.webp".to_string(),
                is_active: true,
                seo_title: None,
                seo_description: None,
            },
        )
        .unwrap();
        conn
    }

    #[test]
    fn edits_are_merged_with_stored_values() {
        let conn = catalog();
        let edit = SeoEdit {
            title: Some("Rebar".to_string()),
            description: Some("Steel rebar".to_string()),
        };
        apply_seo(&conn, "armatura", &edit).unwrap();

        let edit = SeoEdit {
            title: Some("Rebar A500C".to_string()),
            ..Default::default()
        };
        let updated = apply_seo(&conn, "armatura", &edit).unwrap();
        assert_eq!(updated.seo_title.as_deref(), Some("Rebar A500C"));
        assert_eq!(updated.seo_description.as_deref(), Some("Steel rebar"));

        let stored = find_category_by_name(&conn, "Арматура").unwrap().unwrap();
        assert_eq!(stored.seo_title.as_deref(), Some("Rebar A500C"));
        assert_eq!(stored.seo_description.as_deref(), Some("Steel rebar"));
    }

    #[test]
    fn empty_value_clears_the_field() {
        let conn = catalog();
        let set = SeoEdit {
            title: Some("Rebar".to_string()),
            ..Default::default()
        };
        apply_seo(&conn, "armatura", &set).unwrap();

        let clear = SeoEdit {
            title: Some(String::new()),
            ..Default::default()
        };
        let updated = apply_seo(&conn, "armatura", &clear).unwrap();
        assert_eq!(updated.seo_title, None);
    }

    #[test]
    fn unknown_slug_is_an_error() {
        let conn = catalog();
        let err = apply_seo(&conn, "truby", &SeoEdit::default()).unwrap_err();
        assert!(matches!(err, CliError::Database(_)));
    }
}
