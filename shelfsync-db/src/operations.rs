//! Write operations for all catalog entity types.
//!
//! Every function takes a plain `&Connection`; callers pass a
//! `rusqlite::Transaction` (which derefs to one) to group writes atomically.

use rusqlite::{Connection, params};
use shelfsync_catalog::types::*;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OperationError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Entity not found: {entity_type} with key '{key}'")]
    NotFound { entity_type: String, key: String },
}

// ── Category Operations ─────────────────────────────────────────────────────

/// Insert or update a category, matched by name.
///
/// A slug change rewrites the primary key; products follow via
/// `ON UPDATE CASCADE`. SEO fields are only written on insert.
pub fn upsert_category(conn: &Connection, category: &Category) -> Result<(), OperationError> {
    let changed = conn.execute(
        "UPDATE categories SET
             slug = ?2,
             image_path = ?3,
             is_active = ?4,
             updated_at = datetime('now')
         WHERE name = ?1",
        params![
            category.name,
            category.slug,
            category.image_path,
            category.is_active,
        ],
    )?;
    if changed == 0 {
        conn.execute(
            "INSERT INTO categories (slug, name, image_path, is_active, seo_title, seo_description)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                category.slug,
                category.name,
                category.image_path,
                category.is_active,
                category.seo_title,
                category.seo_description,
            ],
        )?;
    }
    Ok(())
}

/// Mark a category inactive. Returns whether the row was active before.
pub fn deactivate_category(conn: &Connection, name: &str) -> Result<bool, OperationError> {
    let changed = conn.execute(
        "UPDATE categories SET is_active = 0, updated_at = datetime('now')
         WHERE name = ?1 AND is_active = 1",
        params![name],
    )?;
    Ok(changed > 0)
}

/// Set editor-maintained SEO metadata for a category.
pub fn set_category_seo(
    conn: &Connection,
    slug: &str,
    seo_title: Option<&str>,
    seo_description: Option<&str>,
) -> Result<(), OperationError> {
    let changed = conn.execute(
        "UPDATE categories SET seo_title = ?2, seo_description = ?3, updated_at = datetime('now')
         WHERE slug = ?1",
        params![slug, seo_title, seo_description],
    )?;
    if changed == 0 {
        return Err(OperationError::NotFound {
            entity_type: "category".to_string(),
            key: slug.to_string(),
        });
    }
    Ok(())
}

// ── Product Operations ──────────────────────────────────────────────────────

/// Insert or update a product, matched by SKU.
pub fn upsert_product(conn: &Connection, product: &Product) -> Result<(), OperationError> {
    conn.execute(
        "INSERT INTO products (sku, slug, category_slug, name, price, currency,
             in_stock, is_active, image_path, content_hash)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
         ON CONFLICT(sku) DO UPDATE SET
             slug = excluded.slug,
             category_slug = excluded.category_slug,
             name = excluded.name,
             price = excluded.price,
             currency = excluded.currency,
             in_stock = excluded.in_stock,
             is_active = excluded.is_active,
             image_path = excluded.image_path,
             content_hash = excluded.content_hash,
             updated_at = datetime('now')",
        params![
            product.sku,
            product.slug,
            product.category_slug,
            product.name,
            product.price,
            product.currency,
            product.in_stock,
            product.is_active,
            product.image_path,
            product.content_hash,
        ],
    )?;
    Ok(())
}

/// Mark a product inactive. Returns whether the row was active before.
pub fn deactivate_product(conn: &Connection, sku: &str) -> Result<bool, OperationError> {
    let changed = conn.execute(
        "UPDATE products SET is_active = 0, updated_at = datetime('now')
         WHERE sku = ?1 AND is_active = 1",
        params![sku],
    )?;
    Ok(changed > 0)
}

/// Replace all image rows of a product with `images`.
pub fn replace_product_images(
    conn: &Connection,
    sku: &str,
    images: &[ProductImage],
) -> Result<(), OperationError> {
    conn.execute("DELETE FROM product_images WHERE sku = ?1", params![sku])?;
    let mut stmt = conn.prepare(
        "INSERT INTO product_images (sku, file_path, alt, sort_order, is_primary)
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;
    for image in images {
        stmt.execute(params![
            sku,
            image.file_path,
            image.alt,
            image.sort_order,
            image.is_primary,
        ])?;
    }
    Ok(())
}

// ── Redirect Operations ─────────────────────────────────────────────────────

/// Append a redirect record. Existing records are never touched.
pub fn insert_redirect(conn: &Connection, redirect: &NewRedirect) -> Result<i64, OperationError> {
    conn.execute(
        "INSERT INTO redirects (entity_type, entity_key, old_slug, new_slug)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            redirect.entity_type.as_str(),
            redirect.entity_key,
            redirect.old_slug,
            redirect.new_slug,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

// ── Image Fingerprint Operations ────────────────────────────────────────────

/// Record which source produced an output image.
pub fn upsert_image_fingerprint(
    conn: &Connection,
    fingerprint: &ImageFingerprint,
) -> Result<(), OperationError> {
    conn.execute(
        "INSERT INTO image_fingerprints (output_path, source_path, source_hash)
         VALUES (?1, ?2, ?3)
         ON CONFLICT(output_path) DO UPDATE SET
             source_path = excluded.source_path,
             source_hash = excluded.source_hash,
             updated_at = datetime('now')",
        params![
            fingerprint.output_path,
            fingerprint.source_path,
            fingerprint.source_hash,
        ],
    )?;
    Ok(())
}

// ── Import Run Operations ───────────────────────────────────────────────────

/// Insert an import run log entry. Returns the new row ID.
pub fn insert_import_run(conn: &Connection, run: &ImportRun) -> Result<i64, OperationError> {
    let c = &run.counters;
    conn.execute(
        "INSERT INTO import_runs (file_name, started_at, finished_at, rows_total, rows_skipped,
             categories_created, categories_updated, categories_deactivated,
             products_created, products_updated, products_unchanged, products_deactivated,
             redirects_created, images_converted, images_reused, images_failed)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
        params![
            run.file_name,
            run.started_at,
            run.finished_at,
            c.rows_total as i64,
            c.rows_skipped as i64,
            c.categories_created as i64,
            c.categories_updated as i64,
            c.categories_deactivated as i64,
            c.products_created as i64,
            c.products_updated as i64,
            c.products_unchanged as i64,
            c.products_deactivated as i64,
            c.redirects_created as i64,
            c.images_converted as i64,
            c.images_reused as i64,
            c.images_failed as i64,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Attach skipped-row records to an import run.
pub fn insert_row_errors(
    conn: &Connection,
    run_id: i64,
    errors: &[RowError],
) -> Result<(), OperationError> {
    let mut stmt = conn.prepare(
        "INSERT INTO import_row_errors (run_id, line, sku, code, message)
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;
    for error in errors {
        stmt.execute(params![
            run_id,
            error.line as i64,
            error.sku,
            error.kind.code(),
            error.kind.to_string(),
        ])?;
    }
    Ok(())
}
