//! Read queries for the catalog database.
//!
//! Snapshot loaders used by the synchronizer, plus listing and stats
//! queries for the CLI.

use std::collections::HashMap;

use rusqlite::{Connection, OptionalExtension, Row, params};
use shelfsync_catalog::types::*;

use crate::operations::OperationError;

// ── Snapshot Loaders ────────────────────────────────────────────────────────

/// Load every category, active or not, ordered by name.
pub fn load_categories(conn: &Connection) -> Result<Vec<Category>, OperationError> {
    let mut stmt = conn.prepare(
        "SELECT slug, name, image_path, is_active, seo_title, seo_description
         FROM categories ORDER BY name",
    )?;
    let rows = stmt.query_map([], row_to_category)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Load every product, active or not, ordered by SKU.
pub fn load_products(conn: &Connection) -> Result<Vec<Product>, OperationError> {
    let mut stmt = conn.prepare(
        "SELECT sku, slug, category_slug, name, price, currency, in_stock,
                is_active, image_path, content_hash
         FROM products ORDER BY sku",
    )?;
    let rows = stmt.query_map([], row_to_product)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Load redirect history, oldest first, optionally for one entity type.
pub fn list_redirects(
    conn: &Connection,
    entity_type: Option<EntityType>,
) -> Result<Vec<Redirect>, OperationError> {
    let mut stmt = conn.prepare(
        "SELECT id, entity_type, entity_key, old_slug, new_slug, created_at
         FROM redirects
         WHERE ?1 IS NULL OR entity_type = ?1
         ORDER BY id",
    )?;
    let rows = stmt.query_map(params![entity_type.map(|t| t.as_str())], row_to_redirect)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Load all recorded image fingerprints keyed by output path.
pub fn load_image_fingerprints(
    conn: &Connection,
) -> Result<HashMap<String, ImageFingerprint>, OperationError> {
    let mut stmt =
        conn.prepare("SELECT output_path, source_path, source_hash FROM image_fingerprints")?;
    let rows = stmt.query_map([], |row| {
        Ok(ImageFingerprint {
            output_path: row.get(0)?,
            source_path: row.get(1)?,
            source_hash: row.get(2)?,
        })
    })?;
    let mut map = HashMap::new();
    for row in rows {
        let fp = row?;
        map.insert(fp.output_path.clone(), fp);
    }
    Ok(map)
}

/// Load all product images grouped by SKU, each list in display order.
pub fn load_product_images(
    conn: &Connection,
) -> Result<HashMap<String, Vec<ProductImage>>, OperationError> {
    let mut stmt = conn.prepare(
        "SELECT sku, file_path, alt, sort_order, is_primary
         FROM product_images ORDER BY sku, sort_order, id",
    )?;
    let rows = stmt.query_map([], row_to_product_image)?;
    let mut map: HashMap<String, Vec<ProductImage>> = HashMap::new();
    for row in rows {
        let image = row?;
        map.entry(image.sku.clone()).or_default().push(image);
    }
    Ok(map)
}

// ── Entity Lookups ──────────────────────────────────────────────────────────

/// Find a category by its display name.
pub fn find_category_by_name(
    conn: &Connection,
    name: &str,
) -> Result<Option<Category>, OperationError> {
    conn.query_row(
        "SELECT slug, name, image_path, is_active, seo_title, seo_description
         FROM categories WHERE name = ?1",
        params![name],
        row_to_category,
    )
    .optional()
    .map_err(Into::into)
}

/// Find a product by SKU.
pub fn find_product_by_sku(
    conn: &Connection,
    sku: &str,
) -> Result<Option<Product>, OperationError> {
    conn.query_row(
        "SELECT sku, slug, category_slug, name, price, currency, in_stock,
                is_active, image_path, content_hash
         FROM products WHERE sku = ?1",
        params![sku],
        row_to_product,
    )
    .optional()
    .map_err(Into::into)
}

/// Images of a product in display order.
pub fn images_for_product(
    conn: &Connection,
    sku: &str,
) -> Result<Vec<ProductImage>, OperationError> {
    let mut stmt = conn.prepare(
        "SELECT sku, file_path, alt, sort_order, is_primary
         FROM product_images WHERE sku = ?1 ORDER BY sort_order, id",
    )?;
    let rows = stmt.query_map(params![sku], row_to_product_image)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

// ── Import Runs ─────────────────────────────────────────────────────────────

/// Most recent import runs first.
pub fn list_import_runs(conn: &Connection, limit: u32) -> Result<Vec<ImportRun>, OperationError> {
    let mut stmt = conn.prepare(
        "SELECT id, file_name, started_at, finished_at, rows_total, rows_skipped,
                categories_created, categories_updated, categories_deactivated,
                products_created, products_updated, products_unchanged, products_deactivated,
                redirects_created, images_converted, images_reused, images_failed
         FROM import_runs ORDER BY id DESC LIMIT ?1",
    )?;
    let rows = stmt.query_map(params![limit], |row| {
        let count = |i: usize| -> rusqlite::Result<u64> { Ok(row.get::<_, i64>(i)? as u64) };
        Ok(ImportRun {
            id: row.get(0)?,
            file_name: row.get(1)?,
            started_at: row.get(2)?,
            finished_at: row.get(3)?,
            counters: RunCounters {
                rows_total: count(4)?,
                rows_skipped: count(5)?,
                categories_created: count(6)?,
                categories_updated: count(7)?,
                categories_deactivated: count(8)?,
                products_created: count(9)?,
                products_updated: count(10)?,
                products_unchanged: count(11)?,
                products_deactivated: count(12)?,
                redirects_created: count(13)?,
                images_converted: count(14)?,
                images_reused: count(15)?,
                images_failed: count(16)?,
            },
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Skipped rows recorded for one run, in line order.
pub fn row_errors_for_run(
    conn: &Connection,
    run_id: i64,
) -> Result<Vec<RowErrorRecord>, OperationError> {
    let mut stmt = conn.prepare(
        "SELECT line, sku, code, message FROM import_row_errors
         WHERE run_id = ?1 ORDER BY line, id",
    )?;
    let rows = stmt.query_map(params![run_id], |row| {
        Ok(RowErrorRecord {
            line: row.get::<_, i64>(0)? as u64,
            sku: row.get(1)?,
            code: row.get(2)?,
            message: row.get(3)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

// ── Catalog Stats ───────────────────────────────────────────────────────────

/// Summary statistics for the catalog database.
#[derive(Debug, Default)]
pub struct CatalogStats {
    pub categories_active: i64,
    pub categories_inactive: i64,
    pub products_active: i64,
    pub products_inactive: i64,
    pub product_images: i64,
    pub redirects: i64,
    pub import_runs: i64,
}

/// Get summary statistics for the catalog.
pub fn catalog_stats(conn: &Connection) -> Result<CatalogStats, OperationError> {
    let count = |sql: &str| -> Result<i64, rusqlite::Error> {
        conn.query_row(sql, [], |row| row.get(0))
    };

    Ok(CatalogStats {
        categories_active: count("SELECT COUNT(*) FROM categories WHERE is_active = 1")?,
        categories_inactive: count("SELECT COUNT(*) FROM categories WHERE is_active = 0")?,
        products_active: count("SELECT COUNT(*) FROM products WHERE is_active = 1")?,
        products_inactive: count("SELECT COUNT(*) FROM products WHERE is_active = 0")?,
        product_images: count("SELECT COUNT(*) FROM product_images")?,
        redirects: count("SELECT COUNT(*) FROM redirects")?,
        import_runs: count("SELECT COUNT(*) FROM import_runs")?,
    })
}

// ── Row Mappers ─────────────────────────────────────────────────────────────

fn row_to_category(row: &Row) -> rusqlite::Result<Category> {
    Ok(Category {
        slug: row.get(0)?,
        name: row.get(1)?,
        image_path: row.get(2)?,
        is_active: row.get(3)?,
        seo_title: row.get(4)?,
        seo_description: row.get(5)?,
    })
}

fn row_to_product(row: &Row) -> rusqlite::Result<Product> {
    Ok(Product {
        sku: row.get(0)?,
        slug: row.get(1)?,
        category_slug: row.get(2)?,
        name: row.get(3)?,
        price: row.get(4)?,
        currency: row.get(5)?,
        in_stock: row.get(6)?,
        is_active: row.get(7)?,
        image_path: row.get(8)?,
        content_hash: row.get(9)?,
    })
}

fn row_to_product_image(row: &Row) -> rusqlite::Result<ProductImage> {
    Ok(ProductImage {
        sku: row.get(0)?,
        file_path: row.get(1)?,
        alt: row.get(2)?,
        sort_order: row.get(3)?,
        is_primary: row.get(4)?,
    })
}

fn row_to_redirect(row: &Row) -> rusqlite::Result<Redirect> {
    let entity_type: String = row.get(1)?;
    let entity_type = entity_type.parse::<EntityType>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, e.into())
    })?;
    Ok(Redirect {
        id: row.get(0)?,
        entity_type,
        entity_key: row.get(2)?,
        old_slug: row.get(3)?,
        new_slug: row.get(4)?,
        created_at: row.get(5)?,
    })
}
