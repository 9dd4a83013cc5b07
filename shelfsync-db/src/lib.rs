//! SQLite persistence layer for the product catalog.
//!
//! Provides schema creation, write operations, and snapshot/listing queries
//! backed by SQLite (via rusqlite with bundled feature).

pub mod operations;
pub mod queries;
pub mod schema;

pub use operations::{
    OperationError, deactivate_category, deactivate_product, insert_import_run, insert_redirect,
    insert_row_errors, replace_product_images, set_category_seo, upsert_category,
    upsert_image_fingerprint, upsert_product,
};
pub use queries::{
    CatalogStats, catalog_stats, find_category_by_name, find_product_by_sku, images_for_product,
    list_import_runs, list_redirects, load_categories, load_image_fingerprints, load_product_images,
    load_products, row_errors_for_run,
};
pub use schema::{SchemaError, open_database, open_memory};
