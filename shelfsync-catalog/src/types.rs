//! Data model types for the product catalog.
//!
//! These types represent the persisted catalog schema: categories, products,
//! product images, slug redirects, and the per-batch import run log.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ── Entity Type ─────────────────────────────────────────────────────────────

/// The kind of catalog entity a slug or redirect belongs to.
///
/// Slugs are unique per entity type, so a category and a product may share one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Category,
    Product,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Category => "category",
            EntityType::Product => "product",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "category" | "categories" => Ok(EntityType::Category),
            "product" | "products" => Ok(EntityType::Product),
            other => Err(format!("unknown entity type '{other}'")),
        }
    }
}

// ── Category ────────────────────────────────────────────────────────────────

/// A product category. The display name is its stable identity across batches;
/// the slug is assigned on first appearance and only changes on explicit override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub slug: String,
    pub name: String,
    /// Public path of the normalized image, or the placeholder.
    pub image_path: String,
    pub is_active: bool,
    /// Maintained by editors; the ETL never overwrites these.
    #[serde(default)]
    pub seo_title: Option<String>,
    #[serde(default)]
    pub seo_description: Option<String>,
}

// ── Product ─────────────────────────────────────────────────────────────────

/// A catalog product keyed by its SKU.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub sku: String,
    /// Derived from the name or an explicit override; may change between batches.
    pub slug: String,
    pub category_slug: String,
    pub name: String,
    pub price: Option<f64>,
    pub currency: String,
    pub in_stock: bool,
    pub is_active: bool,
    /// Public path of the primary image, or the placeholder.
    pub image_path: String,
    /// SHA-256 over category, SKU, name, price and stock; unchanged rows hash equal.
    pub content_hash: String,
}

/// One normalized image belonging to a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    pub sku: String,
    pub file_path: String,
    pub alt: String,
    pub sort_order: i64,
    pub is_primary: bool,
}

// ── Redirect ────────────────────────────────────────────────────────────────

/// A permanent record of a slug change, served as a 301 by the site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redirect {
    pub id: i64,
    pub entity_type: EntityType,
    /// Category name or product SKU.
    pub entity_key: String,
    pub old_slug: String,
    pub new_slug: String,
    pub created_at: String,
}

/// A redirect that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRedirect {
    pub entity_type: EntityType,
    pub entity_key: String,
    pub old_slug: String,
    pub new_slug: String,
}

// ── Row Errors ──────────────────────────────────────────────────────────────

/// Why a CSV row was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowErrorKind {
    /// A required column was empty on this row.
    MissingField(&'static str),
    /// The name or slug override produced an empty slug.
    InvalidSlugSource(String),
    /// The SKU already appeared earlier in the same batch.
    DuplicateSku,
    /// The CSV record itself could not be read.
    Malformed(String),
}

impl RowErrorKind {
    /// Short machine-readable code stored alongside the message.
    pub fn code(&self) -> &'static str {
        match self {
            RowErrorKind::MissingField(_) => "missing_field",
            RowErrorKind::InvalidSlugSource(_) => "invalid_slug_source",
            RowErrorKind::DuplicateSku => "duplicate_sku",
            RowErrorKind::Malformed(_) => "malformed",
        }
    }
}

impl fmt::Display for RowErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowErrorKind::MissingField(field) => write!(f, "missing required field '{field}'"),
            RowErrorKind::InvalidSlugSource(src) => write!(f, "cannot derive a slug from {src:?}"),
            RowErrorKind::DuplicateSku => f.write_str("duplicate sku in batch"),
            RowErrorKind::Malformed(msg) => write!(f, "malformed record: {msg}"),
        }
    }
}

/// A skipped row, reported per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    /// 1-based line number in the source file (the header is line 1).
    pub line: u64,
    pub sku: Option<String>,
    pub kind: RowErrorKind,
}

/// A row error as read back from the run log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowErrorRecord {
    pub line: u64,
    pub sku: Option<String>,
    pub code: String,
    pub message: String,
}

// ── Import Runs ─────────────────────────────────────────────────────────────

/// Counters for one committed batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunCounters {
    pub rows_total: u64,
    pub rows_skipped: u64,
    pub categories_created: u64,
    pub categories_updated: u64,
    pub categories_deactivated: u64,
    pub products_created: u64,
    pub products_updated: u64,
    pub products_unchanged: u64,
    pub products_deactivated: u64,
    pub redirects_created: u64,
    pub images_converted: u64,
    pub images_reused: u64,
    pub images_failed: u64,
}

/// An entry in the import run log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRun {
    pub id: i64,
    pub file_name: String,
    pub started_at: String,
    pub finished_at: String,
    pub counters: RunCounters,
}

// ── Image Fingerprints ──────────────────────────────────────────────────────

/// The source that last produced a normalized output file.
///
/// When the source hash still matches and the output exists, re-encoding is skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFingerprint {
    pub output_path: String,
    pub source_path: String,
    /// Lowercase hex SHA-256 of the source file bytes.
    pub source_hash: String,
}
