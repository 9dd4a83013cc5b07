//! Source image lookup under the uploads directory.
//!
//! Category images are matched by file stem using a fixed list of naming
//! strategies. Product images are every accepted file in the product's SKU
//! directory. A missing image is never an error; callers fall back to the
//! placeholder.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use shelfsync_catalog::slugify;

use crate::paths::{CatalogPaths, is_safe_component};

/// Accepted source extensions, in preference order when several files share a stem.
pub const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

/// Ways a category image file may be named, tried in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryImageStrategy {
    /// `slugify(name)`, e.g. `armatura`.
    TransliteratedName,
    /// Lowercased name with spaces as hyphens, e.g. `листовой-прокат`.
    HyphenatedName,
    /// Lowercased name with spaces as underscores, e.g. `листовой_прокат`.
    UnderscoredName,
    /// The category's final slug.
    FinalSlug,
}

impl CategoryImageStrategy {
    pub const ORDER: [CategoryImageStrategy; 4] = [
        CategoryImageStrategy::TransliteratedName,
        CategoryImageStrategy::HyphenatedName,
        CategoryImageStrategy::UnderscoredName,
        CategoryImageStrategy::FinalSlug,
    ];

    /// File stem this strategy looks for.
    pub fn stem(&self, name: &str, slug: &str) -> String {
        match self {
            CategoryImageStrategy::TransliteratedName => slugify(name),
            CategoryImageStrategy::HyphenatedName => name.trim().to_lowercase().replace(' ', "-"),
            CategoryImageStrategy::UnderscoredName => name.trim().to_lowercase().replace(' ', "_"),
            CategoryImageStrategy::FinalSlug => slug.to_string(),
        }
    }
}

/// A source image chosen for a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImage {
    pub path: PathBuf,
    pub strategy: CategoryImageStrategy,
}

/// Listing of `uploads/categories/`, scanned once per batch.
#[derive(Debug, Default)]
pub struct CategoryImages {
    files: Vec<PathBuf>,
}

impl CategoryImages {
    pub fn scan(paths: &CatalogPaths) -> Self {
        let dir = paths.category_uploads();
        let files = list_images(&dir).unwrap_or_else(|e| {
            log::warn!("Cannot list category images in {}: {e}", dir.display());
            Vec::new()
        });
        Self { files }
    }

    /// First file matching any strategy, in strategy order.
    pub fn resolve(&self, name: &str, slug: &str) -> Option<ResolvedImage> {
        CategoryImageStrategy::ORDER.iter().find_map(|strategy| {
            let stem = strategy.stem(name, slug);
            find_by_stem(&self.files, &stem).map(|path| ResolvedImage {
                path: path.clone(),
                strategy: *strategy,
            })
        })
    }
}

/// All source images of a product, sorted by file name.
pub fn resolve_product_images(paths: &CatalogPaths, sku: &str) -> Vec<PathBuf> {
    if !is_safe_component(sku) {
        log::warn!("SKU {sku:?} cannot name a directory; skipping its images");
        return Vec::new();
    }
    let dir = paths.product_uploads(sku);
    list_images(&dir).unwrap_or_else(|e| {
        log::warn!("Cannot list images in {}: {e}", dir.display());
        Vec::new()
    })
}

/// Files in `dir` with an accepted extension, sorted by file name.
/// A missing directory yields an empty list.
pub fn list_images(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && extension_rank(&path).is_some() {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Position of the file's extension in [`IMAGE_EXTENSIONS`], case-insensitive.
fn extension_rank(path: &Path) -> Option<usize> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    IMAGE_EXTENSIONS.iter().position(|e| *e == ext)
}

/// The file whose stem equals `stem` (case-insensitive), preferring the
/// earliest extension in [`IMAGE_EXTENSIONS`].
fn find_by_stem<'a>(files: &'a [PathBuf], stem: &str) -> Option<&'a PathBuf> {
    if stem.is_empty() {
        return None;
    }
    let stem = stem.to_lowercase();
    files
        .iter()
        .filter(|path| {
            path.file_stem()
                .and_then(|s| s.to_str())
                .is_some_and(|s| s.to_lowercase() == stem)
        })
        .min_by_key(|path| extension_rank(path))
}
