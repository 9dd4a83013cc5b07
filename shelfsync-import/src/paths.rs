//! Filesystem layout of the ETL: where batches arrive, where source images
//! live, and where normalized images are written.

use std::path::{Path, PathBuf};

/// File name of the operator-supplied placeholder source under `uploads/`.
pub const PLACEHOLDER_SOURCE: &str = "no-photo.png";

/// Directory roots used by one sync run.
#[derive(Debug, Clone)]
pub struct CatalogPaths {
    /// Incoming CSV batches.
    pub inbox_dir: PathBuf,
    /// Source images: `categories/` and `products/<sku>/`.
    pub uploads_dir: PathBuf,
    /// Processed batches are moved here.
    pub archive_dir: PathBuf,
    /// Root under which `img/` is written.
    pub output_dir: PathBuf,
    /// Prefix for public image paths stored in the database (e.g. `/assets`).
    pub public_prefix: String,
}

/// A normalized image location: the file on disk and the path the site serves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputImage {
    pub file: PathBuf,
    pub public_path: String,
}

impl CatalogPaths {
    /// Standard layout: `inbox/`, `uploads/` and `archive/` under `data_dir`.
    pub fn from_data_dir(data_dir: &Path, output_dir: &Path, public_prefix: &str) -> Self {
        Self {
            inbox_dir: data_dir.join("inbox"),
            uploads_dir: data_dir.join("uploads"),
            archive_dir: data_dir.join("archive"),
            output_dir: output_dir.to_path_buf(),
            public_prefix: public_prefix.trim_end_matches('/').to_string(),
        }
    }

    pub fn category_uploads(&self) -> PathBuf {
        self.uploads_dir.join("categories")
    }

    pub fn product_uploads(&self, sku: &str) -> PathBuf {
        self.uploads_dir.join("products").join(sku)
    }

    pub fn placeholder_source(&self) -> PathBuf {
        self.uploads_dir.join(PLACEHOLDER_SOURCE)
    }

    pub fn category_output(&self, slug: &str) -> OutputImage {
        self.output(&format!("img/categories/{slug}.webp"))
    }

    pub fn product_output(&self, sku: &str, stem: &str) -> OutputImage {
        self.output(&format!("img/products/{sku}/{stem}.webp"))
    }

    pub fn placeholder_output(&self) -> OutputImage {
        self.output("img/no-photo.webp")
    }

    fn output(&self, relative: &str) -> OutputImage {
        OutputImage {
            file: self.output_dir.join(relative),
            public_path: format!("{}/{}", self.public_prefix, relative),
        }
    }
}

/// Whether `s` can be used as a single path component (SKU directories).
pub fn is_safe_component(s: &str) -> bool {
    !s.is_empty() && s != "." && s != ".." && !s.contains(['/', '\\', '\0'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_paths_use_prefix() {
        let paths = CatalogPaths::from_data_dir(Path::new("data"), Path::new("site"), "/assets/");
        let out = paths.category_output("armatura");
        assert_eq!(out.public_path, "/assets/img/categories/armatura.webp");
        assert_eq!(out.file, Path::new("site/img/categories/armatura.webp"));
        assert_eq!(
            paths.product_output("SKU-1", "front").public_path,
            "/assets/img/products/SKU-1/front.webp"
        );
    }

    #[test]
    fn empty_prefix_yields_root_relative_paths() {
        let paths = CatalogPaths::from_data_dir(Path::new("d"), Path::new("o"), "");
        assert_eq!(paths.placeholder_output().public_path, "/img/no-photo.webp");
    }

    #[test]
    fn unsafe_components() {
        assert!(is_safe_component("SKU-001"));
        assert!(!is_safe_component(".."));
        assert!(!is_safe_component("a/b"));
        assert!(!is_safe_component(""));
    }
}
