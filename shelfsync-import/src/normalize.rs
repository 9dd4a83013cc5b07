//! WebP normalization of source images.
//!
//! Outputs are written to a temporary sibling and renamed into place, so the
//! site never serves a half-written file. A source whose SHA-256 matches the
//! recorded fingerprint is not re-encoded while its output still exists.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use sha2::{Digest, Sha256};
use shelfsync_catalog::types::ImageFingerprint;
use thiserror::Error;

/// Fill color of the generated placeholder.
pub const PLACEHOLDER_COLOR: [u8; 3] = [240, 240, 240];

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Cannot decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("Cannot encode {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl ImageError {
    fn io(path: &Path, source: io::Error) -> Self {
        ImageError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// One source-to-output conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizeJob {
    pub source: PathBuf,
    pub output: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizeOutcome {
    /// The output was (re)encoded.
    Converted,
    /// The existing output already matched the source.
    Reused,
}

/// A finished conversion and the fingerprint to record for it.
#[derive(Debug, Clone)]
pub struct NormalizedImage {
    pub outcome: NormalizeOutcome,
    pub fingerprint: ImageFingerprint,
}

/// Lowercase hex SHA-256 of `bytes`.
pub fn source_hash(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Convert `job.source` to WebP at `job.output`, unless `previous` shows the
/// output was already produced from identical source bytes.
pub fn normalize_image(
    job: &NormalizeJob,
    previous: Option<&ImageFingerprint>,
) -> Result<NormalizedImage, ImageError> {
    let bytes = fs::read(&job.source).map_err(|e| ImageError::io(&job.source, e))?;
    let fingerprint = ImageFingerprint {
        output_path: job.output.to_string_lossy().into_owned(),
        source_path: job.source.to_string_lossy().into_owned(),
        source_hash: source_hash(&bytes),
    };

    let unchanged = previous.is_some_and(|p| p.source_hash == fingerprint.source_hash);
    if unchanged && job.output.is_file() {
        log::debug!("Reusing {}", job.output.display());
        return Ok(NormalizedImage {
            outcome: NormalizeOutcome::Reused,
            fingerprint,
        });
    }

    let decoded = image::load_from_memory(&bytes).map_err(|source| ImageError::Decode {
        path: job.source.clone(),
        source,
    })?;
    write_webp(&decoded, &job.output)?;
    log::debug!("Converted {} -> {}", job.source.display(), job.output.display());

    Ok(NormalizedImage {
        outcome: NormalizeOutcome::Converted,
        fingerprint,
    })
}

/// Write the generated 1x1 placeholder to `output` if nothing is there yet.
/// Returns whether a file was written.
pub fn generate_placeholder(output: &Path) -> Result<bool, ImageError> {
    if output.is_file() {
        return Ok(false);
    }
    let pixel = RgbImage::from_pixel(1, 1, Rgb(PLACEHOLDER_COLOR));
    write_webp(&DynamicImage::ImageRgb8(pixel), output)?;
    log::info!("Generated placeholder {}", output.display());
    Ok(true)
}

/// Encode as WebP into `<output>.tmp`, then rename over `output`.
fn write_webp(image: &DynamicImage, output: &Path) -> Result<(), ImageError> {
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent).map_err(|e| ImageError::io(parent, e))?;
    }

    // The WebP encoder takes 8-bit RGB or RGBA only.
    let image = if image.color().has_alpha() {
        DynamicImage::ImageRgba8(image.to_rgba8())
    } else {
        DynamicImage::ImageRgb8(image.to_rgb8())
    };

    let mut tmp = output.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    if let Err(source) = image.save_with_format(&tmp, ImageFormat::WebP) {
        let _ = fs::remove_file(&tmp);
        return Err(ImageError::Encode {
            path: output.to_path_buf(),
            source,
        });
    }
    fs::rename(&tmp, output).map_err(|e| ImageError::io(output, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_lowercase_hex() {
        let hash = source_hash(b"abc");
        assert_eq!(
            hash,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
