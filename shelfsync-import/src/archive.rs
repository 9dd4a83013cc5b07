//! Inbox listing and archiving of processed batch files.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
#[error("Cannot archive {}: {source}", path.display())]
pub struct ArchiveError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// CSV files in the inbox, in lexicographic file-name order.
/// A missing inbox yields an empty list.
pub fn list_inbox(inbox: &Path) -> io::Result<Vec<PathBuf>> {
    let entries = match fs::read_dir(inbox) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        let is_csv = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
        if is_csv && path.is_file() {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Move `file` into `archive_dir`, never overwriting an earlier archive:
/// a taken name gets `-2`, `-3`, ... before the extension.
///
/// Falls back to copy-then-remove when a rename is not possible (e.g. across
/// filesystems). The source is only removed after a complete copy.
pub fn archive_file(file: &Path, archive_dir: &Path) -> Result<PathBuf, ArchiveError> {
    let fail = |source| ArchiveError {
        path: file.to_path_buf(),
        source,
    };

    fs::create_dir_all(archive_dir).map_err(fail)?;
    let name = file.file_name().ok_or_else(|| {
        fail(io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))
    })?;
    let destination = unique_destination(archive_dir, Path::new(name));

    if fs::rename(file, &destination).is_err() {
        fs::copy(file, &destination).map_err(|e| {
            let _ = fs::remove_file(&destination);
            fail(e)
        })?;
        fs::remove_file(file).map_err(fail)?;
    }

    log::info!("Archived {} -> {}", file.display(), destination.display());
    Ok(destination)
}

fn unique_destination(dir: &Path, name: &Path) -> PathBuf {
    let candidate = dir.join(name);
    if !candidate.exists() {
        return candidate;
    }

    let stem = name
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = name.extension().map(|e| e.to_string_lossy().into_owned());

    (2u32..)
        .map(|n| match &ext {
            Some(ext) => dir.join(format!("{stem}-{n}.{ext}")),
            None => dir.join(format!("{stem}-{n}")),
        })
        .find(|p| !p.exists())
        .unwrap_or(candidate)
}
