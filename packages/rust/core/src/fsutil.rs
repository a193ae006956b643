//! Filesystem helpers shared by the collector and the assembler.

use std::path::Path;

use tracing::debug;
use walkdir::WalkDir;

use threejs_docset_shared::{DocsetError, Result};

/// Recursively copy `src` into `dst`, following symlinks. Returns files copied.
pub(crate) fn copy_dir_all(src: &Path, dst: &Path) -> Result<usize> {
    if !src.is_dir() {
        return Err(DocsetError::io(
            src,
            std::io::Error::new(std::io::ErrorKind::NotFound, "source directory not found"),
        ));
    }

    let mut files = 0;
    for entry in WalkDir::new(src).follow_links(true) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(src).to_path_buf();
            DocsetError::io(path, e.into())
        })?;

        let relative = entry.path().strip_prefix(src).map_err(|_| {
            DocsetError::validation(format!(
                "{} escaped {}",
                entry.path().display(),
                src.display()
            ))
        })?;
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target).map_err(|e| DocsetError::io(&target, e))?;
        } else {
            std::fs::copy(entry.path(), &target).map_err(|e| DocsetError::io(entry.path(), e))?;
            files += 1;
        }
    }

    debug!(src = %src.display(), dst = %dst.display(), files, "copied tree");
    Ok(files)
}

/// Remove `dir` and everything under it, if it exists.
pub(crate) fn remove_dir_if_exists(dir: &Path) -> Result<()> {
    if dir.exists() {
        std::fs::remove_dir_all(dir).map_err(|e| DocsetError::io(dir, e))?;
        debug!(path = %dir.display(), "removed directory");
    }
    Ok(())
}

/// Move a directory, copying when a rename is not possible (e.g. across devices).
pub(crate) fn move_dir(src: &Path, dst: &Path) -> Result<()> {
    if let Some(parent) = dst.parent() {
        std::fs::create_dir_all(parent).map_err(|e| DocsetError::io(parent, e))?;
    }

    match std::fs::rename(src, dst) {
        Ok(()) => Ok(()),
        Err(e) => {
            debug!(error = %e, "rename failed, falling back to copy");
            copy_dir_all(src, dst)?;
            std::fs::remove_dir_all(src).map_err(|e| DocsetError::io(src, e))
        }
    }
}
