//! Docset bundle assembler.
//!
//! The bundle is built in two steps around the indexing stage, because the
//! search index lives inside it:
//!
//! ```text
//! <name>.docset/
//! ├── icon.png
//! ├── icon@2x.png
//! └── Contents/
//!     ├── Info.plist
//!     └── Resources/
//!         ├── docSet.dsidx      (written by the indexer)
//!         └── Documents/        (the processed workspace)
//! ```

use std::path::Path;

use tracing::{debug, info, instrument};

use threejs_docset_shared::{BuildPaths, DocsetError, Result};
use threejs_docset_storage::SearchIndex;

use crate::fsutil::{move_dir, remove_dir_if_exists};

/// Icons copied to the bundle root.
pub const ICONS: [&str; 2] = ["icon.png", "icon@2x.png"];

/// Property list asset, installed as `Contents/Info.plist`.
pub const INFO_PLIST: &str = "info.plist";

/// Every static asset the assembler needs.
pub fn required_assets() -> impl Iterator<Item = &'static str> {
    ICONS.into_iter().chain(std::iter::once(INFO_PLIST))
}

/// Fail early if any asset is missing from `assets_dir`.
pub fn check_assets(assets_dir: &Path) -> Result<()> {
    for name in required_assets().chain(std::iter::once(crate::collector::STYLE_OVERRIDE)) {
        let path = assets_dir.join(name);
        if !path.is_file() {
            return Err(DocsetError::io(
                path,
                std::io::Error::new(std::io::ErrorKind::NotFound, "asset not found"),
            ));
        }
    }
    Ok(())
}

/// Delete any previous bundle and create the `Contents/Resources` skeleton.
#[instrument(skip_all, fields(bundle = %paths.bundle.display()))]
pub fn prepare_bundle(paths: &BuildPaths) -> Result<()> {
    remove_dir_if_exists(&paths.bundle)?;
    let resources = paths.resources();
    std::fs::create_dir_all(&resources).map_err(|e| DocsetError::io(&resources, e))?;
    debug!("bundle skeleton created");
    Ok(())
}

/// Copy the static assets in and move the workspace to `Documents/`.
#[instrument(skip_all, fields(bundle = %paths.bundle.display()))]
pub fn install_bundle(paths: &BuildPaths) -> Result<()> {
    for icon in ICONS {
        copy_asset(&paths.assets.join(icon), &paths.bundle.join(icon))?;
    }
    copy_asset(
        &paths.assets.join(INFO_PLIST),
        &paths.contents().join("Info.plist"),
    )?;

    let documents = paths.documents();
    remove_dir_if_exists(&documents)?;
    move_dir(&paths.workspace, &documents)?;

    info!(documents = %documents.display(), "bundle installed");
    Ok(())
}

/// Verify that a finished bundle has everything a docset reader opens.
///
/// The index is reopened read-only, so a file the reader cannot query fails
/// here. Returns the number of indexed rows.
pub async fn validate_bundle(paths: &BuildPaths) -> Result<u64> {
    let required = [
        paths.contents().join("Info.plist"),
        paths.index(),
        paths.bundle.join(ICONS[0]),
        paths.bundle.join(ICONS[1]),
    ];
    for path in &required {
        if !path.is_file() {
            return Err(DocsetError::validation(format!(
                "bundle is missing {}",
                path.display()
            )));
        }
    }

    let index_page = paths.documents().join("docs").join("index.html");
    if !index_page.is_file() {
        return Err(DocsetError::validation(format!(
            "bundle is missing {}",
            index_page.display()
        )));
    }

    let rows = SearchIndex::open_readonly(&paths.index()).await?.count().await?;
    debug!(rows, "bundle validated");
    Ok(rows)
}

fn copy_asset(from: &Path, to: &Path) -> Result<()> {
    if let Some(parent) = to.parent() {
        std::fs::create_dir_all(parent).map_err(|e| DocsetError::io(parent, e))?;
    }
    std::fs::copy(from, to).map_err(|e| DocsetError::io(from, e))?;
    Ok(())
}
