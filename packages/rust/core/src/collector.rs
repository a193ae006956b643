//! Source build and artifact collection.
//!
//! Runs the library's own install/build, then copies the static output into
//! a clean workspace that later becomes the docset's `Documents/` tree.

use std::io::Write;
use std::path::Path;

use tracing::{info, instrument};

use threejs_docset_shared::{BuildOptions, BuildPaths, DocsetError, Language, Result};

use crate::fsutil::{copy_dir_all, remove_dir_if_exists};
use crate::tools::SourceTools;

/// Build output trees copied verbatim from the source checkout.
pub const ARTIFACT_TREES: [&str; 4] = ["build", "docs", "files", "examples"];

/// `docs/` subtrees that exist once per language.
pub const LANGUAGE_TREES: [&str; 3] = ["api", "examples", "manual"];

/// Stylesheet asset appended to `docs/page.css`.
pub const STYLE_OVERRIDE: &str = "page-add.css";

/// What the collector copied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectSummary {
    /// Files copied across all artifact trees.
    pub files_copied: usize,
}

/// Run the configured install and build commands in the source checkout.
#[instrument(skip_all, fields(source = %opts.paths.source.display()))]
pub fn build_source(tools: &dyn SourceTools, opts: &BuildOptions) -> Result<()> {
    tools.run(&opts.paths.source, &opts.install_cmd)?;
    tools.run(&opts.paths.source, &opts.build_cmd)?;
    info!("source build finished");
    Ok(())
}

/// Copy build artifacts into a fresh workspace and drop the other language.
#[instrument(skip_all, fields(workspace = %paths.workspace.display(), %language))]
pub fn collect_artifacts(paths: &BuildPaths, language: Language) -> Result<CollectSummary> {
    remove_dir_if_exists(&paths.workspace)?;
    std::fs::create_dir_all(&paths.workspace).map_err(|e| DocsetError::io(&paths.workspace, e))?;

    let mut summary = CollectSummary::default();
    for tree in ARTIFACT_TREES {
        let (from, to) = (paths.source.join(tree), paths.workspace.join(tree));
        summary.files_copied += copy_dir_all(&from, &to)?;
    }

    let docs = paths.workspace.join("docs");
    append_style_override(&docs.join("page.css"), &paths.assets.join(STYLE_OVERRIDE))?;
    remove_language(&docs, language.other())?;

    info!(files = summary.files_copied, "artifacts collected");
    Ok(summary)
}

/// Append the override stylesheet to the docs' `page.css`.
fn append_style_override(page_css: &Path, override_css: &Path) -> Result<()> {
    let extra =
        std::fs::read_to_string(override_css).map_err(|e| DocsetError::io(override_css, e))?;

    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(page_css)
        .map_err(|e| DocsetError::io(page_css, e))?;
    file.write_all(extra.as_bytes()).map_err(|e| DocsetError::io(page_css, e))?;
    Ok(())
}

/// Delete `docs/{api,examples,manual}/<language>`.
fn remove_language(docs: &Path, language: Language) -> Result<()> {
    for tree in LANGUAGE_TREES {
        let dir = docs.join(tree).join(language.code());
        std::fs::remove_dir_all(&dir).map_err(|e| DocsetError::io(&dir, e))?;
    }
    Ok(())
}
