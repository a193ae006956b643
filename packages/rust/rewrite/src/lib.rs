//! In-place rewriting of the generated three.js documentation.
//!
//! Two independent rewrites run over the copied documentation tree:
//! 1. [`patch_page_script`] neutralizes the hosted site's routing in `page.js`
//! 2. [`rewrite_anchors`] expands member markup in API pages into docset anchors
//!
//! Both are pure string functions; the `*_file` / `*_tree` wrappers do the I/O.

mod anchors;
mod page_script;

use std::path::Path;

use tracing::{debug, info, instrument, warn};
use walkdir::WalkDir;

use threejs_docset_shared::{DocsetError, Result};

pub use anchors::{AnchorRewrite, rewrite_anchors};
pub use page_script::ScriptPatch;

/// Apply the `page.js` passes to a script's source.
pub fn patch_page_script(script: &str) -> ScriptPatch {
    page_script::run_passes(script)
}

/// Patch `page.js` on disk.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn patch_page_script_file(path: &Path) -> Result<ScriptPatch> {
    let content = std::fs::read_to_string(path).map_err(|e| DocsetError::io(path, e))?;
    let patch = patch_page_script(&content);

    for pass in &patch.missed {
        warn!(pass, "page.js pattern not found, left unchanged");
    }

    std::fs::write(path, &patch.script).map_err(|e| DocsetError::io(path, e))?;
    debug!("page.js patched");
    Ok(patch)
}

/// Counters for one run over an API reference tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteReport {
    /// HTML pages visited.
    pub pages: usize,
    /// Pages that had at least one block replaced.
    pub pages_changed: usize,
    /// Member blocks replaced across all pages.
    pub anchors_replaced: usize,
    /// Member openers that did not match the full pattern.
    pub unmatched_candidates: usize,
}

/// Rewrite member markup in every `.html` file under `api_dir`, recursively.
#[instrument(skip_all, fields(dir = %api_dir.display()))]
pub fn rewrite_api_tree(api_dir: &Path) -> Result<RewriteReport> {
    let mut report = RewriteReport::default();

    if !api_dir.is_dir() {
        return Err(DocsetError::validation(format!(
            "API reference directory not found: {}",
            api_dir.display()
        )));
    }

    for entry in WalkDir::new(api_dir).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(api_dir).to_path_buf();
            DocsetError::io(path, e.into())
        })?;
        let path = entry.path();

        let is_html = path.extension().and_then(|e| e.to_str()) == Some("html");
        if !entry.file_type().is_file() || !is_html {
            continue;
        }

        let Some(page_name) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };

        let html = std::fs::read_to_string(path).map_err(|e| DocsetError::io(path, e))?;
        let out = rewrite_anchors(page_name, &html);

        report.pages += 1;
        report.anchors_replaced += out.replaced;
        report.unmatched_candidates += out.unmatched;

        if out.unmatched > 0 {
            warn!(
                page = %path.display(),
                unmatched = out.unmatched,
                "member markup left unrewritten"
            );
        }

        if out.replaced > 0 {
            std::fs::write(path, &out.html).map_err(|e| DocsetError::io(path, e))?;
            report.pages_changed += 1;
            debug!(page = page_name, anchors = out.replaced, "rewrote anchors");
        }
    }

    info!(
        pages = report.pages,
        anchors = report.anchors_replaced,
        unmatched = report.unmatched_candidates,
        "API pages rewritten"
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir()
            .join(format!("docset-rewrite-test-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn rewrites_nested_pages_and_counts() {
        let api = temp_dir().join("api").join("en");
        std::fs::create_dir_all(api.join("core")).unwrap();
        std::fs::create_dir_all(api.join("extras").join("core")).unwrap();

        std::fs::write(
            api.join("core").join("Object3D.html"),
            "<h3>[property:String name]</h3>\n<h3>[method:null updateMatrix]()</h3>",
        )
        .unwrap();
        std::fs::write(
            api.join("extras").join("core").join("Curve.html"),
            "<h3>[method:Vector getPoint]( [param:Float t] )</h3>\n<h3>[method:Array]</h3>",
        )
        .unwrap();
        std::fs::write(api.join("core").join("notes.txt"), "[property:String name]").unwrap();

        let report = rewrite_api_tree(&api).expect("rewrite");
        assert_eq!(report.pages, 2);
        assert_eq!(report.pages_changed, 2);
        assert_eq!(report.anchors_replaced, 3);
        assert_eq!(report.unmatched_candidates, 1);

        let object3d = std::fs::read_to_string(api.join("core").join("Object3D.html")).unwrap();
        assert!(object3d.contains("Object3D.updateMatrix"));
        assert!(object3d.contains(r#"id="name""#));

        let curve =
            std::fs::read_to_string(api.join("extras").join("core").join("Curve.html")).unwrap();
        assert!(curve.contains("Curve.getPoint"));
        assert!(curve.contains("[method:Array]"));

        let notes = std::fs::read_to_string(api.join("core").join("notes.txt")).unwrap();
        assert_eq!(notes, "[property:String name]");
    }

    #[test]
    fn missing_api_dir_is_an_error() {
        let missing = temp_dir().join("api").join("zh");
        assert!(rewrite_api_tree(&missing).is_err());
    }

    #[test]
    fn page_script_file_is_patched_in_place() {
        let path = temp_dir().join("page.js");
        std::fs::write(&path, "window.location.replace( url );").unwrap();

        let patch = patch_page_script_file(&path).expect("patch");
        assert_eq!(patch.missed.len(), 2);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "// window.location.replace( url );");
    }
}
