//! End-to-end build pipeline: checkout → build → collect → index → rewrite → bundle.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{info, instrument};

use threejs_docset_rewrite::RewriteReport;
use threejs_docset_shared::{BuildOptions, DocsetError, Result, VersionTag};
use threejs_docset_storage::SearchIndex;

use crate::assembler;
use crate::collector;
use crate::indexer::{self, IndexCounts};
use crate::manifest;
use crate::tools::SourceTools;
use crate::version;

/// Result of a successful build.
#[derive(Debug, Clone)]
pub struct BuildSummary {
    /// The tag that was checked out and built.
    pub version: VersionTag,
    /// Search index rows per entry type.
    pub counts: IndexCounts,
    /// API page rewrite counters.
    pub rewrite: RewriteReport,
    /// `page.js` passes that found nothing to patch.
    pub script_misses: Vec<&'static str>,
    /// Path to the finished `.docset` bundle.
    pub bundle: PathBuf,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called when the pipeline completes.
    fn done(&self, summary: &BuildSummary);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn done(&self, _summary: &BuildSummary) {}
}

/// Run the full build.
///
/// 1. Check out the requested version
/// 2. Build the library and collect its output into the workspace
/// 3. Parse the manifest and write the search index into a fresh bundle
/// 4. Patch `page.js` and the API reference pages
/// 5. Install assets and move the workspace into the bundle
#[instrument(skip_all, fields(language = %opts.language, version = %opts.version))]
pub async fn build_docset(
    opts: &BuildOptions,
    tools: &dyn SourceTools,
    progress: &dyn ProgressReporter,
) -> Result<BuildSummary> {
    let start = Instant::now();
    let paths = &opts.paths;

    if !paths.source.is_dir() {
        return Err(DocsetError::validation(format!(
            "source checkout not found at {}",
            paths.source.display()
        )));
    }
    assembler::check_assets(&paths.assets)?;

    // --- Phase 1: Version ---
    progress.phase("Checking out version");
    let tag = version::checkout_version(tools, &paths.source, &opts.version)?;

    // --- Phase 2: Build + collect ---
    progress.phase(&format!("Building three.js {tag}"));
    collector::build_source(tools, opts)?;

    progress.phase("Collecting build artifacts");
    collector::collect_artifacts(paths, opts.language)?;

    // --- Phase 3: Manifest + index ---
    progress.phase("Reading manifest");
    let docs = paths.workspace.join("docs");
    let manifest = manifest::load_manifest(&docs, opts.language)?;

    progress.phase("Building search index");
    assembler::prepare_bundle(paths)?;
    let counts = {
        let index = SearchIndex::create(&paths.index()).await?;
        indexer::build_index(&index, &manifest, &paths.workspace.join("examples")).await?
    };

    // --- Phase 4: Rewrite ---
    progress.phase("Patching pages");
    let script = threejs_docset_rewrite::patch_page_script_file(&docs.join("page.js"))?;
    // Rewrites the tree of the language being built; the other one is already gone.
    let api_dir = docs.join("api").join(opts.language.code());
    let rewrite = threejs_docset_rewrite::rewrite_api_tree(&api_dir)?;

    // --- Phase 5: Bundle ---
    progress.phase("Assembling docset");
    assembler::install_bundle(paths)?;
    let rows = assembler::validate_bundle(paths).await?;
    if rows != counts.total() as u64 {
        return Err(DocsetError::validation(format!(
            "bundle index holds {rows} rows, expected {}",
            counts.total()
        )));
    }

    let summary = BuildSummary {
        version: tag,
        counts,
        rewrite,
        script_misses: script.missed,
        bundle: paths.bundle.clone(),
        elapsed: start.elapsed(),
    };

    progress.done(&summary);

    info!(
        version = %summary.version,
        rows = summary.counts.total(),
        anchors = summary.rewrite.anchors_replaced,
        bundle = %summary.bundle.display(),
        elapsed_ms = summary.elapsed.as_millis(),
        "docset build complete"
    );

    Ok(summary)
}
