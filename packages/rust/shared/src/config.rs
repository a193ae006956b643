//! Build configuration for the docset builder.
//!
//! An optional `docset.toml` lives in the project root next to the source
//! checkout. CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{DocsetError, Result};
use crate::types::{Language, VersionRequest};

/// Default configuration file name, looked up in the project root.
pub const CONFIG_FILE_NAME: &str = "docset.toml";

/// File name of the search index inside `Contents/Resources`.
pub const INDEX_FILE_NAME: &str = "docSet.dsidx";

// ---------------------------------------------------------------------------
// Config structs (matching docset.toml schema)
// ---------------------------------------------------------------------------

/// Top-level config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocsetConfig {
    /// What is being packaged.
    #[serde(default)]
    pub project: ProjectConfig,

    /// Directory layout relative to the project root.
    #[serde(default)]
    pub paths: PathsConfig,

    /// External build commands.
    #[serde(default)]
    pub build: BuildCommandsConfig,
}

/// `[project]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Bundle name; the output directory is `<name>.docset`.
    #[serde(default = "default_project_name")]
    pub name: String,

    /// Directory holding the git checkout of the documented library.
    #[serde(default = "default_source_dir")]
    pub source_dir: String,

    /// Upstream repository, shown when the checkout is missing.
    #[serde(default = "default_repository")]
    pub repository: Url,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: default_project_name(),
            source_dir: default_source_dir(),
            repository: default_repository(),
        }
    }
}

fn default_project_name() -> String {
    "threejs".into()
}
fn default_source_dir() -> String {
    "three.js".into()
}
fn default_repository() -> Url {
    Url::parse("https://github.com/mrdoob/three.js").expect("valid default repository URL")
}

/// `[paths]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Static assets: `page-add.css`, icons, `info.plist`.
    #[serde(default = "default_assets_dir")]
    pub assets_dir: String,

    /// Scratch directory the build artifacts are copied into.
    #[serde(default = "default_workspace_dir")]
    pub workspace_dir: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            assets_dir: default_assets_dir(),
            workspace_dir: default_workspace_dir(),
        }
    }
}

fn default_assets_dir() -> String {
    "assets".into()
}
fn default_workspace_dir() -> String {
    "output".into()
}

/// `[build]` section. Each command is a program followed by its arguments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildCommandsConfig {
    #[serde(default = "default_install")]
    pub install: Vec<String>,

    #[serde(default = "default_build")]
    pub build: Vec<String>,
}

impl Default for BuildCommandsConfig {
    fn default() -> Self {
        Self {
            install: default_install(),
            build: default_build(),
        }
    }
}

fn default_install() -> Vec<String> {
    vec!["npm".into(), "i".into()]
}
fn default_build() -> Vec<String> {
    vec!["npm".into(), "run".into(), "build".into()]
}

impl DocsetConfig {
    /// Reject configs that cannot drive a build.
    pub fn validate(&self) -> Result<()> {
        if self.project.name.trim().is_empty() {
            return Err(DocsetError::config("project.name must not be empty"));
        }
        if self.build.install.is_empty() {
            return Err(DocsetError::config("build.install must name a program"));
        }
        if self.build.build.is_empty() {
            return Err(DocsetError::config("build.build must name a program"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Resolved paths
// ---------------------------------------------------------------------------

/// Absolute paths for one build. Every stage takes these explicitly.
#[derive(Debug, Clone)]
pub struct BuildPaths {
    /// Project root.
    pub root: PathBuf,
    /// Git checkout of the documented library.
    pub source: PathBuf,
    /// Static asset directory.
    pub assets: PathBuf,
    /// Scratch copy of the build output; becomes `Documents/`.
    pub workspace: PathBuf,
    /// `<name>.docset` bundle.
    pub bundle: PathBuf,
}

impl BuildPaths {
    /// Resolve the configured layout against `root`.
    pub fn resolve(root: &Path, config: &DocsetConfig) -> Self {
        Self {
            root: root.to_path_buf(),
            source: root.join(&config.project.source_dir),
            assets: root.join(&config.paths.assets_dir),
            workspace: root.join(&config.paths.workspace_dir),
            bundle: root.join(format!("{}.docset", config.project.name)),
        }
    }

    /// `Contents/` inside the bundle.
    pub fn contents(&self) -> PathBuf {
        self.bundle.join("Contents")
    }

    /// `Contents/Resources/` inside the bundle.
    pub fn resources(&self) -> PathBuf {
        self.contents().join("Resources")
    }

    /// `Contents/Resources/docSet.dsidx`.
    pub fn index(&self) -> PathBuf {
        self.resources().join(INDEX_FILE_NAME)
    }

    /// `Contents/Resources/Documents/`.
    pub fn documents(&self) -> PathBuf {
        self.resources().join("Documents")
    }
}

// ---------------------------------------------------------------------------
// Runtime build options (merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Everything one pipeline run needs.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub language: Language,
    pub version: VersionRequest,
    pub paths: BuildPaths,
    pub install_cmd: Vec<String>,
    pub build_cmd: Vec<String>,
}

impl BuildOptions {
    pub fn new(
        root: &Path,
        config: &DocsetConfig,
        language: Language,
        version: VersionRequest,
    ) -> Self {
        Self {
            language,
            version,
            paths: BuildPaths::resolve(root, config),
            install_cmd: config.build.install.clone(),
            build_cmd: config.build.build.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load `docset.toml` from `root`. Returns defaults if the file does not exist.
pub fn load_config(root: &Path) -> Result<DocsetConfig> {
    let path = root.join(CONFIG_FILE_NAME);

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(DocsetConfig::default());
    }

    load_config_from(&path)
}

/// Load and validate the config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<DocsetConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| DocsetError::io(path, e))?;

    let config: DocsetConfig = toml::from_str(&content).map_err(|e| {
        DocsetError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    config.validate()?;
    Ok(config)
}
