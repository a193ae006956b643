//! Shared types, error model, and configuration for the docset builder.
//!
//! This crate is the foundation depended on by all other workspace crates.
//! It provides:
//! - [`DocsetError`] — the unified error type
//! - Domain types ([`Language`], [`VersionTag`], [`Manifest`], [`IndexEntry`])
//! - Configuration ([`DocsetConfig`], [`BuildPaths`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    BuildCommandsConfig, BuildOptions, BuildPaths, CONFIG_FILE_NAME, DocsetConfig,
    INDEX_FILE_NAME, PathsConfig, ProjectConfig, load_config, load_config_from,
};
pub use error::{DocsetError, Result};
pub use types::{
    CategoryMap, EntryType, IndexEntry, LATEST, Language, Manifest, VersionRequest, VersionTag,
};
