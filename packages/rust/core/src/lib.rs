//! Core pipeline orchestration and domain logic for the three.js docset builder.
//!
//! Each stage lives in its own module; [`pipeline::build_docset`] runs them
//! in order against a [`tools::SourceTools`] implementation.

pub mod assembler;
pub mod collector;
mod fsutil;
pub mod indexer;
pub mod manifest;
pub mod pipeline;
pub mod tools;
pub mod version;

#[cfg(test)]
mod fixtures;

pub use pipeline::{BuildSummary, ProgressReporter, SilentProgress, build_docset};
pub use tools::{SourceTools, SystemTools};
