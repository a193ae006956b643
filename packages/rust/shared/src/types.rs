//! Core domain types for docset builds.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::DocsetError;

// ---------------------------------------------------------------------------
// Language
// ---------------------------------------------------------------------------

/// Documentation language. The source tree ships exactly these two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Zh,
}

impl Language {
    /// Language code as used in directory names and manifest keys.
    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Zh => "zh",
        }
    }

    /// The language whose trees are removed when building this one.
    pub fn other(self) -> Self {
        match self {
            Self::En => Self::Zh,
            Self::Zh => Self::En,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = DocsetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Self::En),
            "zh" => Ok(Self::Zh),
            other => Err(DocsetError::validation(format!(
                "unsupported language '{other}': expected 'en' or 'zh'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Versions
// ---------------------------------------------------------------------------

/// Sentinel accepted on the command line for "highest numeric tag".
pub const LATEST: &str = "latest";

/// A source revision tag such as `r160`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionTag(pub String);

impl VersionTag {
    /// Ordering key for "latest" resolution.
    ///
    /// The tag minus its first character must be all ASCII digits; anything
    /// else (including values that overflow) sorts as 0.
    pub fn sort_key(&self) -> u128 {
        let mut chars = self.0.chars();
        chars.next();
        let rest = chars.as_str();
        if rest.is_empty() || !rest.bytes().all(|b| b.is_ascii_digit()) {
            return 0;
        }
        rest.parse().unwrap_or(0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the user asked to build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionRequest {
    /// Resolve the highest numeric tag.
    Latest,
    /// Check out this exact revision.
    Exact(VersionTag),
}

impl FromStr for VersionRequest {
    type Err = DocsetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(DocsetError::validation("version must not be empty"));
        }
        if s == LATEST {
            Ok(Self::Latest)
        } else {
            Ok(Self::Exact(VersionTag(s.to_string())))
        }
    }
}

impl fmt::Display for VersionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest => f.write_str(LATEST),
            Self::Exact(tag) => tag.fmt(f),
        }
    }
}

// ---------------------------------------------------------------------------
// Manifest
// ---------------------------------------------------------------------------

/// Category name → (display name → relative page path, no extension).
pub type CategoryMap = IndexMap<String, IndexMap<String, String>>;

/// One language's slice of `docs/list.json`: section name → categories.
///
/// Iteration order follows the source document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    pub sections: IndexMap<String, CategoryMap>,
}

impl Manifest {
    /// Look up a section such as `"Reference"`.
    pub fn section(&self, name: &str) -> Option<&CategoryMap> {
        self.sections.get(name)
    }

    /// Number of leaf (display name → path) entries in a section.
    pub fn leaf_count(&self, section: &str) -> usize {
        self.section(section)
            .map(|categories| categories.values().map(IndexMap::len).sum())
            .unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// Search index
// ---------------------------------------------------------------------------

/// Docset entry type, stored verbatim in the `type` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryType {
    Guide,
    Class,
    Sample,
}

impl EntryType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Guide => "Guide",
            Self::Class => "Class",
            Self::Sample => "Sample",
        }
    }
}

impl FromStr for EntryType {
    type Err = DocsetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Guide" => Ok(Self::Guide),
            "Class" => Ok(Self::Class),
            "Sample" => Ok(Self::Sample),
            other => Err(DocsetError::validation(format!("unknown entry type '{other}'"))),
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single `searchIndex` row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Symbol or page name shown in the docset browser.
    pub name: String,
    /// Entry type.
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    /// Path relative to `Contents/Resources/Documents`, extension included.
    pub path: String,
}

impl IndexEntry {
    pub fn new(name: impl Into<String>, entry_type: EntryType, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entry_type,
            path: path.into(),
        }
    }
}
