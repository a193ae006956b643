//! Reading the documentation navigation manifest (`docs/list.json`).
//!
//! The file is hand-maintained upstream and occasionally carries comments or
//! trailing commas, so it is parsed leniently.

use std::path::Path;

use indexmap::IndexMap;
use serde_json_lenient::Value;
use tracing::debug;

use threejs_docset_shared::{DocsetError, Language, Manifest, Result};

/// Manifest file name inside `docs/`.
pub const MANIFEST_FILE: &str = "list.json";

/// Parse manifest text and select one language's sections.
pub fn parse_manifest(text: &str, language: Language) -> Result<Manifest> {
    let mut languages: IndexMap<String, Value> = serde_json_lenient::from_str_lenient(text)
        .map_err(|e| DocsetError::parse(format!("{MANIFEST_FILE}: {e}")))?;

    let section = languages.shift_remove(language.code()).ok_or_else(|| {
        DocsetError::parse(format!(
            "{MANIFEST_FILE} has no '{}' section",
            language.code()
        ))
    })?;

    serde_json_lenient::from_value(section).map_err(|e| {
        DocsetError::parse(format!(
            "{MANIFEST_FILE} '{}' section is malformed: {e}",
            language.code()
        ))
    })
}

/// Load `<docs_dir>/list.json` for `language`.
pub fn load_manifest(docs_dir: &Path, language: Language) -> Result<Manifest> {
    let path = docs_dir.join(MANIFEST_FILE);
    let text = std::fs::read_to_string(&path).map_err(|e| DocsetError::io(&path, e))?;
    let manifest = parse_manifest(&text, language)?;
    debug!(
        path = %path.display(),
        sections = manifest.sections.len(),
        "manifest loaded"
    );
    Ok(manifest)
}
