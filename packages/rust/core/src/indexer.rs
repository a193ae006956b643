//! Populates the docset search index from the manifest and the examples tree.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use threejs_docset_shared::{DocsetError, EntryType, IndexEntry, Manifest, Result};
use threejs_docset_storage::SearchIndex;

/// Manifest sections indexed, in insertion order, with their entry type.
pub const GROUPS: [(&str, EntryType); 4] = [
    ("Manual", EntryType::Guide),
    ("Developer Reference", EntryType::Guide),
    ("Examples", EntryType::Class),
    ("Reference", EntryType::Class),
];

/// Rows written per entry type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexCounts {
    pub guides: usize,
    pub classes: usize,
    pub samples: usize,
    /// Manifest groups that were absent and skipped.
    pub skipped_groups: usize,
}

impl IndexCounts {
    pub fn total(&self) -> usize {
        self.guides + self.classes + self.samples
    }

    fn add(&mut self, entry_type: EntryType, rows: usize) {
        match entry_type {
            EntryType::Guide => self.guides += rows,
            EntryType::Class => self.classes += rows,
            EntryType::Sample => self.samples += rows,
        }
    }
}

/// One row per leaf of `section`, or `None` when the section is absent.
pub fn group_entries(
    manifest: &Manifest,
    section: &str,
    entry_type: EntryType,
) -> Option<Vec<IndexEntry>> {
    let categories = manifest.section(section)?;
    Some(
        categories
            .values()
            .flat_map(|pages| pages.iter())
            .map(|(name, rel)| IndexEntry::new(name, entry_type, format!("docs/{rel}.html")))
            .collect(),
    )
}

/// One `Sample` row per `*.html` directly inside `examples_dir`, sorted by file name.
pub fn example_entries(examples_dir: &Path) -> Result<Vec<IndexEntry>> {
    let pattern = format!(
        "{}/*.html",
        glob::Pattern::escape(&examples_dir.to_string_lossy())
    );
    let paths = glob::glob(&pattern)
        .map_err(|e| DocsetError::validation(format!("invalid glob pattern {pattern}: {e}")))?;

    sample_entries(
        paths.map(|r| r.map_err(|e| DocsetError::io(e.path().to_path_buf(), e.into_error()))),
    )
}

/// Turn glob results into sorted `Sample` rows. Any unreadable entry fails the scan.
fn sample_entries(paths: impl Iterator<Item = Result<PathBuf>>) -> Result<Vec<IndexEntry>> {
    let mut names = Vec::new();
    for path in paths {
        let path = path?;
        if !path.is_file() {
            continue;
        }
        if let Some(name) = path.file_name() {
            names.push(name.to_string_lossy().into_owned());
        }
    }
    names.sort();

    Ok(names
        .into_iter()
        .map(|file| {
            let stem = file.strip_suffix(".html").unwrap_or(&file).to_string();
            IndexEntry::new(stem, EntryType::Sample, format!("examples/{file}"))
        })
        .collect())
}

/// Write every manifest group and then the example pages into `index`.
#[instrument(skip_all, fields(examples = %examples_dir.display()))]
pub async fn build_index(
    index: &SearchIndex,
    manifest: &Manifest,
    examples_dir: &Path,
) -> Result<IndexCounts> {
    let mut counts = IndexCounts::default();

    for (section, entry_type) in GROUPS {
        let Some(entries) = group_entries(manifest, section, entry_type) else {
            warn!(section, "manifest group missing, skipping");
            counts.skipped_groups += 1;
            continue;
        };
        let rows = index.insert_batch(&entries).await?;
        debug!(section, rows, "indexed group");
        counts.add(entry_type, rows);
    }

    let samples = example_entries(examples_dir)?;
    let rows = index.insert_batch(&samples).await?;
    counts.add(EntryType::Sample, rows);

    info!(
        guides = counts.guides,
        classes = counts.classes,
        samples = counts.samples,
        "search index built"
    );
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{LIST_JSON, temp_root};
    use crate::manifest::parse_manifest;
    use threejs_docset_shared::Language;

    fn touch(dir: &Path, name: &str) {
        std::fs::create_dir_all(dir).unwrap();
        std::fs::write(dir.join(name), "").unwrap();
    }

    #[test]
    fn group_rows_point_at_html_pages() {
        let manifest = parse_manifest(LIST_JSON, Language::En).unwrap();
        let rows = group_entries(&manifest, "Reference", EntryType::Class).unwrap();
        assert_eq!(
            rows,
            vec![
                IndexEntry::new("Object3D", EntryType::Class, "docs/api/en/core/Object3D.html"),
                IndexEntry::new(
                    "BufferGeometry",
                    EntryType::Class,
                    "docs/api/en/core/BufferGeometry.html"
                ),
                IndexEntry::new("Vector3", EntryType::Class, "docs/api/en/math/Vector3.html"),
            ]
        );
        assert!(group_entries(&manifest, "Missing", EntryType::Guide).is_none());
    }

    #[test]
    fn examples_become_sorted_samples() {
        let root = temp_root("indexer");
        let examples = root.join("examples");
        touch(&examples, "foo.html");
        touch(&examples, "bar.html");
        touch(&examples, "main.css");
        touch(&examples.join("jsm"), "nested.html");

        let rows = example_entries(&examples).unwrap();
        assert_eq!(
            rows,
            vec![
                IndexEntry::new("bar", EntryType::Sample, "examples/bar.html"),
                IndexEntry::new("foo", EntryType::Sample, "examples/foo.html"),
            ]
        );
    }

    #[test]
    fn missing_examples_dir_yields_no_samples() {
        let root = temp_root("indexer");
        assert!(example_entries(&root.join("examples")).unwrap().is_empty());
    }

    #[test]
    fn unreadable_entry_fails_the_scan() {
        let root = temp_root("indexer");
        let examples = root.join("examples");
        touch(&examples, "foo.html");

        let results = vec![
            Ok(examples.join("foo.html")),
            Err(DocsetError::io(
                examples.join("locked"),
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied"),
            )),
        ];
        let err = sample_entries(results.into_iter()).unwrap_err();
        assert!(matches!(err, DocsetError::Io { .. }));
        assert!(err.to_string().contains("locked"));
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_examples_dir_is_io_error() {
        use std::os::unix::fs::PermissionsExt;

        let root = temp_root("indexer");
        let examples = root.join("examples");
        touch(&examples, "foo.html");
        std::fs::set_permissions(&examples, std::fs::Permissions::from_mode(0o000)).unwrap();

        // Permission bits do not restrict root.
        let readable = std::fs::read_dir(&examples).is_ok();
        let result = example_entries(&examples);
        std::fs::set_permissions(&examples, std::fs::Permissions::from_mode(0o755)).unwrap();

        if readable {
            assert_eq!(result.unwrap().len(), 1);
        } else {
            assert!(matches!(result.unwrap_err(), DocsetError::Io { .. }));
        }
    }

    #[tokio::test]
    async fn row_counts_match_manifest_leaves() {
        let root = temp_root("indexer");
        let examples = root.join("examples");
        touch(&examples, "foo.html");
        touch(&examples, "bar.html");

        let manifest = parse_manifest(LIST_JSON, Language::En).unwrap();
        let index = SearchIndex::create(&root.join("docSet.dsidx")).await.unwrap();
        let counts = build_index(&index, &manifest, &examples).await.unwrap();

        let leaves: usize = GROUPS.iter().map(|(s, _)| manifest.leaf_count(s)).sum();
        assert_eq!(counts.guides + counts.classes, leaves);
        assert_eq!(
            counts,
            IndexCounts {
                guides: 3,
                classes: 4,
                samples: 2,
                skipped_groups: 0,
            }
        );
        assert_eq!(index.count().await.unwrap(), 9);
        assert_eq!(index.count_by_type(EntryType::Sample).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn groups_are_inserted_in_fixed_order() {
        let root = temp_root("indexer");
        let manifest = parse_manifest(LIST_JSON, Language::En).unwrap();
        let index = SearchIndex::create(&root.join("docSet.dsidx")).await.unwrap();
        build_index(&index, &manifest, &root.join("examples")).await.unwrap();

        let names: Vec<String> = index
            .entries()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(
            names,
            vec![
                "Installation",
                "Creating a scene",
                "WebGLProgram",
                "OrbitControls",
                "Object3D",
                "BufferGeometry",
                "Vector3",
            ]
        );
    }

    #[tokio::test]
    async fn duplicate_leaf_fails_the_build() {
        let root = temp_root("indexer");
        let text = r#"{ "en": {
            "Manual": {
                "A": { "Intro": "manual/en/Intro" },
                "B": { "Intro": "manual/en/Intro" }
            }
        } }"#;
        let manifest = parse_manifest(text, Language::En).unwrap();
        let index = SearchIndex::create(&root.join("docSet.dsidx")).await.unwrap();

        let err = build_index(&index, &manifest, &root.join("examples"))
            .await
            .unwrap_err();
        assert!(matches!(err, DocsetError::Storage(_)));
        assert_eq!(index.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn absent_groups_are_skipped() {
        let root = temp_root("indexer");
        let text = r#"{ "en": { "Reference": { "Core": { "Clock": "api/en/core/Clock" } } } }"#;
        let manifest = parse_manifest(text, Language::En).unwrap();
        let index = SearchIndex::create(&root.join("docSet.dsidx")).await.unwrap();

        let counts = build_index(&index, &manifest, &root.join("examples")).await.unwrap();
        assert_eq!(counts.classes, 1);
        assert_eq!(counts.skipped_groups, 3);
    }
}
