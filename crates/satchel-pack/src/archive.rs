//! Archive construction and zip serialization.
//!
//! The archive is built in one pass over the enumerated tree: filter, remap
//! the entry name, read raw bytes, append. Serialization happens once, into a
//! single in-memory blob, with fixed entry timestamps so an unchanged source
//! tree serializes to identical bytes on every run.

use std::collections::BTreeMap;
use std::io::{Cursor, Write};
use std::path::Path;

use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::error::{PackError, Result};
use crate::rules::{ExcludeRule, FilterRules};
use crate::walk::enumerate_files;

/// One archive entry: the (possibly remapped) relative path and raw bytes.
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    /// POSIX-style relative entry name
    pub name: String,
    /// File contents, byte-for-byte as read from disk
    pub bytes: Vec<u8>,
}

/// What the filters removed, counted per rule.
#[derive(Debug, Clone, Default)]
pub struct ExclusionReport {
    counts: BTreeMap<String, usize>,
    excluded: usize,
}

impl ExclusionReport {
    fn record(&mut self, rule: &ExcludeRule) {
        *self.counts.entry(rule.to_string()).or_insert(0) += 1;
        self.excluded += 1;
    }

    /// Total number of excluded files.
    pub fn excluded(&self) -> usize {
        self.excluded
    }

    /// Per-rule exclusion counts, keyed by the rule's display form.
    pub fn by_rule(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(rule, count)| (rule.as_str(), *count))
    }
}

/// An ordered collection of entries, built once per run.
#[derive(Debug, Default)]
pub struct Archive {
    entries: Vec<ArchiveEntry>,
}

impl Archive {
    /// Build the archive from every included file under `project_dir`.
    ///
    /// Entry order matches enumeration order. Any read failure aborts the
    /// whole build; a partial archive is never returned.
    pub fn build(project_dir: &Path, rules: &FilterRules) -> Result<(Self, ExclusionReport)> {
        let mut entries = Vec::new();
        let mut report = ExclusionReport::default();

        for path in enumerate_files(project_dir) {
            let path = path?;

            if let Some(rule) = rules.excluded_by(&path) {
                debug!(%path, %rule, "excluded");
                report.record(rule);
                continue;
            }

            let bytes = std::fs::read(project_dir.join(&path)).map_err(|source| {
                PackError::Read {
                    path: project_dir.join(&path),
                    source,
                }
            })?;

            let name = rules.remap().apply(&path).into_owned();
            entries.push(ArchiveEntry { name, bytes });
        }

        Ok((Self { entries }, report))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the archive holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry names in archive order.
    pub fn entry_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// All entries in archive order.
    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    /// Serialize to a single zip blob.
    ///
    /// Entries are deflated and carry a fixed modification time and mode, so
    /// the output depends only on entry names and contents. The format is
    /// readable by any zip implementation, including the few dozen lines of
    /// extraction script shipped alongside the blob.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(DateTime::default())
            .unix_permissions(0o644);

        for entry in &self.entries {
            writer.start_file(entry.name.as_str(), options.clone())?;
            writer.write_all(&entry.bytes)?;
        }

        let cursor = writer.finish()?;
        Ok(cursor.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Read;
    use tempfile::TempDir;
    use zip::ZipArchive;

    fn touch(root: &Path, relative: &str, contents: &[u8]) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn read_back(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
        let mut zip = ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
        let mut out = Vec::new();
        for i in 0..zip.len() {
            let mut file = zip.by_index(i).unwrap();
            let mut contents = Vec::new();
            file.read_to_end(&mut contents).unwrap();
            out.push((file.name().to_string(), contents));
        }
        out
    }

    #[test]
    fn included_files_survive_byte_for_byte() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "src/index.js", b"export default 1;\n");
        touch(dir.path(), "package.json", br#"{"name":"demo"}"#);

        let (archive, report) = Archive::build(dir.path(), &FilterRules::default()).unwrap();
        assert_eq!(archive.len(), 2);
        assert_eq!(report.excluded(), 0);

        let entries = read_back(&archive.serialize().unwrap());
        let index = entries.iter().find(|(n, _)| n == "src/index.js").unwrap();
        assert_eq!(index.1, b"export default 1;\n");
    }

    #[test]
    fn filtered_tree_keeps_only_source() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), ".DS_Store", b"junk");
        touch(dir.path(), "lib/index.d.ts", b"declare const x: number;");
        touch(dir.path(), "node_modules/.bin/tool", b"#!/bin/sh");
        touch(dir.path(), "node_modules/rollup/dist/shared/x.js", b"1");
        touch(dir.path(), "node_modules/esbuild/bin/esbuild", b"\x7fELF");
        touch(dir.path(), "src/index.js", b"run();");

        let (archive, report) = Archive::build(dir.path(), &FilterRules::default()).unwrap();

        let names: Vec<&str> = archive.entry_names().collect();
        assert_eq!(names, vec!["src/index.js"]);
        assert_eq!(report.excluded(), 5);
    }

    #[test]
    fn entry_count_is_enumerated_minus_excluded() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a.js", b"1");
        touch(dir.path(), "b.js", b"2");
        touch(dir.path(), "b.js.map", b"{}");
        touch(dir.path(), "LICENSE", b"MIT");

        let (archive, report) = Archive::build(dir.path(), &FilterRules::default()).unwrap();
        assert_eq!(archive.len(), 2);
        assert_eq!(report.excluded(), 2);
        assert_eq!(archive.len() + report.excluded(), 4);
    }

    #[test]
    fn wasm_variant_is_remapped_to_native_location() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "node_modules/esbuild-wasm/bin/esbuild", b"wasm");
        touch(dir.path(), "node_modules/esbuild-wasm/package.json", b"{}");

        let (archive, _) = Archive::build(dir.path(), &FilterRules::default()).unwrap();

        let names: Vec<&str> = archive.entry_names().collect();
        assert!(names.contains(&"node_modules/esbuild/bin/esbuild"));
        assert!(names.contains(&"node_modules/esbuild/package.json"));
        assert!(!names.iter().any(|n| n.starts_with("node_modules/esbuild-wasm/")));
    }

    #[test]
    fn remap_renames_entries_without_touching_contents() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "node_modules/esbuild-wasm/bin/esbuild", b"wasm-binary");

        let (archive, _) = Archive::build(dir.path(), &FilterRules::default()).unwrap();
        let entries = read_back(&archive.serialize().unwrap());
        assert_eq!(
            entries,
            vec![("node_modules/esbuild/bin/esbuild".to_string(), b"wasm-binary".to_vec())]
        );
    }

    #[test]
    fn serialization_is_deterministic() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "src/index.js", b"run();");
        touch(dir.path(), "src/util.js", b"helper();");
        touch(dir.path(), "package.json", b"{}");

        let rules = FilterRules::default();
        let (first, _) = Archive::build(dir.path(), &rules).unwrap();
        let (second, _) = Archive::build(dir.path(), &rules).unwrap();

        let first_names: Vec<&str> = first.entry_names().collect();
        let second_names: Vec<&str> = second.entry_names().collect();
        assert_eq!(first_names, second_names);
        assert_eq!(first.serialize().unwrap(), second.serialize().unwrap());
    }

    #[test]
    fn report_counts_per_rule() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a/.DS_Store", b"");
        touch(dir.path(), "b/.DS_Store", b"");
        touch(dir.path(), "lib/x.d.ts", b"");

        let (_, report) = Archive::build(dir.path(), &FilterRules::default()).unwrap();
        let counts: BTreeMap<&str, usize> = report.by_rule().collect();
        assert_eq!(counts.get("basename .DS_Store"), Some(&2));
        assert_eq!(counts.get("extension .d.ts"), Some(&1));
    }

    #[cfg(unix)]
    #[test]
    fn dangling_symlink_aborts_the_build() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "src/index.js", b"run();");
        std::os::unix::fs::symlink(dir.path().join("missing"), dir.path().join("dangling"))
            .unwrap();

        let result = Archive::build(dir.path(), &FilterRules::default());
        assert!(matches!(result, Err(PackError::Walk(_))));
    }

    #[test]
    fn empty_tree_serializes_to_a_valid_empty_archive() {
        let dir = TempDir::new().unwrap();
        let (archive, _) = Archive::build(dir.path(), &FilterRules::default()).unwrap();
        assert!(archive.is_empty());

        let entries = read_back(&archive.serialize().unwrap());
        assert!(entries.is_empty());
    }
}
