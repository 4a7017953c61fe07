//! Document reading
//!
//! Turns document text (or files on disk) into records: extract the block,
//! parse it, then build a record against the reader's schema. A document
//! without a block still yields a record, built from an empty field map.

use crate::core::record::{build_record, Record};
use crate::core::schema::Schema;
use crate::error::{MatterDexError, Result};
use crate::io::extract::extract_frontmatter;
use crate::io::fs::{read_to_string, resolve_files, DEFAULT_EXTENSIONS};
use crate::io::parser::{parse_block, RawFields};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for the document reader
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Maximum file size to read (in bytes)
    pub max_file_size: Option<u64>,
    /// Extensions picked up when walking directories
    pub extensions: Vec<String>,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            max_file_size: Some(10 * 1024 * 1024), // 10MB default limit
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }
}

/// Reads documents into records for one schema
pub struct DocumentReader {
    config: ReaderConfig,
    schema: Schema,
}

impl DocumentReader {
    /// Create a new reader with default configuration
    pub fn new(schema: Schema) -> Self {
        Self::with_config(schema, ReaderConfig::default())
    }

    /// Create a new reader with custom configuration
    pub fn with_config(schema: Schema, config: ReaderConfig) -> Self {
        Self { config, schema }
    }

    /// Get reader configuration
    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Parse the raw field map of a document
    pub fn parse_fields(&self, content: &str) -> RawFields {
        match extract_frontmatter(content) {
            Some(block) => parse_block(block),
            None => RawFields::new(),
        }
    }

    /// Build a record from document text and its provenance
    pub fn parse_document(&self, content: &str, provenance: &str) -> Record {
        let raw = self.parse_fields(content);
        if raw.is_empty() {
            log::debug!("{}: no front matter fields", provenance);
        }
        build_record(&raw, &self.schema, provenance)
    }

    /// Read a single file into a record
    pub fn read_file<P: AsRef<Path>>(&self, path: P) -> Result<Record> {
        let path = path.as_ref();

        if !path.is_file() {
            return Err(MatterDexError::file_not_found(path));
        }

        if let Some(limit) = self.config.max_file_size {
            let size = fs::metadata(path)?.len();
            if size > limit {
                return Err(MatterDexError::FileTooLarge {
                    path: path.to_path_buf(),
                    size,
                    limit,
                });
            }
        }

        log::trace!("reading {}", path.display());
        let content = read_to_string(path)?;
        Ok(self.parse_document(&content, &path.to_string_lossy()))
    }

    /// Read every document under `paths`
    ///
    /// Recoverable per-file errors are logged and the file is skipped.
    /// Identifiers that collide get a numeric suffix so every record in the
    /// result has a unique identifier.
    pub fn read_paths(&self, paths: &[PathBuf]) -> Result<Vec<Record>> {
        let files = resolve_files(paths, &self.config.extensions);
        let mut records = Vec::with_capacity(files.len());
        let mut taken = HashSet::new();

        for file in files {
            let record = match self.read_file(&file) {
                Ok(record) => record,
                Err(err) if err.is_recoverable() => {
                    log::warn!("{}: skipped: {}", file.display(), err);
                    continue;
                }
                Err(err) => return Err(err),
            };
            records.push(unique_id(record, &mut taken));
        }

        log::debug!("read {} records", records.len());
        Ok(records)
    }
}

fn unique_id(record: Record, taken: &mut HashSet<String>) -> Record {
    if taken.insert(record.id().to_string()) {
        return record;
    }

    let base = record.id().to_string();
    let mut n = 2;
    loop {
        let candidate = format!("{}-{}", base, n);
        if taken.insert(candidate.clone()) {
            log::warn!(
                "{}: identifier '{}' already used, assigned '{}'",
                record.path(),
                base,
                candidate
            );
            return record.with_id(candidate);
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::FieldDescriptor;
    use crate::core::value::{FieldKind, FieldValue};
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    fn schema() -> Schema {
        Schema::new("title")
            .with_field(FieldDescriptor::new("title", FieldKind::Text))
            .with_field(FieldDescriptor::new("year", FieldKind::Number))
    }

    fn create_test_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::with_suffix(".md").unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_parse_document() {
        let reader = DocumentReader::new(schema());
        let record = reader.parse_document("---\ntitle: Dagon\nyear: 1919\n---\nbody", "dagon.md");
        assert_eq!(record.id(), "dagon");
        assert_eq!(record.get("year"), &FieldValue::Number(1919.0));
    }

    #[test]
    fn test_document_without_front_matter() {
        let reader = DocumentReader::new(schema());
        assert!(reader.parse_fields("# just markdown").is_empty());

        let record = reader.parse_document("# just markdown", "plain.md");
        assert_eq!(record.id(), "plain");
        assert_eq!(record.get("title"), &FieldValue::text("plain.md"));
        assert_eq!(record.fields().len(), 1);
    }

    #[test]
    fn test_read_file() {
        let file = create_test_file("---\ntitle: Azathoth\n---\n");
        let reader = DocumentReader::new(schema());
        let record = reader.read_file(file.path()).unwrap();
        assert_eq!(record.get("title"), &FieldValue::text("Azathoth"));
        assert_eq!(record.path(), file.path().to_string_lossy());
    }

    #[test]
    fn test_read_missing_file() {
        let reader = DocumentReader::new(schema());
        let result = reader.read_file("/nonexistent/file.md");
        assert!(matches!(result, Err(MatterDexError::FileNotFound { .. })));
    }

    #[test]
    fn test_size_limit() {
        let file = create_test_file("---\ntitle: long enough to exceed\n---\n");
        let config = ReaderConfig {
            max_file_size: Some(8),
            ..Default::default()
        };
        let reader = DocumentReader::with_config(schema(), config);
        assert!(matches!(
            reader.read_file(file.path()),
            Err(MatterDexError::FileTooLarge { limit: 8, .. })
        ));
    }

    #[test]
    fn test_read_paths_disambiguates_ids() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.md"), "---\ntitle: Same\n---\n").unwrap();
        fs::write(dir.path().join("b.md"), "---\ntitle: Same\n---\n").unwrap();
        fs::write(dir.path().join("c.md"), "---\ntitle: Same\n---\n").unwrap();
        fs::write(dir.path().join("ignored.txt"), "---\ntitle: Other\n---\n").unwrap();

        let reader = DocumentReader::new(schema());
        let records = reader.read_paths(&[dir.path().to_path_buf()]).unwrap();
        let ids: Vec<_> = records.iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["same", "same-2", "same-3"]);
    }

    #[test]
    fn test_read_paths_skips_oversized_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("small.md"), "---\ntitle: S\n---\n").unwrap();
        fs::write(dir.path().join("large.md"), format!("---\ntitle: L\n---\n{}", "x".repeat(64))).unwrap();

        let config = ReaderConfig {
            max_file_size: Some(32),
            ..Default::default()
        };
        let reader = DocumentReader::with_config(schema(), config);
        let records = reader.read_paths(&[dir.path().to_path_buf()]).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id(), "s");
    }
}
