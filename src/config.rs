//! Catalog configuration
//!
//! A catalog is configured by a single YAML or JSON file holding the schema,
//! the statistics settings, and the document extensions to pick up:
//!
//! ```yaml
//! schema:
//!   title_field: title
//!   status_field: status
//!   fields:
//!     - { key: title, kind: text, category: core }
//!     - { key: year, kind: number }
//!     - { key: authors, kind: list, items: text }
//!     - { key: status, kind: text, options: [todo, reading, done] }
//! stats:
//!   total_field: words
//!   distinct_fields: [authors]
//!   range_field: year
//! extensions: [md]
//! ```

use crate::core::schema::Schema;
use crate::error::{MatterDexError, Result};
use crate::io::fs::{read_to_string, DEFAULT_EXTENSIONS};
use crate::io::reader::ReaderConfig;
use crate::query::stats::StatsConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect()
}

/// Everything a catalog needs besides the documents themselves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub schema: Schema,

    #[serde(default)]
    pub stats: StatsConfig,

    /// File extensions enumerated when walking directories
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            schema: Schema::default(),
            stats: StatsConfig::default(),
            extensions: default_extensions(),
        }
    }
}

impl CatalogConfig {
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validated()
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s)?;
        config.validated()
    }

    /// Load from a file, choosing JSON for `.json` and YAML otherwise
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(MatterDexError::file_not_found(path));
        }

        let content = read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        log::debug!("loading configuration from {}", path.display());
        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
    }

    fn validated(self) -> Result<Self> {
        self.schema.validate()?;
        if self.extensions.is_empty() {
            return Err(MatterDexError::invalid_schema("no document extensions configured"));
        }
        Ok(self)
    }

    /// Reader settings derived from this configuration
    pub fn to_reader_config(&self) -> ReaderConfig {
        ReaderConfig {
            extensions: self.extensions.clone(),
            ..ReaderConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::value::FieldKind;
    use std::fs;
    use tempfile::TempDir;

    const YAML: &str = r#"
schema:
  status_field: status
  fields:
    - key: title
      kind: text
      category: core
    - key: year
      kind: number
      sortable: true
    - key: authors
      kind: list
      items: text
    - key: status
      kind: text
      options: [todo, done]
stats:
  total_field: words
  distinct_fields: [authors]
"#;

    #[test]
    fn test_from_yaml() {
        let config = CatalogConfig::from_yaml_str(YAML).unwrap();
        assert_eq!(config.schema.title_field, "title");
        assert_eq!(config.schema.kind_of("authors"), Some(FieldKind::List));
        assert_eq!(config.schema.status_descriptor().unwrap().options, vec!["todo", "done"]);
        assert_eq!(config.stats.total_field.as_deref(), Some("words"));
        assert_eq!(config.stats.range_field, None);
        assert_eq!(config.extensions, vec!["md", "markdown"]);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = CatalogConfig::from_json_str("{}").unwrap();
        assert_eq!(config, CatalogConfig::default());
    }

    #[test]
    fn test_rejects_duplicate_keys() {
        let yaml = "schema:\n  fields:\n    - { key: year, kind: number }\n    - { key: year, kind: text }\n";
        assert!(matches!(
            CatalogConfig::from_yaml_str(yaml),
            Err(MatterDexError::InvalidSchema { .. })
        ));
    }

    #[test]
    fn test_load_by_extension() {
        let dir = TempDir::new().unwrap();
        let json = dir.path().join("catalog.json");
        fs::write(&json, r#"{"extensions": ["txt"], "schema": {"title_field": "name"}}"#).unwrap();

        let config = CatalogConfig::load(&json).unwrap();
        assert_eq!(config.schema.title_field, "name");
        assert_eq!(config.to_reader_config().extensions, vec!["txt"]);

        let yaml = dir.path().join("catalog.yaml");
        fs::write(&yaml, YAML).unwrap();
        assert!(CatalogConfig::load(&yaml).unwrap().schema.status_field.is_some());
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            CatalogConfig::load("/nonexistent/catalog.yaml"),
            Err(MatterDexError::FileNotFound { .. })
        ));
    }
}
