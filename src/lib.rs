//! matterdex: schema-typed catalogs over markdown front matter
//!
//! This library reads the metadata block at the top of markdown documents,
//! turns each document into a typed [`Record`] according to a caller-supplied
//! [`Schema`], and answers filter, sort, group and aggregate queries over the
//! resulting collection.
//!
//! # Features
//!
//! - **Forgiving parser** for the common front matter subset: scalars, quoted
//!   text, block and inline lists; bad lines are skipped, never fatal
//! - **Closed value model** ([`FieldValue`]) with explicit absence
//! - **Schema-driven conversion** of raw values to declared kinds
//! - **Pure query primitives** that never mutate their input and work over
//!   owned or borrowed records alike
//!
//! # Quick Start
//!
//! ```rust
//! use matterdex::{DocumentReader, FieldDescriptor, FieldKind, Schema};
//! use matterdex::query::{filter_number_range, sort_by_field, SortDirection};
//!
//! let schema = Schema::default()
//!     .with_field(FieldDescriptor::new("title", FieldKind::Text))
//!     .with_field(FieldDescriptor::new("year", FieldKind::Number));
//! let reader = DocumentReader::new(schema.clone());
//!
//! let records = vec![
//!     reader.parse_document("---\ntitle: Dagon\nyear: 1919\n---\n", "dagon.md"),
//!     reader.parse_document("---\ntitle: The Call\nyear: 1928\n---\n", "call.md"),
//! ];
//!
//! let recent = filter_number_range(&records, "year", Some(1920.0), None);
//! assert_eq!(recent.len(), 1);
//!
//! let sorted = sort_by_field(&records, &schema, "year", SortDirection::Descending);
//! assert_eq!(sorted[0].id(), "the-call");
//! ```
//!
//! ## Grouping
//!
//! ```rust
//! use matterdex::{FieldValue, Record, Schema};
//! use matterdex::query::group_by_list_field;
//!
//! # fn main() -> matterdex::Result<()> {
//! let records = vec![
//!     Record::new("mound", "mound.md").with_field("authors", FieldValue::list(["Lovecraft", "Bishop"])),
//! ];
//! let groups = group_by_list_field(&records, &Schema::default(), "authors")?;
//! assert_eq!(groups.len(), 2);
//! # Ok(())
//! # }
//! ```

// Public API exports
pub use crate::config::CatalogConfig;
pub use crate::error::{MatterDexError, Result};

// Core types
pub use crate::core::{build_record, convert_value, FieldCategory, FieldDescriptor, FieldKind, FieldValue, Record, Schema};

// IO types
pub use crate::io::{extract_frontmatter, parse_block, render_frontmatter, split_document, DocumentReader, ReaderConfig};

pub mod config;
pub mod core;
pub mod error;
pub mod io;
pub mod query;

// CLI components are available only in the binary, not as part of the library API
