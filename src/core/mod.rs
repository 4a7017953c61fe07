//! Core types for catalog records
//!
//! - FieldValue / FieldKind: the closed set of value kinds
//! - Schema / FieldDescriptor: field declarations and core roles
//! - convert_value: coercion of raw values to declared kinds
//! - Record / build_record: assembled records

pub mod convert;
pub mod record;
pub mod schema;
pub mod value;

pub use convert::{convert_value, parse_date};
pub use record::{build_record, slugify, Record};
pub use schema::{FieldCategory, FieldDescriptor, Schema};
pub use value::{FieldKind, FieldValue};
