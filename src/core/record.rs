//! Records and the record builder
//!
//! A [`Record`] is one catalogued document: a derived identifier, the
//! provenance it was read from, and an open map of field values. Records carry
//! every parsed field, declared in the schema or not.

use crate::core::convert::convert_value;
use crate::core::schema::Schema;
use crate::core::value::FieldValue;
use crate::io::parser::RawFields;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

static ABSENT: FieldValue = FieldValue::Null;

static SLUG_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\p{L}\p{N}]+").expect("valid slug pattern"));

/// One catalogued document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    id: String,
    path: String,
    fields: BTreeMap<String, FieldValue>,
}

impl Record {
    /// Create a record with no fields
    pub fn new(id: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style field assignment
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Provenance the record was built from
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn fields(&self) -> &BTreeMap<String, FieldValue> {
        &self.fields
    }

    /// Value at `key`; unset keys read as the absence marker
    pub fn get(&self, key: &str) -> &FieldValue {
        self.fields.get(key).unwrap_or(&ABSENT)
    }

    /// Whether `key` holds something other than the absence marker
    pub fn has(&self, key: &str) -> bool {
        !self.get(key).is_null()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Overwrite fields from `updates`; identifier and provenance never change
    pub fn merge<I, K>(&mut self, updates: I)
    where
        I: IntoIterator<Item = (K, FieldValue)>,
        K: Into<String>,
    {
        for (key, value) in updates {
            self.fields.insert(key.into(), value);
        }
    }

    /// The human title according to `schema`, falling back to the provenance
    pub fn title(&self, schema: &Schema) -> String {
        match self.get(&schema.title_field) {
            FieldValue::Null => self.path.clone(),
            value => value.to_string_representation(),
        }
    }

    /// Re-key the record; only used while a collection is being assembled
    pub(crate) fn with_id(mut self, id: String) -> Self {
        self.id = id;
        self
    }
}

impl AsRef<Record> for Record {
    fn as_ref(&self) -> &Record {
        self
    }
}

/// Assemble a record from parsed fields
///
/// Declared fields go through the converter; a field that fails conversion is
/// stored as the absence marker so the rest of the record still builds.
/// Undeclared fields are kept as parsed.
pub fn build_record(raw: &RawFields, schema: &Schema, provenance: &str) -> Record {
    let mut fields = BTreeMap::new();

    for (key, value) in raw {
        let converted = match schema.field(key) {
            Some(descriptor) => convert_value(value, descriptor).unwrap_or_else(|err| {
                log::warn!("{}: field '{}' dropped: {}", provenance, key, err);
                FieldValue::Null
            }),
            None => value.clone(),
        };
        fields.insert(key.clone(), converted);
    }

    let id = derive_id(&fields, schema, provenance);

    if fields.get(&schema.title_field).map_or(true, FieldValue::is_null) {
        fields.insert(schema.title_field.clone(), FieldValue::text(provenance));
    }

    Record {
        id,
        path: provenance.to_string(),
        fields,
    }
}

fn derive_id(fields: &BTreeMap<String, FieldValue>, schema: &Schema, provenance: &str) -> String {
    let from_field = |key: &str| {
        fields
            .get(key)
            .filter(|v| !v.is_null())
            .map(|v| slugify(&v.to_string_representation()))
    };

    // File name only, independent of the directory the catalog lives in
    let stem = Path::new(provenance)
        .file_stem()
        .map(|s| slugify(&s.to_string_lossy()));
    let candidates = [
        schema.id_field.as_deref().and_then(from_field),
        from_field(&schema.title_field),
        stem,
    ];

    candidates
        .into_iter()
        .flatten()
        .find(|slug| !slug.is_empty())
        .unwrap_or_else(|| "untitled".to_string())
}

/// Lowercase, with every run of non-alphanumerics collapsed to one hyphen
pub fn slugify(s: &str) -> String {
    let lowered = s.to_lowercase();
    SLUG_SEPARATORS
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}
