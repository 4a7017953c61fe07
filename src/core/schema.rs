//! Schema descriptors
//!
//! A [`Schema`] is an ordered list of [`FieldDescriptor`]s plus the core role
//! assignments (title, identifier, status). It types the fields it knows about
//! but does not close the record: undeclared fields are kept as parsed.

use crate::core::value::FieldKind;
use crate::error::{MatterDexError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Grouping tag for a field, used by presentation layers to lay out columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldCategory {
    Core,
    Metadata,
    #[default]
    Custom,
}

fn default_true() -> bool {
    true
}

/// Declaration of a single field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Stable identifier, unique within a schema
    pub key: String,

    /// Display label; empty means "use the key"
    #[serde(default)]
    pub label: String,

    pub kind: FieldKind,

    #[serde(default)]
    pub category: FieldCategory,

    /// Shown by default
    #[serde(default = "default_true")]
    pub visible: bool,

    /// Usable in filters
    #[serde(default = "default_true")]
    pub filterable: bool,

    /// Usable in sorts
    #[serde(default = "default_true")]
    pub sortable: bool,

    /// Lower values come first in display order
    #[serde(default)]
    pub sort_order: i32,

    /// Element kind for list fields
    #[serde(default, alias = "items", skip_serializing_if = "Option::is_none")]
    pub item_kind: Option<FieldKind>,

    /// Known values in their natural order (e.g. workflow states)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl FieldDescriptor {
    /// Create a descriptor with every capability enabled
    pub fn new(key: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            key: key.into(),
            label: String::new(),
            kind,
            category: FieldCategory::Custom,
            visible: true,
            filterable: true,
            sortable: true,
            sort_order: 0,
            item_kind: None,
            options: Vec::new(),
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn category(mut self, category: FieldCategory) -> Self {
        self.category = category;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn not_filterable(mut self) -> Self {
        self.filterable = false;
        self
    }

    pub fn not_sortable(mut self) -> Self {
        self.sortable = false;
        self
    }

    pub fn sort_order(mut self, order: i32) -> Self {
        self.sort_order = order;
        self
    }

    pub fn items(mut self, kind: FieldKind) -> Self {
        self.item_kind = Some(kind);
        self
    }

    pub fn options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    /// The label to show, falling back to the key
    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            &self.key
        } else {
            &self.label
        }
    }
}

fn default_title_field() -> String {
    "title".to_string()
}

/// Ordered field declarations plus core role assignments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,

    /// Field supplying the human title
    #[serde(default = "default_title_field")]
    pub title_field: String,

    /// Field supplying a stable identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_field: Option<String>,

    /// Field supplying a workflow status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_field: Option<String>,
}

impl Default for Schema {
    fn default() -> Self {
        Self::new(default_title_field())
    }
}

impl Schema {
    /// Create an empty schema with the given title field
    pub fn new(title_field: impl Into<String>) -> Self {
        Self {
            fields: Vec::new(),
            title_field: title_field.into(),
            id_field: None,
            status_field: None,
        }
    }

    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_id_field(mut self, key: impl Into<String>) -> Self {
        self.id_field = Some(key.into());
        self
    }

    pub fn with_status_field(mut self, key: impl Into<String>) -> Self {
        self.status_field = Some(key.into());
        self
    }

    /// Look up a descriptor by key
    pub fn field(&self, key: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Declared kind of a field, if the schema knows it
    pub fn kind_of(&self, key: &str) -> Option<FieldKind> {
        self.field(key).map(|f| f.kind)
    }

    /// Descriptors shown by default, in display order
    pub fn visible_fields(&self) -> Vec<&FieldDescriptor> {
        let mut fields: Vec<_> = self.fields.iter().filter(|f| f.visible).collect();
        fields.sort_by_key(|f| f.sort_order);
        fields
    }

    pub fn filterable_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| f.filterable)
    }

    pub fn sortable_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| f.sortable)
    }

    /// The status descriptor, if a status role is assigned and declared
    pub fn status_descriptor(&self) -> Option<&FieldDescriptor> {
        self.status_field.as_deref().and_then(|key| self.field(key))
    }

    /// Check keys are unique and role fields have usable kinds
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for field in &self.fields {
            if field.key.trim().is_empty() {
                return Err(MatterDexError::invalid_schema("field with empty key"));
            }
            if !seen.insert(field.key.as_str()) {
                return Err(MatterDexError::invalid_schema(format!(
                    "duplicate field key '{}'",
                    field.key
                )));
            }
            if field.item_kind.is_some() && !field.kind.is_list() {
                return Err(MatterDexError::invalid_schema(format!(
                    "field '{}' declares an element kind but is {}",
                    field.key, field.kind
                )));
            }
        }

        let roles = [
            ("title", Some(self.title_field.as_str())),
            ("id", self.id_field.as_deref()),
            ("status", self.status_field.as_deref()),
        ];
        for (role, key) in roles {
            let Some(kind) = key.and_then(|k| self.kind_of(k)) else {
                continue;
            };
            if matches!(kind, FieldKind::List | FieldKind::Object) {
                return Err(MatterDexError::invalid_schema(format!(
                    "{} field must be a scalar, found {}",
                    role, kind
                )));
            }
        }
        Ok(())
    }
}
