//! Core value types for catalog records
//!
//! Every field in a record holds exactly one [`FieldValue`]. Consumers match on
//! the tag instead of probing a loosely-typed value, and absence is a variant of
//! its own rather than a missing map entry.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A tagged field value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Date(DateTime<Utc>),
    List(Vec<String>),
    /// Explicit absence marker
    Null,
}

impl FieldValue {
    /// Create a text value
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// Create a list value from anything yielding strings
    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// Check if this value is the absence marker
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The kind of this value, `None` for the absence marker
    pub fn kind(&self) -> Option<FieldKind> {
        match self {
            Self::Text(_) => Some(FieldKind::Text),
            Self::Number(_) => Some(FieldKind::Number),
            Self::Bool(_) => Some(FieldKind::Boolean),
            Self::Date(_) => Some(FieldKind::Date),
            Self::List(_) => Some(FieldKind::List),
            Self::Null => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<&DateTime<Utc>> {
        match self {
            Self::Date(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Render the value as plain text
    ///
    /// Whole numbers print without a fractional part, dates as RFC 3339 and
    /// lists comma separated. The absence marker renders as an empty string.
    pub fn to_string_representation(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) => format_number(*n),
            Self::Bool(b) => b.to_string(),
            Self::Date(d) => d.to_rfc3339_opts(SecondsFormat::Secs, true),
            Self::List(items) => items.join(", "),
            Self::Null => String::new(),
        }
    }
}

/// Format a number the way it would be written in front matter
pub(crate) fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_representation())
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Date(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Self::Null)
    }
}

/// Declared kind of a schema field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    #[serde(alias = "string")]
    Text,
    Number,
    #[serde(alias = "bool")]
    Boolean,
    Date,
    #[serde(alias = "array", alias = "tags")]
    List,
    /// Nested structure the engine stores but does not interpret
    #[serde(alias = "structured")]
    Object,
}

impl FieldKind {
    /// Parse a `FieldKind` from its name (e.g. `"text"`, `"number"`, `"list"`)
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "string" | "str" => Some(Self::Text),
            "number" | "float" | "int" | "integer" => Some(Self::Number),
            "boolean" | "bool" => Some(Self::Boolean),
            "date" | "datetime" | "timestamp" => Some(Self::Date),
            "list" | "array" | "tags" => Some(Self::List),
            "object" | "structured" | "map" => Some(Self::Object),
            _ => None,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Self::List)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Number => write!(f, "number"),
            Self::Boolean => write!(f, "boolean"),
            Self::Date => write!(f, "date"),
            Self::List => write!(f, "list"),
            Self::Object => write!(f, "object"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_value_accessors() {
        let text = FieldValue::text("hello");
        assert_eq!(text.as_text(), Some("hello"));
        assert_eq!(text.as_number(), None);

        let num = FieldValue::Number(1928.0);
        assert_eq!(num.as_number(), Some(1928.0));
        assert_eq!(num.kind(), Some(FieldKind::Number));

        let list = FieldValue::list(["a", "b"]);
        assert_eq!(list.as_list().map(|l| l.len()), Some(2));

        assert!(FieldValue::Null.is_null());
        assert_eq!(FieldValue::Null.kind(), None);
    }

    #[test]
    fn test_string_representation() {
        assert_eq!(FieldValue::Number(1928.0).to_string(), "1928");
        assert_eq!(FieldValue::Number(2.5).to_string(), "2.5");
        assert_eq!(FieldValue::Bool(false).to_string(), "false");
        assert_eq!(FieldValue::list(["a", "b"]).to_string(), "a, b");
        assert_eq!(FieldValue::Null.to_string(), "");

        let date = Utc.with_ymd_and_hms(1928, 2, 1, 0, 0, 0).unwrap();
        assert_eq!(FieldValue::Date(date).to_string(), "1928-02-01T00:00:00Z");
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(FieldValue::from(None::<f64>), FieldValue::Null);
        assert_eq!(FieldValue::from(Some("x")), FieldValue::text("x"));
    }

    #[test]
    fn test_kind_from_name() {
        assert_eq!(FieldKind::from_name("String"), Some(FieldKind::Text));
        assert_eq!(FieldKind::from_name("int"), Some(FieldKind::Number));
        assert_eq!(FieldKind::from_name("array"), Some(FieldKind::List));
        assert_eq!(FieldKind::from_name("structured"), Some(FieldKind::Object));
        assert_eq!(FieldKind::from_name("blob"), None);
        assert_eq!(FieldKind::List.to_string(), "list");
    }

    #[test]
    fn test_serialize_untagged() {
        let json = serde_json::to_string(&FieldValue::list(["x"])).unwrap();
        assert_eq!(json, r#"["x"]"#);
        assert_eq!(serde_json::to_string(&FieldValue::Null).unwrap(), "null");
        assert_eq!(serde_json::to_string(&FieldValue::Number(3.0)).unwrap(), "3.0");
    }
}
