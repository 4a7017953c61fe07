//! Record sorting
//!
//! Comparison follows the declared kind of the sort field. Records without a
//! usable value at the key always come after records with one, in both
//! directions, and all sorts are stable.

use crate::core::convert::parse_date;
use crate::core::record::Record;
use crate::core::schema::Schema;
use crate::core::value::{FieldKind, FieldValue};
use crate::error::{MatterDexError, Result};
use chrono::{DateTime, Utc};
use deunicode::deunicode;
use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn from_name(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Ascending),
            "desc" | "descending" => Ok(Self::Descending),
            other => Err(MatterDexError::invalid_query(format!(
                "unknown sort direction '{}'",
                other
            ))),
        }
    }
}

/// One sort key: a field and a direction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Ascending,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Descending,
        }
    }

    /// Parse `field` or `field:asc` / `field:desc`
    pub fn parse(s: &str) -> Result<Self> {
        let (field, direction) = match s.split_once(':') {
            Some((field, direction)) => (field.trim(), SortDirection::from_name(direction)?),
            None => (s.trim(), SortDirection::Ascending),
        };
        if field.is_empty() {
            return Err(MatterDexError::invalid_query("sort key without a field name"));
        }
        Ok(Self {
            field: field.to_string(),
            direction,
        })
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction {
            SortDirection::Ascending => write!(f, "{}:asc", self.field),
            SortDirection::Descending => write!(f, "{}:desc", self.field),
        }
    }
}

/// Comparable projection of a field value
#[derive(Debug, Clone, PartialEq)]
enum SortKey {
    Bool(bool),
    Number(f64),
    Date(DateTime<Utc>),
    /// Transliterated collation key, then the lowercased original
    Text(String, String),
}

impl SortKey {
    fn rank(&self) -> u8 {
        match self {
            Self::Bool(_) => 0,
            Self::Number(_) => 1,
            Self::Date(_) => 2,
            Self::Text(..) => 3,
        }
    }

    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Date(a), Self::Date(b)) => a.cmp(b),
            (Self::Text(a, a_raw), Self::Text(b, b_raw)) => a.cmp(b).then_with(|| a_raw.cmp(b_raw)),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

fn text_key(s: &str) -> SortKey {
    let lower = s.to_lowercase();
    SortKey::Text(deunicode(&lower).to_lowercase(), lower)
}

/// Project a value for comparison; `None` sorts as absent
///
/// A value that does not fit the declared kind (an unparsable date, text in a
/// number field) is treated exactly like an absent one.
fn sort_key(value: &FieldValue, kind: Option<FieldKind>) -> Option<SortKey> {
    match (kind, value) {
        (_, FieldValue::Null) => None,
        (_, FieldValue::List(items)) if items.is_empty() => None,

        (Some(FieldKind::Number), FieldValue::Number(n)) => Some(SortKey::Number(*n)),
        (Some(FieldKind::Number), _) => None,

        (Some(FieldKind::Date), FieldValue::Date(d)) => Some(SortKey::Date(*d)),
        (Some(FieldKind::Date), FieldValue::Text(s)) => parse_date(s).map(SortKey::Date),
        (Some(FieldKind::Date), _) => None,

        (Some(FieldKind::Boolean), FieldValue::Bool(b)) => Some(SortKey::Bool(*b)),
        (Some(FieldKind::Boolean), _) => None,

        (Some(FieldKind::Text | FieldKind::List | FieldKind::Object), v) => {
            Some(text_key(&v.to_string_representation()))
        }

        (None, FieldValue::Number(n)) => Some(SortKey::Number(*n)),
        (None, FieldValue::Date(d)) => Some(SortKey::Date(*d)),
        (None, FieldValue::Bool(b)) => Some(SortKey::Bool(*b)),
        (None, v) => Some(text_key(&v.to_string_representation())),
    }
}

/// Compare two present values as the given kind
///
/// Values that cannot be read as `kind` compare after those that can.
pub fn compare_values(a: &FieldValue, b: &FieldValue, kind: Option<FieldKind>) -> Ordering {
    compare_keys(
        sort_key(a, kind).as_ref(),
        sort_key(b, kind).as_ref(),
        SortDirection::Ascending,
    )
}

fn compare_keys(a: Option<&SortKey>, b: Option<&SortKey>, direction: SortDirection) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => match direction {
            SortDirection::Ascending => a.compare(b),
            SortDirection::Descending => b.compare(a),
        },
    }
}

fn sort_one<R: AsRef<Record>>(records: Vec<R>, schema: &Schema, spec: &SortSpec) -> Vec<R> {
    let kind = schema.kind_of(&spec.field);
    let mut keyed: Vec<(Option<SortKey>, R)> = records
        .into_iter()
        .map(|r| (sort_key(r.as_ref().get(&spec.field), kind), r))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| compare_keys(a.as_ref(), b.as_ref(), spec.direction));
    keyed.into_iter().map(|(_, r)| r).collect()
}

/// Sort by a single field
pub fn sort_by_field<R>(records: &[R], schema: &Schema, field: &str, direction: SortDirection) -> Vec<R>
where
    R: AsRef<Record> + Clone,
{
    let spec = SortSpec {
        field: field.to_string(),
        direction,
    };
    sort_by_fields(records, schema, std::slice::from_ref(&spec))
}

/// Sort by several fields; the first spec has the highest precedence
///
/// Specs are applied to the stable sort last-to-first, so later specs only
/// break ties left by earlier ones.
pub fn sort_by_fields<R>(records: &[R], schema: &Schema, specs: &[SortSpec]) -> Vec<R>
where
    R: AsRef<Record> + Clone,
{
    specs
        .iter()
        .rev()
        .fold(records.to_vec(), |sorted, spec| sort_one(sorted, schema, spec))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::FieldDescriptor;

    fn schema() -> Schema {
        Schema::default()
            .with_field(FieldDescriptor::new("title", FieldKind::Text))
            .with_field(FieldDescriptor::new("year", FieldKind::Number))
            .with_field(FieldDescriptor::new("published", FieldKind::Date))
            .with_field(FieldDescriptor::new("read", FieldKind::Boolean))
    }

    fn ids<R: AsRef<Record>>(records: &[R]) -> Vec<&str> {
        records.iter().map(|r| r.as_ref().id()).collect()
    }

    #[test]
    fn test_numbers_ascending_with_absent_last() {
        let records = vec![
            Record::new("none", "n.md").with_field("year", FieldValue::Null),
            Record::new("b", "b.md").with_field("year", 1935.0),
            Record::new("a", "a.md").with_field("year", 1928.0),
        ];
        let sorted = sort_by_field(&records, &schema(), "year", SortDirection::Ascending);
        assert_eq!(ids(&sorted), vec!["a", "b", "none"]);

        let sorted = sort_by_field(&records, &schema(), "year", SortDirection::Descending);
        assert_eq!(ids(&sorted), vec!["b", "a", "none"]);

        // Input untouched
        assert_eq!(ids(&records), vec!["none", "b", "a"]);
    }

    #[test]
    fn test_numbers_compare_numerically() {
        let records = vec![
            Record::new("ten", "1.md").with_field("year", 10.0),
            Record::new("nine", "2.md").with_field("year", 9.0),
            Record::new("hundred", "3.md").with_field("year", 100.0),
        ];
        let sorted = sort_by_field(&records, &schema(), "year", SortDirection::Ascending);
        assert_eq!(ids(&sorted), vec!["nine", "ten", "hundred"]);
    }

    #[test]
    fn test_text_is_case_insensitive_and_stable() {
        let records = vec![
            Record::new("1", "1.md").with_field("title", "beta"),
            Record::new("2", "2.md").with_field("title", "Alpha"),
            Record::new("3", "3.md").with_field("title", "BETA"),
            Record::new("4", "4.md").with_field("title", "alpha"),
        ];
        let sorted = sort_by_field(&records, &schema(), "title", SortDirection::Ascending);
        assert_eq!(ids(&sorted), vec!["2", "4", "1", "3"]);

        let sorted = sort_by_field(&records, &schema(), "title", SortDirection::Descending);
        assert_eq!(ids(&sorted), vec!["1", "3", "2", "4"]);
    }

    #[test]
    fn test_text_folds_accents() {
        let records = vec![
            Record::new("zed", "1.md").with_field("title", "Zed"),
            Record::new("accented", "2.md").with_field("title", "Émile"),
            Record::new("bob", "3.md").with_field("title", "bob"),
            Record::new("plain", "4.md").with_field("title", "Emile"),
        ];
        let sorted = sort_by_field(&records, &schema(), "title", SortDirection::Ascending);
        assert_eq!(ids(&sorted), vec!["bob", "plain", "accented", "zed"]);

        let sorted = sort_by_field(&records, &schema(), "title", SortDirection::Descending);
        assert_eq!(ids(&sorted), vec!["zed", "accented", "plain", "bob"]);
    }

    #[test]
    fn test_unparsable_dates_sort_as_absent() {
        let records = vec![
            Record::new("bad", "1.md").with_field("published", "someday"),
            Record::new("late", "2.md").with_field("published", parse_date("1936-01-01").unwrap()),
            Record::new("none", "3.md"),
            Record::new("early", "4.md").with_field("published", "1928-02-01"),
            Record::new("bad2", "5.md").with_field("published", "whenever"),
        ];
        let sorted = sort_by_field(&records, &schema(), "published", SortDirection::Ascending);
        assert_eq!(ids(&sorted), vec!["early", "late", "bad", "none", "bad2"]);

        let sorted = sort_by_field(&records, &schema(), "published", SortDirection::Descending);
        assert_eq!(ids(&sorted), vec!["late", "early", "bad", "none", "bad2"]);
    }

    #[test]
    fn test_booleans() {
        let records = vec![
            Record::new("t", "1.md").with_field("read", true),
            Record::new("f", "2.md").with_field("read", false),
        ];
        let sorted = sort_by_field(&records, &schema(), "read", SortDirection::Ascending);
        assert_eq!(ids(&sorted), vec!["f", "t"]);
    }

    #[test]
    fn test_multi_field_first_spec_wins() {
        let records = vec![
            Record::new("a", "1.md").with_field("year", 1930.0).with_field("title", "Zeta"),
            Record::new("b", "2.md").with_field("year", 1920.0).with_field("title", "Beta"),
            Record::new("c", "3.md").with_field("year", 1930.0).with_field("title", "Alpha"),
            Record::new("d", "4.md").with_field("title", "Alpha"),
            Record::new("e", "5.md").with_field("year", 1920.0).with_field("title", "Alpha"),
        ];
        let specs = vec![SortSpec::desc("year"), SortSpec::asc("title")];
        let sorted = sort_by_fields(&records, &schema(), &specs);
        assert_eq!(ids(&sorted), vec!["c", "a", "e", "b", "d"]);

        let specs = vec![SortSpec::asc("title"), SortSpec::desc("year")];
        let sorted = sort_by_fields(&records, &schema(), &specs);
        assert_eq!(ids(&sorted), vec!["c", "e", "d", "b", "a"]);
    }

    #[test]
    fn test_undeclared_field_uses_value_kind() {
        let records = vec![
            Record::new("x", "1.md").with_field("rank", 3.0),
            Record::new("y", "2.md").with_field("rank", 20.0),
            Record::new("z", "3.md").with_field("rank", 1.0),
        ];
        let sorted = sort_by_field(&records, &schema(), "rank", SortDirection::Ascending);
        assert_eq!(ids(&sorted), vec!["z", "x", "y"]);
    }

    #[test]
    fn test_borrowed_records() {
        let records = vec![
            Record::new("b", "b.md").with_field("year", 2.0),
            Record::new("a", "a.md").with_field("year", 1.0),
        ];
        let borrowed: Vec<&Record> = records.iter().collect();
        let sorted = sort_by_field(&borrowed, &schema(), "year", SortDirection::Ascending);
        assert!(std::ptr::eq(sorted[0], &records[1]));
    }

    #[test]
    fn test_spec_parsing() {
        assert_eq!(SortSpec::parse("year").unwrap(), SortSpec::asc("year"));
        assert_eq!(SortSpec::parse("year:DESC").unwrap(), SortSpec::desc("year"));
        assert_eq!(SortSpec::desc("year").to_string(), "year:desc");
        assert!(matches!(
            SortSpec::parse("year:sideways"),
            Err(MatterDexError::InvalidQuery { .. })
        ));
        assert!(SortSpec::parse(":asc").is_err());
    }

    #[test]
    fn test_compare_values() {
        let a = FieldValue::text("10");
        let b = FieldValue::Number(9.0);
        assert_eq!(compare_values(&b, &a, Some(FieldKind::Number)), Ordering::Less);
        assert_eq!(
            compare_values(&FieldValue::Null, &FieldValue::Null, Some(FieldKind::Text)),
            Ordering::Equal
        );
    }
}
