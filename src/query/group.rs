//! Record grouping
//!
//! Single-field grouping is a strict partition: every record lands in exactly
//! one bucket, absent values in a dedicated [`GroupKey::Absent`] bucket. List
//! grouping fans out instead, adding a record to a bucket once per list item,
//! so total membership equals the summed list lengths. Value buckets appear in
//! first-encountered order and the absent bucket, when present, is always
//! last; the year, month and status helpers impose their own bucket order on
//! top.

use crate::core::convert::parse_date;
use crate::core::record::Record;
use crate::core::schema::Schema;
use crate::core::value::FieldValue;
use crate::error::{MatterDexError, Result};
use crate::io::parser::parse_number_token;
use chrono::Datelike;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Bucket key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum GroupKey {
    Value(String),
    Absent,
}

impl GroupKey {
    pub fn as_value(&self) -> Option<&str> {
        match self {
            Self::Value(v) => Some(v),
            Self::Absent => None,
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => write!(f, "{}", v),
            Self::Absent => write!(f, "(none)"),
        }
    }
}

/// One bucket and its members, in input order
#[derive(Debug, Clone, PartialEq)]
pub struct Group<R> {
    pub key: GroupKey,
    pub records: Vec<R>,
}

impl<R> Group<R> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Group by keys computed per record
///
/// A record is added to a bucket once for every time `keys_of` returns that
/// key; an empty key list leaves the record out of every bucket.
pub fn group_by_keys<R, F>(records: &[R], keys_of: F) -> Vec<Group<R>>
where
    R: AsRef<Record> + Clone,
    F: Fn(&Record) -> Vec<GroupKey>,
{
    let mut groups: Vec<Group<R>> = Vec::new();
    let mut index: HashMap<GroupKey, usize> = HashMap::new();

    for record in records {
        for key in keys_of(record.as_ref()) {
            let slot = *index.entry(key.clone()).or_insert_with(|| {
                groups.push(Group {
                    key,
                    records: Vec::new(),
                });
                groups.len() - 1
            });
            groups[slot].records.push(record.clone());
        }
    }

    // Keep the absent bucket last
    if let Some(pos) = groups.iter().position(|g| g.key == GroupKey::Absent) {
        let absent = groups.remove(pos);
        groups.push(absent);
    }
    groups
}

fn scalar_key(value: &FieldValue) -> GroupKey {
    match value {
        FieldValue::Null => GroupKey::Absent,
        FieldValue::List(items) if items.is_empty() => GroupKey::Absent,
        other => GroupKey::Value(other.to_string_representation()),
    }
}

/// Partition records by the value at `field`
pub fn group_by_field<R>(records: &[R], field: &str) -> Vec<Group<R>>
where
    R: AsRef<Record> + Clone,
{
    group_by_keys(records, |r| vec![scalar_key(r.get(field))])
}

/// Fan records out by each value of a list field
///
/// Fails if the schema declares `field` with a kind other than list.
/// Undeclared fields are accepted; a scalar there counts as a one-item list.
pub fn group_by_list_field<R>(records: &[R], schema: &Schema, field: &str) -> Result<Vec<Group<R>>>
where
    R: AsRef<Record> + Clone,
{
    if let Some(kind) = schema.kind_of(field) {
        if !kind.is_list() {
            return Err(MatterDexError::not_a_list_field(field, kind.to_string()));
        }
    }

    Ok(group_by_keys(records, |r| match r.get(field) {
        FieldValue::Null => Vec::new(),
        FieldValue::List(items) => items.iter().map(|i| GroupKey::Value(i.clone())).collect(),
        scalar => vec![GroupKey::Value(scalar.to_string_representation())],
    }))
}

/// Concatenate bucket members back into one collection
///
/// Under fan-out grouping a record appears once per list item it holds.
pub fn flatten_groups<R: Clone>(groups: &[Group<R>]) -> Vec<R> {
    groups.iter().flat_map(|g| g.records.iter().cloned()).collect()
}

fn year_of(value: &FieldValue) -> Option<i32> {
    match value {
        FieldValue::Date(d) => Some(d.year()),
        FieldValue::Number(n) if n.fract() == 0.0 => Some(*n as i32),
        FieldValue::Text(s) => parse_date(s)
            .map(|d| d.year())
            .or_else(|| parse_number_token(s).filter(|n| n.fract() == 0.0).map(|n| n as i32)),
        _ => None,
    }
}

fn month_of(value: &FieldValue) -> Option<String> {
    let date = match value {
        FieldValue::Date(d) => *d,
        FieldValue::Text(s) => parse_date(s)?,
        _ => return None,
    };
    Some(format!("{:04}-{:02}", date.year(), date.month()))
}

/// Group by calendar year, most recent first
///
/// Years come from dates, whole numbers, or text holding either; anything else
/// lands in the absent bucket.
pub fn group_by_year<R>(records: &[R], field: &str) -> Vec<Group<R>>
where
    R: AsRef<Record> + Clone,
{
    let mut groups = group_by_keys(records, |r| {
        vec![year_of(r.get(field)).map_or(GroupKey::Absent, |y| GroupKey::Value(y.to_string()))]
    });
    groups.sort_by_key(|g| {
        std::cmp::Reverse(g.key.as_value().and_then(|y| y.parse::<i64>().ok()).unwrap_or(i64::MIN))
    });
    groups
}

/// Group by `YYYY-MM` month, most recent first
pub fn group_by_month<R>(records: &[R], field: &str) -> Vec<Group<R>>
where
    R: AsRef<Record> + Clone,
{
    let mut groups = group_by_keys(records, |r| {
        vec![month_of(r.get(field)).map_or(GroupKey::Absent, GroupKey::Value)]
    });
    groups.sort_by(|a, b| match (a.key.as_value(), b.key.as_value()) {
        (Some(a), Some(b)) => b.cmp(a),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    groups
}

/// Group by the schema's status field
///
/// Buckets follow the status descriptor's declared `options` order, then any
/// undeclared statuses in first-encountered order, then the absent bucket.
pub fn group_by_status<R>(records: &[R], schema: &Schema) -> Result<Vec<Group<R>>>
where
    R: AsRef<Record> + Clone,
{
    let field = schema
        .status_field
        .as_deref()
        .ok_or_else(|| MatterDexError::missing_role("status"))?;
    let options: &[String] = schema
        .status_descriptor()
        .map(|d| d.options.as_slice())
        .unwrap_or_default();

    let mut groups = group_by_field(records, field);
    groups.sort_by_key(|g| match &g.key {
        GroupKey::Value(v) => options.iter().position(|o| o == v).unwrap_or(options.len()),
        GroupKey::Absent => usize::MAX,
    });
    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::FieldDescriptor;
    use crate::core::value::FieldKind;
    use crate::io::parser::parse_block;

    fn keys<R>(groups: &[Group<R>]) -> Vec<String> {
        groups.iter().map(|g| g.key.to_string()).collect()
    }

    fn member_ids<'a>(group: &'a Group<&'a Record>) -> Vec<&'a str> {
        group.records.iter().map(|r| r.id()).collect()
    }

    fn schema() -> Schema {
        Schema::default()
            .with_field(FieldDescriptor::new("authors", FieldKind::List))
            .with_field(FieldDescriptor::new("year", FieldKind::Number))
            .with_field(
                FieldDescriptor::new("status", FieldKind::Text).options(["todo", "doing", "done"]),
            )
            .with_status_field("status")
    }

    #[test]
    fn test_partition() {
        let records = vec![
            Record::new("a", "a.md").with_field("year", 1928.0),
            Record::new("b", "b.md"),
            Record::new("c", "c.md").with_field("year", 1935.0),
            Record::new("d", "d.md").with_field("year", 1928.0),
        ];
        let borrowed: Vec<&Record> = records.iter().collect();
        let groups = group_by_field(&borrowed, "year");

        assert_eq!(keys(&groups), vec!["1928", "1935", "(none)"]);
        assert_eq!(member_ids(&groups[0]), vec!["a", "d"]);
        assert_eq!(groups[2].key, GroupKey::Absent);
        let total: usize = groups.iter().map(Group::len).sum();
        assert_eq!(total, records.len());
    }

    #[test]
    fn test_fan_out() {
        let records = vec![
            Record::new("mound", "1.md").with_field("authors", FieldValue::list(["Lovecraft", "Bishop"])),
            Record::new("dagon", "2.md").with_field("authors", FieldValue::list(["Lovecraft"])),
            Record::new("none", "3.md").with_field("authors", FieldValue::List(vec![])),
            Record::new("unset", "4.md"),
        ];
        let borrowed: Vec<&Record> = records.iter().collect();
        let groups = group_by_list_field(&borrowed, &schema(), "authors").unwrap();

        assert_eq!(keys(&groups), vec!["Lovecraft", "Bishop"]);
        assert_eq!(member_ids(&groups[0]), vec!["mound", "dagon"]);
        assert_eq!(member_ids(&groups[1]), vec!["mound"]);

        let flat = flatten_groups(&groups);
        assert_eq!(flat.len(), 3);
        let mound_refs = flat.iter().filter(|r| std::ptr::eq(**r, &records[0])).count();
        assert_eq!(mound_refs, 2);
    }

    #[test]
    fn test_fan_out_membership_counts_repeated_items() {
        let raw = parse_block("authors: [X, X, Y]");
        let records = vec![Record::new("a", "a.md").with_field("authors", raw["authors"].clone())];
        let groups = group_by_list_field(&records, &schema(), "authors").unwrap();

        assert_eq!(keys(&groups), vec!["X", "Y"]);
        assert_eq!(groups[0].len(), 2);
        let members: usize = groups.iter().map(Group::len).sum();
        assert_eq!(members, 3);
        assert_eq!(flatten_groups(&groups).len(), 3);
    }

    #[test]
    fn test_fan_out_rejects_scalar_fields() {
        let records: Vec<Record> = Vec::new();
        assert!(matches!(
            group_by_list_field(&records, &schema(), "year"),
            Err(MatterDexError::NotAListField { .. })
        ));
    }

    #[test]
    fn test_group_by_year_most_recent_first() {
        let records = vec![
            Record::new("a", "a.md").with_field("published", parse_date("1928-02-01").unwrap()),
            Record::new("b", "b.md").with_field("published", "1936-05-01"),
            Record::new("c", "c.md"),
            Record::new("d", "d.md").with_field("published", 1931.0),
            Record::new("e", "e.md").with_field("published", parse_date("1936-12-01").unwrap()),
        ];
        let groups = group_by_year(&records, "published");
        assert_eq!(keys(&groups), vec!["1936", "1931", "1928", "(none)"]);
        assert_eq!(groups[0].len(), 2);
    }

    #[test]
    fn test_group_by_month() {
        let records = vec![
            Record::new("a", "a.md").with_field("published", "2024-01-15"),
            Record::new("b", "b.md").with_field("published", "2023-12-01"),
            Record::new("c", "c.md").with_field("published", "garbage"),
            Record::new("d", "d.md").with_field("published", "2024-01-02"),
        ];
        let groups = group_by_month(&records, "published");
        assert_eq!(keys(&groups), vec!["2024-01", "2023-12", "(none)"]);
        assert_eq!(groups[0].len(), 2);
    }

    #[test]
    fn test_group_by_status_uses_declared_order() {
        let records = vec![
            Record::new("a", "a.md").with_field("status", "done"),
            Record::new("b", "b.md"),
            Record::new("c", "c.md").with_field("status", "blocked"),
            Record::new("d", "d.md").with_field("status", "todo"),
            Record::new("e", "e.md").with_field("status", "done"),
        ];
        let groups = group_by_status(&records, &schema()).unwrap();
        assert_eq!(keys(&groups), vec!["todo", "done", "blocked", "(none)"]);
        assert_eq!(groups[1].len(), 2);
    }

    #[test]
    fn test_group_by_status_requires_role() {
        let records: Vec<Record> = Vec::new();
        assert!(matches!(
            group_by_status(&records, &Schema::default()),
            Err(MatterDexError::MissingRole { .. })
        ));
    }

    #[test]
    fn test_empty_input() {
        let records: Vec<Record> = Vec::new();
        assert!(group_by_field(&records, "year").is_empty());
        assert!(group_by_year(&records, "year").is_empty());
    }
}
