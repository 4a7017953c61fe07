//! Aggregate primitives
//!
//! Every aggregate is total over an empty input: counts come back empty, sums
//! and averages come back zero, and ranges come back `None` rather than a
//! zero-valued pair.

use crate::core::convert::parse_date;
use crate::core::record::Record;
use crate::core::value::FieldValue;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Per-value counts, with absent values counted apart from every real value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValueCounts {
    pub values: BTreeMap<String, usize>,
    pub absent: usize,
}

impl ValueCounts {
    /// True when nothing was counted, present or absent
    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.absent == 0
    }

    /// Count for one present value
    pub fn get(&self, value: &str) -> Option<usize> {
        self.values.get(value).copied()
    }

    /// Number of distinct present values
    pub fn distinct(&self) -> usize {
        self.values.len()
    }
}

/// Inclusive bounds observed over a collection
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValueRange<T> {
    pub min: T,
    pub max: T,
}

impl<T: PartialOrd + Copy> ValueRange<T> {
    fn extend(range: Option<Self>, value: T) -> Option<Self> {
        Some(match range {
            None => Self {
                min: value,
                max: value,
            },
            Some(r) => Self {
                min: if value < r.min { value } else { r.min },
                max: if value > r.max { value } else { r.max },
            },
        })
    }
}

/// Counting keys of one value; lists contribute every item
fn value_keys(value: &FieldValue) -> Vec<String> {
    match value {
        FieldValue::Null => Vec::new(),
        FieldValue::List(items) => items.clone(),
        other => vec![other.to_string_representation()],
    }
}

/// Count values of `field` across records
///
/// List items count one each, matching fan-out bucket sizes. Absent values,
/// including empty lists, go to [`ValueCounts::absent`].
pub fn count_by<R: AsRef<Record>>(records: &[R], field: &str) -> ValueCounts {
    let mut counts = ValueCounts::default();
    for record in records {
        let keys = value_keys(record.as_ref().get(field));
        if keys.is_empty() {
            counts.absent += 1;
        }
        for key in keys {
            *counts.values.entry(key).or_insert(0) += 1;
        }
    }
    counts
}

fn numbers<'a, R: AsRef<Record>>(records: &'a [R], field: &'a str) -> impl Iterator<Item = f64> + 'a {
    records
        .iter()
        .filter_map(move |r| r.as_ref().get(field).as_number())
}

/// Sum of the numeric values at `field`
pub fn sum<R: AsRef<Record>>(records: &[R], field: &str) -> f64 {
    numbers(records, field).sum()
}

/// Mean of the numeric values at `field`, zero when there are none
pub fn average<R: AsRef<Record>>(records: &[R], field: &str) -> f64 {
    let (total, n) = numbers(records, field).fold((0.0, 0usize), |(t, n), v| (t + v, n + 1));
    if n == 0 {
        0.0
    } else {
        total / n as f64
    }
}

/// Smallest and largest numeric value at `field`
pub fn numeric_range<R: AsRef<Record>>(records: &[R], field: &str) -> Option<ValueRange<f64>> {
    numbers(records, field).fold(None, ValueRange::extend)
}

/// Earliest and latest date at `field`
///
/// Text values that parse as dates are included; anything else is skipped.
pub fn date_range<R: AsRef<Record>>(records: &[R], field: &str) -> Option<ValueRange<DateTime<Utc>>> {
    records
        .iter()
        .filter_map(|r| match r.as_ref().get(field) {
            FieldValue::Date(d) => Some(*d),
            FieldValue::Text(s) => parse_date(s),
            _ => None,
        })
        .fold(None, ValueRange::extend)
}

/// Most frequent present value at `field` with its count
///
/// Ties go to the value encountered first.
pub fn most_common<R: AsRef<Record>>(records: &[R], field: &str) -> Option<(String, usize)> {
    let mut order: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in records {
        for key in value_keys(record.as_ref().get(field)) {
            match index.get(&key) {
                Some(&i) => order[i].1 += 1,
                None => {
                    index.insert(key.clone(), order.len());
                    order.push((key, 1));
                }
            }
        }
    }

    order.into_iter().fold(None, |best, (key, n)| match best {
        Some((_, top)) if top >= n => best,
        _ => Some((key, n)),
    })
}
