//! Record filters
//!
//! Every filter returns a new collection holding the surviving records in
//! their original relative order. Clauses combine by conjunction only; apply
//! filters in sequence or negate a clause for anything else.

use crate::core::convert::{convert_value, parse_date};
use crate::core::record::Record;
use crate::core::schema::Schema;
use crate::core::value::{FieldKind, FieldValue};
use crate::error::{MatterDexError, Result};
use crate::io::parser::{parse_number_token, parse_scalar};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};

/// Filter operators accepted in text form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    /// `=`
    Equals,
    /// `!=`
    NotEquals,
    /// `~` (list membership or substring, case-insensitive)
    Includes,
    /// `!~`
    Excludes,
    /// `@` with `min..max`, numeric or date bounds
    Range,
}

impl FilterOp {
    /// Operators ordered so that longer symbols are tried first
    const SYMBOLS: [(&'static str, FilterOp); 5] = [
        ("!=", FilterOp::NotEquals),
        ("!~", FilterOp::Excludes),
        ("=", FilterOp::Equals),
        ("~", FilterOp::Includes),
        ("@", FilterOp::Range),
    ];

    /// Parse an operator from its symbol or name
    pub fn from_name(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "=" | "eq" | "equals" => Ok(Self::Equals),
            "!=" | "ne" | "not-equals" => Ok(Self::NotEquals),
            "~" | "includes" | "contains" => Ok(Self::Includes),
            "!~" | "excludes" => Ok(Self::Excludes),
            "@" | "range" | "between" => Ok(Self::Range),
            other => Err(MatterDexError::invalid_query(format!(
                "unknown filter operator '{}'",
                other
            ))),
        }
    }
}

/// A single field-level predicate
#[derive(Debug, Clone, PartialEq)]
pub enum FilterClause {
    /// Strict equality on the stored value
    Equals { field: String, value: FieldValue },
    /// Case-insensitive list membership, or substring for scalars
    Includes { field: String, needle: String },
    /// Inclusive numeric range; absent and non-numeric values never match
    NumberRange {
        field: String,
        min: Option<f64>,
        max: Option<f64>,
    },
    /// Inclusive date range; absent and non-date values never match
    DateRange {
        field: String,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    },
    Not(Box<FilterClause>),
}

impl FilterClause {
    pub fn equals(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self::Equals {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn includes(field: impl Into<String>, needle: impl Into<String>) -> Self {
        Self::Includes {
            field: field.into(),
            needle: needle.into(),
        }
    }

    pub fn number_range(field: impl Into<String>, min: Option<f64>, max: Option<f64>) -> Self {
        Self::NumberRange {
            field: field.into(),
            min,
            max,
        }
    }

    pub fn date_range(
        field: impl Into<String>,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Self {
        Self::DateRange {
            field: field.into(),
            start,
            end,
        }
    }

    /// Wrap this clause in a negation
    pub fn negate(self) -> Self {
        match self {
            Self::Not(inner) => *inner,
            clause => Self::Not(Box::new(clause)),
        }
    }

    /// Test a record against this clause
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Self::Equals { field, value } => record.get(field) == value,
            Self::Includes { field, needle } => includes(record.get(field), needle),
            Self::NumberRange { field, min, max } => match record.get(field) {
                FieldValue::Number(n) => within(n, min.as_ref(), max.as_ref()),
                _ => false,
            },
            Self::DateRange { field, start, end } => match record.get(field) {
                FieldValue::Date(d) => within(d, start.as_ref(), end.as_ref()),
                _ => false,
            },
            Self::Not(inner) => !inner.matches(record),
        }
    }

    /// Parse a clause such as `year=1928`, `authors~lovecraft` or
    /// `year@1900..1950`
    ///
    /// Equality arguments are converted to the field's declared kind when the
    /// schema knows the field. Range bounds may be left open (`year@..1950`).
    /// A date field takes date bounds, where a bare year covers the whole
    /// year; a number field rejects anything but numbers. Undeclared fields
    /// are numeric when every bound is a number, dated otherwise.
    pub fn parse(expr: &str, schema: &Schema) -> Result<Self> {
        let (field, op, argument) = split_expression(expr)?;

        match op {
            FilterOp::Equals | FilterOp::NotEquals => {
                let raw = parse_scalar(argument);
                let value = match schema.field(field) {
                    Some(descriptor) => convert_value(&raw, descriptor)?,
                    None => raw,
                };
                let clause = Self::equals(field, value);
                Ok(if op == FilterOp::NotEquals { clause.negate() } else { clause })
            }
            FilterOp::Includes | FilterOp::Excludes => {
                let clause = Self::includes(field, argument.trim());
                Ok(if op == FilterOp::Excludes { clause.negate() } else { clause })
            }
            FilterOp::Range => parse_range(field, argument, schema.kind_of(field)),
        }
    }
}

fn split_expression(expr: &str) -> Result<(&str, FilterOp, &str)> {
    let found = FilterOp::SYMBOLS
        .iter()
        .filter_map(|(symbol, op)| expr.find(symbol).map(|pos| (pos, *symbol, *op)))
        .min_by_key(|(pos, symbol, _)| (*pos, std::cmp::Reverse(symbol.len())));

    let Some((pos, symbol, op)) = found else {
        return Err(MatterDexError::invalid_query(format!(
            "no filter operator in '{}'",
            expr
        )));
    };

    let field = expr[..pos].trim();
    if field.is_empty() {
        return Err(MatterDexError::invalid_query(format!(
            "missing field name in '{}'",
            expr
        )));
    }
    Ok((field, op, &expr[pos + symbol.len()..]))
}

fn parse_range(field: &str, argument: &str, kind: Option<FieldKind>) -> Result<FilterClause> {
    let Some((low, high)) = argument.split_once("..") else {
        return Err(MatterDexError::invalid_query(format!(
            "range for '{}' must look like min..max",
            field
        )));
    };
    let (low, high) = (low.trim(), high.trim());
    let numeric = [low, high]
        .iter()
        .all(|b| b.is_empty() || parse_number_token(b).is_some());

    match kind {
        Some(FieldKind::Date) => Ok(FilterClause::date_range(
            field,
            date_bound(field, low, YearEdge::Start)?,
            date_bound(field, high, YearEdge::End)?,
        )),
        Some(FieldKind::Number) if !numeric => Err(MatterDexError::invalid_query(format!(
            "range for number field '{}' needs numeric bounds, got '{}'",
            field, argument
        ))),
        _ if numeric => Ok(FilterClause::number_range(
            field,
            parse_number_token(low),
            parse_number_token(high),
        )),
        _ => {
            let parse_bound = |b: &str| -> Result<Option<DateTime<Utc>>> {
                if b.is_empty() {
                    return Ok(None);
                }
                parse_date(b).map(Some).ok_or_else(|| {
                    MatterDexError::invalid_query(format!("'{}' is neither a number nor a date", b))
                })
            };
            Ok(FilterClause::date_range(field, parse_bound(low)?, parse_bound(high)?))
        }
    }
}

#[derive(Clone, Copy)]
enum YearEdge {
    Start,
    End,
}

/// Date bound for a declared date field; `2020` expands to the first or last
/// second of that year
fn date_bound(field: &str, bound: &str, edge: YearEdge) -> Result<Option<DateTime<Utc>>> {
    if bound.is_empty() {
        return Ok(None);
    }

    if bound.len() == 4 && bound.bytes().all(|b| b.is_ascii_digit()) {
        let year: i32 = bound
            .parse()
            .map_err(|_| MatterDexError::invalid_query(format!("bad year '{}'", bound)))?;
        let naive = match edge {
            YearEdge::Start => NaiveDate::from_ymd_opt(year, 1, 1).and_then(|d| d.and_hms_opt(0, 0, 0)),
            YearEdge::End => NaiveDate::from_ymd_opt(year, 12, 31).and_then(|d| d.and_hms_opt(23, 59, 59)),
        };
        return naive
            .map(|n| Some(Utc.from_utc_datetime(&n)))
            .ok_or_else(|| MatterDexError::invalid_query(format!("bad year '{}'", bound)));
    }

    parse_date(bound).map(Some).ok_or_else(|| {
        MatterDexError::invalid_query(format!("'{}' is not a date for field '{}'", bound, field))
    })
}

fn within<T: PartialOrd>(value: &T, low: Option<&T>, high: Option<&T>) -> bool {
    low.map_or(true, |low| value >= low) && high.map_or(true, |high| value <= high)
}

fn includes(value: &FieldValue, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    match value {
        FieldValue::Null => false,
        FieldValue::List(items) => items.iter().any(|item| item.to_lowercase() == needle),
        scalar => scalar.to_string_representation().to_lowercase().contains(&needle),
    }
}

/// Keep the records for which `predicate` holds
pub fn filter_by<R, F>(records: &[R], predicate: F) -> Vec<R>
where
    R: AsRef<Record> + Clone,
    F: Fn(&Record) -> bool,
{
    records
        .iter()
        .filter(|r| predicate(r.as_ref()))
        .cloned()
        .collect()
}

pub fn filter_equals<R>(records: &[R], field: &str, value: &FieldValue) -> Vec<R>
where
    R: AsRef<Record> + Clone,
{
    filter_by(records, |r| r.get(field) == value)
}

pub fn filter_includes<R>(records: &[R], field: &str, needle: &str) -> Vec<R>
where
    R: AsRef<Record> + Clone,
{
    filter_by(records, |r| includes(r.get(field), needle))
}

pub fn filter_number_range<R>(records: &[R], field: &str, min: Option<f64>, max: Option<f64>) -> Vec<R>
where
    R: AsRef<Record> + Clone,
{
    let clause = FilterClause::number_range(field, min, max);
    filter_by(records, |r| clause.matches(r))
}

pub fn filter_date_range<R>(
    records: &[R],
    field: &str,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> Vec<R>
where
    R: AsRef<Record> + Clone,
{
    let clause = FilterClause::date_range(field, start, end);
    filter_by(records, |r| clause.matches(r))
}

/// Keep the records that satisfy every clause
pub fn filter_all<R>(records: &[R], clauses: &[FilterClause]) -> Vec<R>
where
    R: AsRef<Record> + Clone,
{
    filter_by(records, |r| clauses.iter().all(|c| c.matches(r)))
}
