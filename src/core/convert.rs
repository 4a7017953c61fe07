//! Field type conversion
//!
//! Coerces a raw parsed value into the kind a [`FieldDescriptor`] declares.
//! `Ok(FieldValue::Null)` means the value is legitimately missing; an `Err`
//! means a value was present but could not be read as the declared kind.

use crate::core::schema::FieldDescriptor;
use crate::core::value::{FieldKind, FieldValue};
use crate::error::{MatterDexError, Result};
use crate::io::parser::{parse_bool_token, parse_number_token};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Convert a raw value to the kind declared by `field`
pub fn convert_value(raw: &FieldValue, field: &FieldDescriptor) -> Result<FieldValue> {
    if raw.is_null() {
        return Ok(FieldValue::Null);
    }

    match field.kind {
        FieldKind::Text => Ok(FieldValue::Text(raw.to_string_representation())),
        FieldKind::Number => to_number(raw).map(FieldValue::Number),
        FieldKind::Boolean => to_bool(raw).map(FieldValue::Bool),
        FieldKind::Date => to_date(raw).map(FieldValue::Date),
        FieldKind::List => Ok(to_list(raw)),
        FieldKind::Object => Ok(raw.clone()),
    }
}

fn to_number(raw: &FieldValue) -> Result<f64> {
    match raw {
        FieldValue::Number(n) if n.is_finite() => Ok(*n),
        FieldValue::Text(s) => parse_number_token(s).ok_or_else(|| not_convertible(raw, FieldKind::Number)),
        _ => Err(not_convertible(raw, FieldKind::Number)),
    }
}

fn to_bool(raw: &FieldValue) -> Result<bool> {
    match raw {
        FieldValue::Bool(b) => Ok(*b),
        FieldValue::Text(s) => parse_bool_token(s).ok_or_else(|| not_convertible(raw, FieldKind::Boolean)),
        _ => Err(not_convertible(raw, FieldKind::Boolean)),
    }
}

fn to_date(raw: &FieldValue) -> Result<DateTime<Utc>> {
    match raw {
        FieldValue::Date(d) => Ok(*d),
        FieldValue::Text(s) => parse_date(s).ok_or_else(|| not_convertible(raw, FieldKind::Date)),
        FieldValue::Number(n) => from_epoch_millis(*n).ok_or_else(|| not_convertible(raw, FieldKind::Date)),
        _ => Err(not_convertible(raw, FieldKind::Date)),
    }
}

fn to_list(raw: &FieldValue) -> FieldValue {
    match raw {
        FieldValue::List(items) => FieldValue::List(items.clone()),
        scalar => FieldValue::List(vec![scalar.to_string_representation()]),
    }
}

fn not_convertible(raw: &FieldValue, kind: FieldKind) -> MatterDexError {
    let from = match raw {
        FieldValue::Text(s) => format!("\"{}\"", s),
        other => other.to_string_representation(),
    };
    MatterDexError::type_conversion(from, kind.to_string())
}

/// Parse an ISO-style date or date-time
///
/// Accepts RFC 3339, `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM[:SS]` and
/// `YYYY-MM-DD HH:MM[:SS]`. Values without an offset are taken as UTC.
pub fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    const DATETIME_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];
    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Interpret a number as milliseconds since the Unix epoch
pub fn from_epoch_millis(n: f64) -> Option<DateTime<Utc>> {
    if !n.is_finite() || n.abs() > i64::MAX as f64 {
        return None;
    }
    Utc.timestamp_millis_opt(n as i64).single()
}
