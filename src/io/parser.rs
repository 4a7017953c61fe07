//! Subset parser for front matter blocks
//!
//! Supports `key: value` scalars, `key:` followed by `- item` lines, inline
//! `[a, b]` lists, quoted scalars and `#` comment lines. Nothing else from YAML
//! is understood. A line that cannot be interpreted is skipped; the rest of the
//! block still parses.

use crate::core::value::FieldValue;
use std::collections::BTreeMap;

/// Loosely typed fields as they come out of the parser
pub type RawFields = BTreeMap<String, FieldValue>;

enum ScanState {
    ExpectKey,
    PendingList { key: String, items: Vec<String> },
}

/// Parse an extracted block into raw fields
pub fn parse_block(block: &str) -> RawFields {
    let mut fields = RawFields::new();
    let mut state = ScanState::ExpectKey;

    for (index, line) in block.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if let Some(item) = list_item(trimmed) {
            match &mut state {
                ScanState::PendingList { items, .. } => {
                    let item = unquote(item.trim());
                    if !item.is_empty() {
                        items.push(item.to_string());
                    }
                }
                ScanState::ExpectKey => {
                    log::debug!("line {}: list item without a key, skipped", index + 1);
                }
            }
            continue;
        }

        if line.starts_with(char::is_whitespace) {
            log::debug!("line {}: nested mapping not supported, skipped", index + 1);
            continue;
        }

        let Some((key, value)) = trimmed.split_once(':') else {
            log::debug!("line {}: no key separator, skipped", index + 1);
            continue;
        };
        let key = unquote(key.trim());
        if key.is_empty() {
            log::debug!("line {}: empty key, skipped", index + 1);
            continue;
        }

        flush(&mut state, &mut fields);

        let value = value.trim();
        if value.is_empty() {
            state = ScanState::PendingList {
                key: key.to_string(),
                items: Vec::new(),
            };
        } else {
            fields.insert(key.to_string(), parse_scalar(value));
        }
    }

    flush(&mut state, &mut fields);
    fields
}

fn flush(state: &mut ScanState, fields: &mut RawFields) {
    if let ScanState::PendingList { key, items } = std::mem::replace(state, ScanState::ExpectKey) {
        let value = if items.is_empty() {
            FieldValue::Null
        } else {
            FieldValue::List(items)
        };
        fields.insert(key, value);
    }
}

fn list_item(trimmed: &str) -> Option<&str> {
    if trimmed == "-" {
        Some("")
    } else {
        trimmed.strip_prefix("- ")
    }
}

/// Infer a scalar (or inline list) from an unparsed value
pub fn parse_scalar(value: &str) -> FieldValue {
    let value = value.trim();

    if let Some(inner) = value.strip_prefix('[').and_then(|v| v.strip_suffix(']')) {
        return FieldValue::List(
            split_inline_list(inner)
                .into_iter()
                .map(|item| unquote(item.trim()).to_string())
                .filter(|item| !item.is_empty())
                .collect(),
        );
    }

    if is_quoted(value) {
        return FieldValue::Text(value[1..value.len() - 1].to_string());
    }

    if value.is_empty() || is_null_token(value) {
        FieldValue::Null
    } else if let Some(b) = parse_bool_token(value) {
        FieldValue::Bool(b)
    } else if let Some(n) = parse_number_token(value) {
        FieldValue::Number(n)
    } else {
        FieldValue::Text(value.to_string())
    }
}

/// Accepted boolean synonyms, case-insensitive
pub fn parse_bool_token(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" => Some(true),
        "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// A finite number spelled by the whole token
pub fn parse_number_token(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

fn is_null_token(s: &str) -> bool {
    s == "~" || s.eq_ignore_ascii_case("null")
}

fn is_quoted(s: &str) -> bool {
    s.len() >= 2
        && ((s.starts_with('"') && s.ends_with('"')) || (s.starts_with('\'') && s.ends_with('\'')))
}

fn unquote(s: &str) -> &str {
    if is_quoted(s) {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

/// Split on commas that are not inside quotes
fn split_inline_list(inner: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in inner.char_indices() {
        match (quote, c) {
            (None, '"' | '\'') => quote = Some(c),
            (Some(q), c) if c == q => quote = None,
            (None, ',') => {
                parts.push(&inner[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&inner[start..]);
    parts
}
