//! Front matter rendering
//!
//! Writes a field map back out as a delimited block in the same subset the
//! parser reads, so text, number, boolean, absent and list values survive a
//! render/parse cycle unchanged. The block format is line-based: text holding
//! line breaks is written with each break folded to a single space, and reads
//! back in that folded form.

use crate::core::value::{format_number, FieldValue};
use crate::io::extract::DELIMITER;
use crate::io::parser::parse_scalar;
use chrono::SecondsFormat;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt::Write;

/// Render fields as a delimited front matter block
pub fn render_frontmatter(fields: &BTreeMap<String, FieldValue>) -> String {
    let mut out = String::new();
    out.push_str(DELIMITER);
    out.push('\n');

    for (key, value) in fields {
        match value {
            FieldValue::Text(s) => {
                let _ = writeln!(out, "{}: {}", key, scalar_text(s));
            }
            FieldValue::Number(n) => {
                let _ = writeln!(out, "{}: {}", key, format_number(*n));
            }
            FieldValue::Bool(b) => {
                let _ = writeln!(out, "{}: {}", key, b);
            }
            FieldValue::Date(d) => {
                let _ = writeln!(out, "{}: {}", key, d.to_rfc3339_opts(SecondsFormat::Secs, true));
            }
            FieldValue::List(items) if items.is_empty() => {
                let _ = writeln!(out, "{}: []", key);
            }
            FieldValue::List(items) => {
                let _ = writeln!(out, "{}:", key);
                for item in items {
                    let _ = writeln!(out, "  - {}", list_item_text(item));
                }
            }
            FieldValue::Null => {
                let _ = writeln!(out, "{}: null", key);
            }
        }
    }

    out.push_str(DELIMITER);
    out.push('\n');
    out
}

/// Render fields followed by a document body
pub fn render_document(fields: &BTreeMap<String, FieldValue>, body: &str) -> String {
    let mut out = render_frontmatter(fields);
    out.push_str(body);
    out
}

/// Fold line breaks to spaces so a value stays on its own line
fn single_line(s: &str) -> Cow<'_, str> {
    if s.contains(['\r', '\n']) {
        Cow::Owned(s.replace("\r\n", " ").replace(['\r', '\n'], " "))
    } else {
        Cow::Borrowed(s)
    }
}

fn scalar_text(s: &str) -> String {
    let s = single_line(s);
    let s = s.as_ref();
    if parse_scalar(s) == FieldValue::Text(s.to_string()) && s == s.trim() {
        s.to_string()
    } else {
        format!("\"{}\"", s)
    }
}

fn list_item_text(s: &str) -> String {
    let s = single_line(s);
    let s = s.as_ref();
    let needs_quotes = s.is_empty()
        || s != s.trim()
        || s.starts_with(['"', '\''])
        || s.ends_with(['"', '\'']);
    if needs_quotes {
        format!("\"{}\"", s)
    } else {
        s.to_string()
    }
}
