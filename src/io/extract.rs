//! Front matter block extraction
//!
//! Only the first two delimiter lines counted from offset zero are ever
//! considered, so a `---` inside the body (a fenced sample, a horizontal rule)
//! can never be taken for the block boundary.

/// Delimiter line opening and closing the block
pub const DELIMITER: &str = "---";

/// Return the text strictly between the opening and closing delimiter lines
///
/// `Some("")` means the block exists but is empty; `None` means the document
/// does not start with a delimited block.
pub fn extract_frontmatter(text: &str) -> Option<&str> {
    split_document(text).0
}

/// Split a document into its front matter block and body
///
/// When no block is found the whole input is returned as the body.
pub fn split_document(text: &str) -> (Option<&str>, &str) {
    let content = text.strip_prefix('\u{feff}').unwrap_or(text);

    let Some(rest) = after_opening_delimiter(content) else {
        return (None, text);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if is_delimiter_line(line) {
            let block = trim_final_newline(&rest[..offset]);
            let body = &rest[offset + line.len()..];
            return (Some(block), body);
        }
        offset += line.len();
    }

    log::debug!("opening delimiter without a closing one; treating document as body only");
    (None, text)
}

fn after_opening_delimiter(content: &str) -> Option<&str> {
    let first = content.split_inclusive('\n').next()?;
    if is_delimiter_line(first) && first.ends_with('\n') {
        Some(&content[first.len()..])
    } else {
        None
    }
}

fn is_delimiter_line(line: &str) -> bool {
    line.trim_end() == DELIMITER
}

fn trim_final_newline(block: &str) -> &str {
    match block.strip_suffix('\n') {
        Some(stripped) => stripped.strip_suffix('\r').unwrap_or(stripped),
        None => block,
    }
}
