//! Shared helpers for the two-field line format used by vocabularies and
//! base-type files.

/// Comment marker shared by all line-oriented sources.
pub(crate) const COMMENT_MARKER: char = '%';

/// Splits a line into whitespace-delimited fields, treating single-quoted
/// runs as single fields so names may carry embedded spaces.
pub(crate) fn split_quoted_fields(line: &str) -> Result<Vec<String>, &'static str> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quote = false;
    for ch in line.chars() {
        match ch {
            '\'' => in_quote = !in_quote,
            c if c.is_whitespace() && !in_quote => {
                if !current.is_empty() {
                    fields.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if in_quote {
        return Err("unterminated-quote");
    }
    if !current.is_empty() {
        fields.push(current);
    }
    Ok(fields)
}

/// Quotes a field for serialization when it carries embedded whitespace.
pub(crate) fn quote_field(field: &str) -> String {
    if field.chars().any(char::is_whitespace) {
        format!("'{field}'")
    } else {
        field.to_string()
    }
}

/// Returns true for blank lines.
pub(crate) fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Returns the comment body when the line is a comment, `None` otherwise.
pub(crate) fn comment_body(line: &str) -> Option<&str> {
    line.trim_start()
        .strip_prefix(COMMENT_MARKER)
        .map(str::trim)
}
