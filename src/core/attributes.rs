//! Attribute-blob parsing
//!
//! Parses the raw text between a tag name and `>` into an ordered attribute
//! list. A bare token is a presence-only attribute; `name=value` takes a
//! quoted or unquoted value with quotes stripped. A standalone `/` token is
//! the inline-close signal and never appears in the result.

use super::scanner::is_whitespace;

/// A parsed attribute borrowing from the tag text
///
/// `value` is None for presence-only attributes. Values are raw: character
/// references are expanded later, when the attribute lands on a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAttr<'a> {
    pub name: &'a str,
    pub value: Option<&'a str>,
}

impl<'a> RawAttr<'a> {
    pub fn new(name: &'a str, value: Option<&'a str>) -> Self {
        RawAttr { name, value }
    }
}

/// Parse an attribute blob
///
/// Returns the attributes in source order plus whether a standalone `/`
/// (the inline-close signal) was consumed. Never fails; malformed runs are
/// skipped.
pub fn parse_attributes(input: &str) -> (Vec<RawAttr<'_>>, bool) {
    let bytes = input.as_bytes();
    let mut attrs = Vec::new();
    let mut inline = false;
    let mut pos = 0;

    while pos < bytes.len() {
        while pos < bytes.len() && is_whitespace(bytes[pos]) {
            pos += 1;
        }
        if pos >= bytes.len() {
            break;
        }

        // Standalone '/' is the inline-close signal
        if bytes[pos] == b'/'
            && (pos + 1 >= bytes.len() || is_whitespace(bytes[pos + 1]))
        {
            inline = true;
            pos += 1;
            continue;
        }

        // Name runs to the first '=' or whitespace
        let name_start = pos;
        while pos < bytes.len() && bytes[pos] != b'=' && !is_whitespace(bytes[pos]) {
            pos += 1;
        }
        let name = &input[name_start..pos];

        if pos >= bytes.len() || bytes[pos] != b'=' {
            // Bare token: presence-only attribute
            if !name.is_empty() {
                attrs.push(RawAttr::new(name, None));
            }
            continue;
        }

        pos += 1; // Skip '='

        if pos >= bytes.len() {
            if !name.is_empty() {
                attrs.push(RawAttr::new(name, Some("")));
            }
            break;
        }

        let value = match bytes[pos] {
            quote @ (b'"' | b'\'') => {
                let value_start = pos + 1;
                match input[value_start..].find(quote as char) {
                    Some(end) => {
                        pos = value_start + end + 1;
                        &input[value_start..value_start + end]
                    }
                    None => {
                        // Unterminated quote runs to end of blob
                        pos = bytes.len();
                        &input[value_start..]
                    }
                }
            }
            _ => {
                let value_start = pos;
                while pos < bytes.len() && !is_whitespace(bytes[pos]) {
                    pos += 1;
                }
                &input[value_start..pos]
            }
        };

        // A stray '=' with no name contributes nothing
        if !name.is_empty() {
            attrs.push(RawAttr::new(name, Some(value)));
        }
    }

    (attrs, inline)
}

/// Serialize an attribute list back to blob form
///
/// Inverse of [`parse_attributes`] for non-namespaced attribute maps:
/// `parse_attributes(&serialize_attributes(attrs)).0 == attrs`.
pub fn serialize_attributes(attrs: &[RawAttr<'_>]) -> String {
    let mut out = String::new();
    for attr in attrs {
        if !out.is_empty() {
            out.push(' ');
        }
        match attr.value {
            Some(v) => {
                out.push_str(attr.name);
                out.push_str("=\"");
                out.push_str(v);
                out.push('"');
            }
            None => out.push_str(attr.name),
        }
    }
    out
}
