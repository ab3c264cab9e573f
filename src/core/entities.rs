//! Character reference decoding and output escaping
//!
//! Decoding handles the named references `amp lt gt quot apos` and decimal
//! numeric references (`&#65;`). Anything unrecognized is left verbatim:
//! decoding never fails, it degrades to pass-through. Uses Cow for
//! zero-copy when no references are present.

use memchr::memchr;
use std::borrow::Cow;

/// Decode character references in text
///
/// Returns Borrowed if no references are present (zero-copy), Owned if any
/// reference was expanded. A single left-to-right scan; already expanded
/// text is never re-decoded.
pub fn decode_text(input: &str) -> Cow<'_, str> {
    if memchr(b'&', input.as_bytes()).is_none() {
        return Cow::Borrowed(input);
    }
    Cow::Owned(decode_references(input))
}

/// Decode all character references in the input
fn decode_references(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut result = String::with_capacity(input.len());
    let mut pos = 0;

    while pos < bytes.len() {
        let amp = match memchr(b'&', &bytes[pos..]) {
            Some(i) => pos + i,
            None => {
                result.push_str(&input[pos..]);
                break;
            }
        };
        result.push_str(&input[pos..amp]);

        match memchr(b';', &bytes[amp..]) {
            Some(offset) => {
                let semi = amp + offset;
                let body = &input[amp + 1..semi];
                match decode_reference(body) {
                    Some(c) => {
                        result.push(c);
                        pos = semi + 1;
                    }
                    None => {
                        // Unrecognized reference, keep verbatim
                        result.push('&');
                        pos = amp + 1;
                    }
                }
            }
            None => {
                // No terminating semicolon, keep the ampersand
                result.push('&');
                pos = amp + 1;
            }
        }
    }

    result
}

/// Decode a single reference body (between `&` and `;`)
fn decode_reference(body: &str) -> Option<char> {
    let rest = body.strip_prefix('#');
    if let Some(digits) = rest {
        // Numeric reference, decimal only
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let code: u32 = digits.parse().ok()?;
        if code > 0x10FFFF {
            return None;
        }
        // Surrogate code points fail here and stay verbatim
        return char::from_u32(code);
    }

    // Named reference, ASCII case-insensitive
    if body.eq_ignore_ascii_case("amp") {
        Some('&')
    } else if body.eq_ignore_ascii_case("lt") {
        Some('<')
    } else if body.eq_ignore_ascii_case("gt") {
        Some('>')
    } else if body.eq_ignore_ascii_case("quot") {
        Some('"')
    } else if body.eq_ignore_ascii_case("apos") {
        Some('\'')
    } else {
        None
    }
}

/// Escape text content for markup output (`&`, `<`, `>`)
pub fn escape_text(input: &str) -> Cow<'_, str> {
    if !input.bytes().any(|b| matches!(b, b'&' | b'<' | b'>')) {
        return Cow::Borrowed(input);
    }

    let mut result = String::with_capacity(input.len() + 16);
    for c in input.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    Cow::Owned(result)
}

/// Escape comment bodies: only `>` must be neutralized
pub fn escape_comment(input: &str) -> Cow<'_, str> {
    if memchr(b'>', input.as_bytes()).is_none() {
        return Cow::Borrowed(input);
    }
    Cow::Owned(input.replace('>', "&gt;"))
}
