//! Markup tokenizer - lazily produced marker stream
//!
//! Scans raw markup into typed markers, each carrying its exact source
//! span:
//! - Content: a text run
//! - Start / End / Inline: tags
//! - Comment, CDATA and DOCTYPE are synthesized as Start/Content/End
//!   triples with the pseudo-names `--`, `!CDATA` and `!DOCTYPE`, so the
//!   tree builder treats them uniformly with ordinary tags
//!
//! Malformed markup never aborts the scan: a `<` that does not complete a
//! construct is folded into the surrounding Content run, so no input byte
//! is dropped and spans are strictly increasing.

use super::attributes::{parse_attributes, RawAttr};
use super::scanner::Scanner;
use std::collections::VecDeque;

/// Pseudo-name of synthesized comment markers
pub const COMMENT_NAME: &str = "--";
/// Pseudo-name of synthesized CDATA markers
pub const CDATA_NAME: &str = "!CDATA";
/// Pseudo-name of synthesized DOCTYPE markers
pub const DOCTYPE_NAME: &str = "!DOCTYPE";

/// HTML void elements: may never have children, always self-terminating
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link",
    "meta", "param", "source", "track", "wbr",
];

/// Check if a tag name is an HTML void element (ASCII case-insensitive)
pub fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS.iter().any(|v| name.eq_ignore_ascii_case(v))
}

/// Byte range of a marker in the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    #[inline]
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Kind of lexical marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    /// Text run
    Content,
    /// Opening tag
    Start,
    /// Closing tag
    End,
    /// Self-closing tag or void element
    Inline,
}

/// One lexical unit of markup plus its source span
#[derive(Debug, Clone)]
pub struct Marker<'a> {
    pub kind: MarkerKind,
    pub span: Span,
    /// Source text covered by the span
    pub text: &'a str,
    /// Tag name, qualified (`ns:local`) when prefixed; None for Content
    pub name: Option<&'a str>,
    /// Parsed attributes for Start/Inline tags
    pub attrs: Vec<RawAttr<'a>>,
}

impl<'a> Marker<'a> {
    fn new(kind: MarkerKind, span: Span, text: &'a str) -> Self {
        Marker {
            kind,
            span,
            text,
            name: None,
            attrs: Vec::new(),
        }
    }

    fn with_name(mut self, name: &'a str) -> Self {
        self.name = Some(name);
        self
    }

    fn with_attrs(mut self, attrs: Vec<RawAttr<'a>>) -> Self {
        self.attrs = attrs;
        self
    }
}

/// Pull tokenizer over a markup string
pub struct Tokenizer<'a> {
    input: &'a str,
    scanner: Scanner<'a>,
    pos: usize,
    pending: VecDeque<Marker<'a>>,
}

impl<'a> Tokenizer<'a> {
    /// Create a new tokenizer for the given input
    pub fn new(input: &'a str) -> Self {
        Tokenizer {
            input,
            scanner: Scanner::new(input.as_bytes()),
            pos: 0,
            pending: VecDeque::new(),
        }
    }

    fn slice(&self, span: Span) -> &'a str {
        &self.input[span.start..span.end]
    }

    fn content(&self, start: usize, end: usize) -> Marker<'a> {
        let span = Span::new(start, end);
        Marker::new(MarkerKind::Content, span, self.slice(span))
    }

    /// Try to scan one markup construct starting at the `<` at `lt`.
    ///
    /// On success, queues any trailing markers and returns the first one
    /// plus the position just past the construct. Returns None when the
    /// `<` does not open a recognized construct.
    fn scan_markup(&mut self, lt: usize) -> Option<(Marker<'a>, usize)> {
        if self.scanner.starts_with_at(lt, b"<!--") {
            return self.scan_bracketed(lt, 4, b"-->", COMMENT_NAME);
        }
        if self.scanner.starts_with_at(lt, b"<![CDATA[") {
            return self.scan_bracketed(lt, 9, b"]]>", CDATA_NAME);
        }
        if self.scanner.starts_with_at(lt, b"<!DOCTYPE") {
            return self.scan_doctype(lt);
        }
        self.scan_tag(lt)
    }

    /// Comment and CDATA share one shape: opener, non-greedy body, closer
    fn scan_bracketed(
        &mut self,
        lt: usize,
        open_len: usize,
        closer: &[u8],
        name: &'a str,
    ) -> Option<(Marker<'a>, usize)> {
        let body_start = lt + open_len;
        let close = self.scanner.find_sub_from(body_start, closer)?;
        let end = close + closer.len();

        let start_span = Span::new(lt, body_start);
        let start = Marker::new(MarkerKind::Start, start_span, self.slice(start_span))
            .with_name(name);
        // The body Content is always emitted, even when empty
        self.pending.push_back(self.content(body_start, close));
        let end_span = Span::new(close, end);
        self.pending.push_back(
            Marker::new(MarkerKind::End, end_span, self.slice(end_span)).with_name(name),
        );
        Some((start, end))
    }

    /// DOCTYPE: `<!DOCTYPE` ... `>` followed by a line terminator
    fn scan_doctype(&mut self, lt: usize) -> Option<(Marker<'a>, usize)> {
        let after = lt + DOCTYPE_NAME.len() + 1; // past "<!DOCTYPE"
        let gt = self.scanner.find_byte_from(after, b'>')?;
        let end = match self.scanner.byte_at(gt + 1) {
            Some(b'\n') => gt + 2,
            Some(b'\r') if self.scanner.byte_at(gt + 2) == Some(b'\n') => gt + 3,
            _ => return None,
        };

        let body_start = self.scanner.skip_whitespace_at(after);
        let start_span = Span::new(lt, after);
        let start = Marker::new(MarkerKind::Start, start_span, self.slice(start_span))
            .with_name(DOCTYPE_NAME);
        self.pending.push_back(self.content(body_start.min(gt), gt));
        let end_span = Span::new(gt, end);
        self.pending.push_back(
            Marker::new(MarkerKind::End, end_span, self.slice(end_span))
                .with_name(DOCTYPE_NAME),
        );
        Some((start, end))
    }

    /// Ordinary tag: `<` optional `/`, qualified name, attribute blob, `>`
    fn scan_tag(&mut self, lt: usize) -> Option<(Marker<'a>, usize)> {
        let mut pos = lt + 1;
        let closing = self.scanner.byte_at(pos) == Some(b'/');
        if closing {
            pos += 1;
        }

        let name_start = pos;
        let mut name_end = self.scanner.read_name_at(pos)?;
        // Qualified name: one optional `ns:` prefix
        if self.scanner.byte_at(name_end) == Some(b':') {
            name_end = self.scanner.read_name_at(name_end + 1)?;
        }
        let name = &self.input[name_start..name_end];

        let gt = self.scanner.find_tag_end_quoted(name_end)?;
        let blob = &self.input[name_end..gt];
        let (attrs, inline_slash) = parse_attributes(blob);

        let kind = if closing {
            MarkerKind::End
        } else if inline_slash || is_void_element(name) {
            MarkerKind::Inline
        } else {
            MarkerKind::Start
        };

        let span = Span::new(lt, gt + 1);
        let marker = Marker::new(kind, span, self.slice(span))
            .with_name(name)
            .with_attrs(attrs);
        Some((marker, gt + 1))
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Marker<'a>;

    fn next(&mut self) -> Option<Marker<'a>> {
        if let Some(m) = self.pending.pop_front() {
            return Some(m);
        }

        let start = self.pos;
        let mut search = self.pos;
        loop {
            let lt = match self.scanner.find_byte_from(search, b'<') {
                Some(lt) => lt,
                None => {
                    // Trailing text run
                    self.pos = self.scanner.len();
                    if start < self.pos {
                        return Some(self.content(start, self.pos));
                    }
                    return None;
                }
            };

            match self.scan_markup(lt) {
                Some((marker, end)) => {
                    self.pos = end;
                    if lt > start {
                        // Unmatched text before the construct comes first
                        self.pending.push_front(marker);
                        return Some(self.content(start, lt));
                    }
                    return Some(marker);
                }
                None => {
                    // Stray '<': fold into the surrounding Content run
                    search = lt + 1;
                }
            }
        }
    }
}
