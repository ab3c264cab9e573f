//! Marker-stream tree builder
//!
//! Consumes the tokenizer's marker stream and assembles nodes into a
//! document, tracking open elements on an explicit stack. Malformed input
//! never fails the build:
//!
//! - end markers with no matching open element are discarded
//! - elements left open at end of input are implicitly closed
//! - `dd`/`dt` elements are re-homed under the nearest open `dl`
//!
//! Comment, CDATA and doctype constructs arrive as synthesized
//! start/content/end triples carrying pseudo-names; the bracketing
//! markers arm and disarm a pending state and only the body marker
//! produces a node (none at all for doctypes).

use super::document::Document;
use super::node::NodeId;
use crate::core::entities::decode_text;
use crate::core::tokenizer::{
    Marker, MarkerKind, CDATA_NAME, COMMENT_NAME, DOCTYPE_NAME,
};

/// An open element awaiting its end marker
struct Frame {
    name: String,
    node: NodeId,
}

/// What the content of the current synthesized triple becomes
enum Pending {
    Comment,
    CData,
    Doctype,
}

pub struct Builder<'d> {
    doc: &'d mut Document,
    stack: Vec<Frame>,
    roots: Vec<NodeId>,
    pending: Option<Pending>,
}

impl<'d> Builder<'d> {
    pub fn new(doc: &'d mut Document) -> Self {
        Builder {
            doc,
            stack: Vec::new(),
            roots: Vec::new(),
            pending: None,
        }
    }

    /// Consume the marker stream and return the root-level nodes in
    /// document order. Roots come back detached; the caller parents them.
    pub fn run<'a, I>(mut self, markers: I) -> Vec<NodeId>
    where
        I: Iterator<Item = Marker<'a>>,
    {
        for marker in markers {
            match marker.kind {
                MarkerKind::Content => self.on_content(&marker),
                MarkerKind::Start => self.on_start(&marker),
                MarkerKind::End => self.on_end(&marker),
                MarkerKind::Inline => self.on_inline(&marker),
            }
        }
        if !self.stack.is_empty() {
            log::debug!(
                "implicitly closing {} unterminated element(s)",
                self.stack.len()
            );
        }
        self.roots
    }

    fn on_content(&mut self, marker: &Marker<'_>) {
        match self.pending {
            Some(Pending::Comment) => {
                let node = self.doc.create_comment(&decode_text(marker.text));
                self.insert(node, None);
            }
            Some(Pending::CData) => {
                // CDATA bodies are taken verbatim, no reference decoding
                let node = self.doc.create_text(marker.text);
                self.insert(node, None);
            }
            Some(Pending::Doctype) => {}
            None => {
                let node = self.doc.create_text(&decode_text(marker.text));
                self.insert(node, None);
            }
        }
    }

    fn on_start(&mut self, marker: &Marker<'_>) {
        let name = match marker.name {
            Some(n) => n,
            None => return,
        };
        if let Some(pending) = pseudo_pending(name) {
            self.pending = Some(pending);
            return;
        }
        // A list item implicitly closes any open sibling item
        if name.eq_ignore_ascii_case("li") {
            while self
                .stack
                .last()
                .map_or(false, |f| f.name.eq_ignore_ascii_case("li"))
            {
                log::debug!("implicitly closing open <li> before new <li>");
                self.stack.pop();
            }
        }
        let node = self.make_element(name, marker);
        self.insert(node, Some(name));
        self.stack.push(Frame {
            name: name.to_string(),
            node,
        });
    }

    fn on_inline(&mut self, marker: &Marker<'_>) {
        let name = match marker.name {
            Some(n) => n,
            None => return,
        };
        let node = self.make_element(name, marker);
        self.insert(node, Some(name));
    }

    fn on_end(&mut self, marker: &Marker<'_>) {
        let name = match marker.name {
            Some(n) => n,
            None => return,
        };
        if pseudo_pending(name).is_some() {
            self.pending = None;
            return;
        }
        // Match the nearest open element, implicitly closing anything
        // opened after it
        let found = self
            .stack
            .iter()
            .rposition(|f| f.name.eq_ignore_ascii_case(name));
        match found {
            Some(index) => self.stack.truncate(index),
            None => log::debug!("discarding unmatched end marker </{name}>"),
        }
    }

    fn make_element(&mut self, name: &str, marker: &Marker<'_>) -> NodeId {
        let node = match name.split_once(':') {
            Some((ns, local)) if !ns.is_empty() && !local.is_empty() => {
                self.doc.create_element_ns(ns, local)
            }
            _ => self.doc.create_element(name),
        };
        for attr in &marker.attrs {
            match attr.value {
                Some(value) => {
                    self.doc.set_attribute(node, attr.name, &decode_text(value))
                }
                None => self.doc.set_attribute_present(node, attr.name),
            }
        }
        node
    }

    /// Attach a node under the current open element, or collect it as a
    /// root. `dd` and `dt` are re-homed under the nearest open `dl`.
    fn insert(&mut self, node: NodeId, name: Option<&str>) {
        if let Some(name) = name {
            if name.eq_ignore_ascii_case("dd") || name.eq_ignore_ascii_case("dt") {
                if let Some(list) = self
                    .stack
                    .iter()
                    .rfind(|f| f.name.eq_ignore_ascii_case("dl"))
                {
                    let list = list.node;
                    log::debug!("re-homing <{name}> under nearest open <dl>");
                    self.doc.append_child(list, node);
                    return;
                }
            }
        }
        match self.stack.last() {
            Some(frame) => self.doc.append_child(frame.node, node),
            None => self.roots.push(node),
        }
    }
}

fn pseudo_pending(name: &str) -> Option<Pending> {
    match name {
        COMMENT_NAME => Some(Pending::Comment),
        CDATA_NAME => Some(Pending::CData),
        DOCTYPE_NAME => Some(Pending::Doctype),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::node::NodeKind;

    fn parse(input: &str) -> Document {
        Document::parse(input)
    }

    fn names(doc: &Document, id: NodeId) -> Vec<String> {
        doc.children(id)
            .iter()
            .filter_map(|&c| doc.node_name(c).map(str::to_string))
            .collect()
    }

    #[test]
    fn test_builds_nested_tree() {
        let doc = parse("<a><b>text</b><c/></a>");
        let root = doc.root();
        assert_eq!(names(&doc, root), vec!["a"]);
        let a = doc.children(root)[0];
        assert_eq!(names(&doc, a), vec!["b", "c"]);
        let b = doc.children(a)[0];
        assert_eq!(doc.text_content(b), "text");
    }

    #[test]
    fn test_unmatched_end_discarded() {
        let doc = parse("<a>x</b>y</a>");
        let root = doc.root();
        let a = doc.children(root)[0];
        assert_eq!(doc.text_content(a), "xy");
    }

    #[test]
    fn test_unterminated_elements_closed() {
        let doc = parse("<a><b>deep");
        let root = doc.root();
        let a = doc.children(root)[0];
        assert_eq!(names(&doc, a), vec!["b"]);
        assert_eq!(doc.text_content(a), "deep");
    }

    #[test]
    fn test_end_match_is_case_insensitive() {
        let doc = parse("<DIV>x</div><p>y</P>");
        let root = doc.root();
        assert_eq!(names(&doc, root), vec!["DIV", "p"]);
    }

    #[test]
    fn test_li_implicitly_closes_sibling() {
        let doc = parse("<ul><li>a<li>b</ul>");
        let root = doc.root();
        let ul = doc.children(root)[0];
        assert_eq!(names(&doc, ul), vec!["li", "li"]);
        assert_eq!(doc.text_content(doc.children(ul)[0]), "a");
        assert_eq!(doc.text_content(doc.children(ul)[1]), "b");
    }

    #[test]
    fn test_nested_list_items_keep_nesting() {
        let doc = parse("<ul><li>a<ul><li>b</li></ul></li></ul>");
        let root = doc.root();
        let outer = doc.children(root)[0];
        assert_eq!(names(&doc, outer), vec!["li"]);
        let li = doc.children(outer)[0];
        assert_eq!(names(&doc, li), vec!["#text", "ul"]);
    }

    #[test]
    fn test_dd_dt_rehomed_under_dl() {
        let doc = parse("<dl><div><dt>term</dt><dd>def</dd></div></dl>");
        let root = doc.root();
        let dl = doc.children(root)[0];
        assert_eq!(names(&doc, dl), vec!["div", "dt", "dd"]);
    }

    #[test]
    fn test_dd_without_dl_stays_put() {
        let doc = parse("<div><dd>def</dd></div>");
        let root = doc.root();
        let div = doc.children(root)[0];
        assert_eq!(names(&doc, div), vec!["dd"]);
    }

    #[test]
    fn test_comment_becomes_single_node() {
        let doc = parse("<a><!-- note --></a>");
        let root = doc.root();
        let a = doc.children(root)[0];
        assert_eq!(doc.children(a).len(), 1);
        let comment = doc.children(a)[0];
        assert_eq!(doc.kind(comment), Some(NodeKind::Comment));
        assert_eq!(doc.text_content(comment), " note ");
    }

    #[test]
    fn test_cdata_is_verbatim_text() {
        let doc = parse("<a><![CDATA[1 < 2 &amp; 3]]></a>");
        let root = doc.root();
        let a = doc.children(root)[0];
        let text = doc.children(a)[0];
        assert_eq!(doc.kind(text), Some(NodeKind::Text));
        assert_eq!(doc.text_content(text), "1 < 2 &amp; 3");
    }

    #[test]
    fn test_doctype_produces_no_node() {
        let doc = parse("<!DOCTYPE html>\n<html></html>");
        let root = doc.root();
        assert_eq!(names(&doc, root), vec!["html"]);
    }

    #[test]
    fn test_text_references_decoded() {
        let doc = parse("<a>1 &lt; 2 &amp; 3</a>");
        let root = doc.root();
        let a = doc.children(root)[0];
        assert_eq!(doc.text_content(a), "1 < 2 & 3");
    }

    #[test]
    fn test_attribute_values_decoded() {
        let doc = parse(r#"<a title="a &amp; b" disabled></a>"#);
        let root = doc.root();
        let a = doc.children(root)[0];
        assert_eq!(doc.get_attribute(a, "title"), Some("a & b"));
        assert!(doc.has_attribute(a, "disabled"));
        assert_eq!(doc.get_attribute(a, "disabled"), None);
    }

    #[test]
    fn test_namespaced_element() {
        let doc = parse("<svg:rect width=\"1\"/>");
        let root = doc.root();
        let rect = doc.children(root)[0];
        assert_eq!(doc.node_name(rect), Some("rect"));
        let element = doc.get(rect).unwrap().element().unwrap();
        assert_eq!(element.namespace.as_deref(), Some("svg"));
    }

    #[test]
    fn test_void_element_does_not_nest() {
        let doc = parse("<p><br>tail</p>");
        let root = doc.root();
        let p = doc.children(root)[0];
        assert_eq!(names(&doc, p), vec!["br", "#text"]);
        let br = doc.children(p)[0];
        assert!(doc.children(br).is_empty());
    }

    #[test]
    fn test_multiple_roots() {
        let doc = parse("<a/>between<b/>");
        let root = doc.root();
        assert_eq!(names(&doc, root), vec!["a", "#text", "b"]);
    }
}
