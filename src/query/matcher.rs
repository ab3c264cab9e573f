//! Selector evaluation
//!
//! Matches compiled queries against the tree. Descendant groups narrow a
//! candidate set level by level; results come back deduplicated in
//! document order. Attribute selectors test presence only, so `[x="v"]`
//! and `[x]` are equivalent here.

use super::parser::{Query, Simple};
use crate::dom::document::Document;
use crate::dom::node::NodeId;
use std::collections::HashSet;

fn matches_compound(doc: &Document, id: NodeId, group: &[Simple]) -> bool {
    if doc.get(id).map_or(true, |n| !n.is_element()) {
        return false;
    }
    group.iter().all(|simple| match simple {
        Simple::Tag(tag) => doc
            .node_name(id)
            .map_or(false, |n| n.eq_ignore_ascii_case(tag)),
        Simple::Class(token) => doc.has_class(id, token),
        Simple::Id(value) => doc.get_attribute(id, "id") == Some(value.as_str()),
        Simple::Attr(name) => doc.has_attribute(id, name),
        Simple::Unsupported => false,
    })
}

/// All elements under `scope` matching the query, deduplicated in
/// document order. `scope` itself is never a result.
pub fn query_all(doc: &Document, scope: NodeId, query: &Query) -> Vec<NodeId> {
    let mut contexts = vec![scope];
    for group in &query.groups {
        let mut next = Vec::new();
        let mut seen = HashSet::new();
        // Contexts are already in document order, so nested contexts
        // re-yield nodes an earlier traversal produced first; the seen
        // set keeps the first occurrence only
        for &context in &contexts {
            for candidate in doc.descendants(context) {
                if matches_compound(doc, candidate, group) && seen.insert(candidate) {
                    next.push(candidate);
                }
            }
        }
        if next.is_empty() {
            return Vec::new();
        }
        contexts = next;
    }
    contexts
}

/// Whether `id` matches the query: the last group must hold on the node
/// itself, and each earlier group on some proper ancestor, nearest-first
/// in order.
pub fn matches(doc: &Document, id: NodeId, query: &Query) -> bool {
    let (last, rest) = match query.groups.split_last() {
        Some(split) => split,
        None => return false,
    };
    if !matches_compound(doc, id, last) {
        return false;
    }
    let mut current = id;
    for group in rest.iter().rev() {
        let mut found = None;
        let mut ancestor = doc.parent(current);
        while let Some(a) = ancestor {
            if matches_compound(doc, a, group) {
                found = Some(a);
                break;
            }
            ancestor = doc.parent(a);
        }
        match found {
            Some(a) => current = a,
            None => return false,
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::super::parser::parse;
    use super::*;

    fn doc() -> Document {
        Document::parse(concat!(
            r#"<div id="top" class="outer">"#,
            r#"<ul class="menu"><li class="item">1</li><li class="item active">2</li></ul>"#,
            r#"<p data-note>text</p>"#,
            "</div>",
        ))
    }

    fn names(doc: &Document, ids: &[NodeId]) -> Vec<String> {
        ids.iter()
            .map(|&id| doc.text_content(id))
            .collect()
    }

    #[test]
    fn test_tag_query() {
        let d = doc();
        let q = parse("li").unwrap();
        let hits = query_all(&d, d.root(), &q);
        assert_eq!(names(&d, &hits), vec!["1", "2"]);
    }

    #[test]
    fn test_tag_case_insensitive() {
        let d = doc();
        let q = parse("LI").unwrap();
        assert_eq!(query_all(&d, d.root(), &q).len(), 2);
    }

    #[test]
    fn test_class_and_compound() {
        let d = doc();
        let q = parse("li.active").unwrap();
        let hits = query_all(&d, d.root(), &q);
        assert_eq!(names(&d, &hits), vec!["2"]);
    }

    #[test]
    fn test_id_query() {
        let d = doc();
        let q = parse("#top").unwrap();
        assert_eq!(query_all(&d, d.root(), &q).len(), 1);
    }

    #[test]
    fn test_attr_presence_only() {
        let d = doc();
        let q = parse("[data-note]").unwrap();
        let hits = query_all(&d, d.root(), &q);
        assert_eq!(names(&d, &hits), vec!["text"]);
        // Value operators degrade to presence
        let q = parse(r#"[data-note="whatever"]"#).unwrap();
        assert_eq!(query_all(&d, d.root(), &q).len(), 1);
    }

    #[test]
    fn test_descendant_chain() {
        let d = doc();
        let q = parse("div ul .item").unwrap();
        assert_eq!(query_all(&d, d.root(), &q).len(), 2);
        let q = parse("p .item").unwrap();
        assert!(query_all(&d, d.root(), &q).is_empty());
    }

    #[test]
    fn test_no_duplicates_in_document_order() {
        let d = Document::parse("<div><div><span>a</span></div><span>b</span></div>");
        let q = parse("div span").unwrap();
        // Both divs are contexts for the inner span; it must appear once
        let hits = query_all(&d, d.root(), &q);
        assert_eq!(names(&d, &hits), vec!["a", "b"]);
    }

    #[test]
    fn test_scope_excluded() {
        let d = doc();
        let q = parse("div").unwrap();
        let top = d.element_by_id("top").unwrap();
        assert!(query_all(&d, top, &q).is_empty());
    }

    #[test]
    fn test_pseudo_class_matches_nothing() {
        let d = doc();
        let q = parse("li:first-child").unwrap();
        assert!(query_all(&d, d.root(), &q).is_empty());
    }

    #[test]
    fn test_matches_node() {
        let d = doc();
        let li = d.query_selector(d.root(), "li.active").unwrap().unwrap();
        assert!(matches(&d, li, &parse("li").unwrap()));
        assert!(matches(&d, li, &parse("ul li").unwrap()));
        assert!(matches(&d, li, &parse("#top .menu li").unwrap()));
        assert!(!matches(&d, li, &parse("p li").unwrap()));
        assert!(!matches(&d, li, &parse("li ul").unwrap()));
    }
}
