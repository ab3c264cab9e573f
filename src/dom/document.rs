//! Arena-based document
//!
//! The Document owns every node in a flat arena and hands out NodeId
//! indices. Child lists are the authoritative document order; the parent
//! link is a plain back-index. Detached nodes stay in the arena until the
//! Document is dropped.
//!
//! Mutation operations are total: calls referencing a node that is not
//! currently a child of the target are silent no-ops.

use super::builder::Builder;
use super::node::{Attr, ElementData, Node, NodeData, NodeId, NodeKind};
use super::serialize::{SerializeOptions, Serializer, TextFragments};
use crate::core::tokenizer::Tokenizer;
use crate::query::{self, Query};
use lru::LruCache;
use std::cell::RefCell;
use std::num::NonZeroUsize;

/// Compiled selector queries kept per document
const SELECTOR_CACHE_SIZE: usize = 64;

/// A document: arena of nodes plus the element registry
pub struct Document {
    nodes: Vec<Node>,
    /// Every element ever created through this document, in creation
    /// order. Never pruned, so `element_by_id` can find detached
    /// elements too.
    elements: Vec<NodeId>,
    /// Compiled selector cache, keyed by query text
    selector_cache: RefCell<LruCache<String, Query>>,
}

impl Document {
    /// Create an empty document
    pub fn new() -> Self {
        let mut doc = Document {
            nodes: Vec::with_capacity(64),
            elements: Vec::new(),
            selector_cache: RefCell::new(LruCache::new(
                NonZeroUsize::new(SELECTOR_CACHE_SIZE).expect("cache size is non-zero"),
            )),
        };
        doc.nodes.push(Node::new("#document", NodeData::Document));
        doc
    }

    /// Parse markup into a new document (never fails; best-effort tree)
    pub fn parse(input: &str) -> Self {
        let mut doc = Document::new();
        let root = doc.root();
        let roots = Builder::new(&mut doc).run(Tokenizer::new(input));
        for node in roots {
            doc.append_child(root, node);
        }
        doc
    }

    /// The document node (always present)
    #[inline]
    pub fn root(&self) -> NodeId {
        0
    }

    /// Get a node by id
    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id as usize)
    }

    /// Total number of nodes in the arena, detached ones included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn push_node(&mut self, node: Node) -> NodeId {
        let id = self.nodes.len() as NodeId;
        let is_element = node.is_element();
        self.nodes.push(node);
        if is_element {
            self.elements.push(id);
        }
        id
    }

    // ========================================================================
    // Factories
    // ========================================================================

    /// Create an element
    pub fn create_element(&mut self, name: &str) -> NodeId {
        self.push_node(Node::new(name, NodeData::Element(ElementData::default())))
    }

    /// Create an element with a namespace prefix
    pub fn create_element_ns(&mut self, namespace: &str, name: &str) -> NodeId {
        let mut data = ElementData::default();
        data.namespace = Some(namespace.to_string());
        self.push_node(Node::new(name, NodeData::Element(data)))
    }

    /// Create a text node
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push_node(Node::new(
            "#text",
            NodeData::Text {
                text: text.to_string(),
            },
        ))
    }

    /// Create a comment node
    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.push_node(Node::new(
            "#comment",
            NodeData::Comment {
                text: text.to_string(),
            },
        ))
    }

    /// Create a document fragment
    pub fn create_fragment(&mut self) -> NodeId {
        self.push_node(Node::new("#fragment", NodeData::Fragment))
    }

    /// Create a standalone attribute node
    pub fn create_attribute(&mut self, name: &str, value: &str) -> NodeId {
        self.push_node(Node::new(
            name,
            NodeData::Attribute {
                value: value.to_string(),
            },
        ))
    }

    // ========================================================================
    // Read-only surface
    // ========================================================================

    /// Node name as stored (tag name, `#text`, ...)
    pub fn node_name(&self, id: NodeId) -> Option<&str> {
        self.get(id).map(|n| n.name.as_str())
    }

    /// Lower-cased node name
    pub fn node_name_lower(&self, id: NodeId) -> Option<String> {
        self.get(id).map(|n| n.name.to_ascii_lowercase())
    }

    /// Node kind
    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.get(id).map(|n| n.kind())
    }

    /// Parent of a node, None while detached
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Ordered child list
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// First child
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).first().copied()
    }

    /// Last child
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).last().copied()
    }

    fn sibling_at(&self, id: NodeId, offset: isize) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let siblings = self.children(parent);
        let index = siblings.iter().position(|&c| c == id)? as isize + offset;
        if index < 0 {
            return None;
        }
        siblings.get(index as usize).copied()
    }

    /// Next sibling in the parent's child list
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.sibling_at(id, 1)
    }

    /// Previous sibling in the parent's child list
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.sibling_at(id, -1)
    }

    /// Walk parent links to the topmost node
    pub fn get_root_node(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current
    }

    /// Concatenated textual payload of a subtree
    pub fn text_content(&self, id: NodeId) -> String {
        match self.get(id) {
            None => String::new(),
            Some(node) => {
                if node.children.is_empty() {
                    node.payload().unwrap_or("").to_string()
                } else {
                    node.children
                        .iter()
                        .map(|&c| self.text_content(c))
                        .collect()
                }
            }
        }
    }

    /// Iterate over all descendants in document order (depth-first)
    pub fn descendants(&self, id: NodeId) -> DescendantIter<'_> {
        let mut stack: Vec<NodeId> = self.children(id).to_vec();
        stack.reverse();
        DescendantIter { doc: self, stack }
    }

    /// Walk descendants, keeping only kinds selected by the NodeFilter mask
    pub fn tree_walker(&self, id: NodeId, mask: u32) -> TreeWalker<'_> {
        TreeWalker {
            inner: self.descendants(id),
            mask,
        }
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Remove a node from its parent's child list and clear the back-link
    pub fn detach(&mut self, id: NodeId) {
        let parent = match self.get(id).and_then(|n| n.parent) {
            Some(p) => p,
            None => return,
        };
        if let Some(parent_node) = self.nodes.get_mut(parent as usize) {
            parent_node.children.retain(|&c| c != id);
        }
        if let Some(node) = self.nodes.get_mut(id as usize) {
            node.parent = None;
        }
    }

    /// Append a child, detaching it from any current parent first.
    ///
    /// Appending a fragment splices its children in order and leaves the
    /// fragment empty; the fragment node itself is never inserted.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if parent == child || self.get(parent).is_none() || self.get(child).is_none() {
            return;
        }
        if self.kind(child) == Some(NodeKind::Fragment) {
            let kids = std::mem::take(&mut self.nodes[child as usize].children);
            for &k in &kids {
                self.nodes[k as usize].parent = Some(parent);
            }
            self.nodes[parent as usize].children.extend(kids);
            return;
        }
        self.detach(child);
        self.nodes[child as usize].parent = Some(parent);
        self.nodes[parent as usize].children.push(child);
    }

    /// Insert `new` immediately before `reference`; no-op when
    /// `reference` is not currently a child of `parent`. Fragments splice.
    pub fn insert_before(&mut self, parent: NodeId, new: NodeId, reference: NodeId) {
        if new == reference || self.get(parent).is_none() || self.get(new).is_none() {
            return;
        }
        if !self.children(parent).contains(&reference) {
            return;
        }
        if self.kind(new) == Some(NodeKind::Fragment) {
            let kids = std::mem::take(&mut self.nodes[new as usize].children);
            for &k in &kids {
                self.nodes[k as usize].parent = Some(parent);
            }
            let pos = self.nodes[parent as usize]
                .children
                .iter()
                .position(|&c| c == reference)
                .unwrap_or(0);
            self.nodes[parent as usize].children.splice(pos..pos, kids);
            return;
        }
        self.detach(new);
        // Position may have shifted if `new` was an earlier sibling
        if let Some(pos) = self.nodes[parent as usize]
            .children
            .iter()
            .position(|&c| c == reference)
        {
            self.nodes[new as usize].parent = Some(parent);
            self.nodes[parent as usize].children.insert(pos, new);
        }
    }

    /// Remove a child; no-op when it is not currently a child of `parent`
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        if self.parent(child) == Some(parent) {
            self.detach(child);
        }
    }

    /// Replace `old` with `new` in place; no-op when `old` is not
    /// currently a child of `parent`
    pub fn replace_child(&mut self, parent: NodeId, new: NodeId, old: NodeId) {
        if new == old || self.get(new).is_none() {
            return;
        }
        if self.parent(old) != Some(parent) {
            return;
        }
        self.detach(new);
        if let Some(pos) = self.nodes[parent as usize]
            .children
            .iter()
            .position(|&c| c == old)
        {
            self.nodes[old as usize].parent = None;
            self.nodes[new as usize].parent = Some(parent);
            self.nodes[parent as usize].children[pos] = new;
        }
    }

    /// Insert `new` as the sibling immediately before `node`
    pub fn before(&mut self, node: NodeId, new: NodeId) {
        if let Some(parent) = self.parent(node) {
            self.insert_before(parent, new, node);
        }
    }

    /// Insert `new` as the sibling immediately after `node`
    pub fn after(&mut self, node: NodeId, new: NodeId) {
        let parent = match self.parent(node) {
            Some(p) => p,
            None => return,
        };
        match self.next_sibling(node) {
            Some(next) => self.insert_before(parent, new, next),
            None => self.append_child(parent, new),
        }
    }

    /// Clone a node. A shallow clone copies name, payload and attributes
    /// with an empty child list; a deep clone recursively clones and
    /// re-parents children. Clone and source never alias nodes.
    pub fn clone_node(&mut self, id: NodeId, deep: bool) -> Option<NodeId> {
        let source = self.get(id)?;
        let copy = Node {
            name: source.name.clone(),
            parent: None,
            children: Vec::new(),
            data: source.data.clone(),
        };
        let new_id = self.push_node(copy);
        if deep {
            let kids = self.get(id)?.children.clone();
            for kid in kids {
                if let Some(cloned) = self.clone_node(kid, true) {
                    self.nodes[cloned as usize].parent = Some(new_id);
                    self.nodes[new_id as usize].children.push(cloned);
                }
            }
        }
        Some(new_id)
    }

    // ========================================================================
    // Attributes
    // ========================================================================

    /// Set a string-valued attribute (replaces in place when present)
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(element) = self.element_mut(id) {
            element.set_attr(name, Some(value.to_string()));
        }
    }

    /// Set a presence-only (boolean) attribute
    pub fn set_attribute_present(&mut self, id: NodeId, name: &str) {
        if let Some(element) = self.element_mut(id) {
            element.set_attr(name, None);
        }
    }

    /// Get an attribute value; presence-only attributes read as None
    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.get(id)?.element()?.attr(name)?.value.as_deref()
    }

    /// Check attribute presence (covers presence-only attributes)
    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.get(id)
            .and_then(|n| n.element())
            .map_or(false, |e| e.attr(name).is_some())
    }

    /// Remove an attribute. Removing `style` also clears the structured
    /// style map.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) {
        if let Some(element) = self.element_mut(id) {
            element.remove_attr(name);
            if name == "style" {
                element.style.clear();
            }
        }
    }

    /// Set a namespaced attribute
    pub fn set_attribute_ns(&mut self, id: NodeId, ns: &str, name: &str, value: &str) {
        if let Some(element) = self.element_mut(id) {
            element.set_attr_ns(ns, name, Some(value.to_string()));
        }
    }

    /// Get a namespaced attribute value
    pub fn get_attribute_ns(&self, id: NodeId, ns: &str, name: &str) -> Option<&str> {
        self.get(id)?.element()?.attr_ns(ns, name)?.value.as_deref()
    }

    /// Ordered attribute list of an element
    pub fn attributes(&self, id: NodeId) -> &[Attr] {
        self.get(id)
            .and_then(|n| n.element())
            .map(|e| e.attrs.as_slice())
            .unwrap_or(&[])
    }

    /// Explicit accessor over `data-*` attributes: `data_attr(id, "x")`
    /// reads `data-x`
    pub fn data_attr(&self, id: NodeId, name: &str) -> Option<&str> {
        let key = format!("data-{name}");
        self.get(id)?.element()?.attr(&key)?.value.as_deref()
    }

    /// Set a structured style entry, merged into the literal `style`
    /// attribute at serialization time
    pub fn set_style(&mut self, id: NodeId, property: &str, value: &str) {
        if let Some(element) = self.element_mut(id) {
            match element.style.iter_mut().find(|(p, _)| p == property) {
                Some(slot) => slot.1 = value.to_string(),
                None => element.style.push((property.to_string(), value.to_string())),
            }
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.nodes.get_mut(id as usize).and_then(|n| n.element_mut())
    }

    // ========================================================================
    // Class tokens
    // ========================================================================

    /// Check membership in the `class` token list
    pub fn has_class(&self, id: NodeId, token: &str) -> bool {
        self.get_attribute(id, "class")
            .map_or(false, |v| v.split_whitespace().any(|t| t == token))
    }

    /// Add a token to the `class` attribute (no-op when present)
    pub fn add_class(&mut self, id: NodeId, token: &str) {
        if self.has_class(id, token) {
            return;
        }
        let current = self.get_attribute(id, "class").unwrap_or("");
        let merged = if current.is_empty() {
            token.to_string()
        } else {
            format!("{current} {token}")
        };
        self.set_attribute(id, "class", &merged);
    }

    /// Remove a token from the `class` attribute
    pub fn remove_class(&mut self, id: NodeId, token: &str) {
        let current = match self.get_attribute(id, "class") {
            Some(v) => v,
            None => return,
        };
        let filtered = current
            .split_whitespace()
            .filter(|t| *t != token)
            .collect::<Vec<_>>()
            .join(" ");
        self.set_attribute(id, "class", &filtered);
    }

    /// Toggle a token; returns whether it is present afterwards
    pub fn toggle_class(&mut self, id: NodeId, token: &str) -> bool {
        if self.has_class(id, token) {
            self.remove_class(id, token);
            false
        } else {
            self.add_class(id, token);
            true
        }
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// Find an element by its `id` attribute.
    ///
    /// Searches the creation registry, so detached elements are found too
    /// (the registry is append-only and never pruned).
    pub fn element_by_id(&self, value: &str) -> Option<NodeId> {
        self.elements
            .iter()
            .copied()
            .find(|&e| self.get_attribute(e, "id") == Some(value))
    }

    // ========================================================================
    // Selector queries
    // ========================================================================

    fn compiled_query(&self, selector: &str) -> Result<Query, String> {
        let mut cache = self.selector_cache.borrow_mut();
        if let Some(query) = cache.get(selector) {
            return Ok(query.clone());
        }
        let query = query::parse(selector)?;
        cache.put(selector.to_string(), query.clone());
        Ok(query)
    }

    /// All descendants of `scope` matching the selector, in document
    /// order without duplicates
    pub fn query_selector_all(
        &self,
        scope: NodeId,
        selector: &str,
    ) -> Result<Vec<NodeId>, String> {
        let query = self.compiled_query(selector)?;
        Ok(query::query_all(self, scope, &query))
    }

    /// First descendant of `scope` matching the selector
    pub fn query_selector(
        &self,
        scope: NodeId,
        selector: &str,
    ) -> Result<Option<NodeId>, String> {
        let query = self.compiled_query(selector)?;
        Ok(query::query_all(self, scope, &query).into_iter().next())
    }

    /// Check whether a node matches the selector
    pub fn matches(&self, id: NodeId, selector: &str) -> Result<bool, String> {
        let query = self.compiled_query(selector)?;
        Ok(query::matches(self, id, &query))
    }

    // ========================================================================
    // Serialization
    // ========================================================================

    /// Lazily serialize a subtree into output fragments
    pub fn fragments(&self, id: NodeId, options: SerializeOptions) -> Serializer<'_> {
        Serializer::new(self, id, options)
    }

    /// Serialize a subtree with explicit options
    pub fn to_string_with(&self, id: NodeId, options: SerializeOptions) -> String {
        self.fragments(id, options).collect()
    }

    /// Serialize a subtree as XML with default options
    pub fn to_xml(&self, id: NodeId) -> String {
        self.to_string_with(id, SerializeOptions::default())
    }

    /// Serialize a subtree as HTML (void-element aware)
    pub fn to_html(&self, id: NodeId) -> String {
        self.to_string_with(
            id,
            SerializeOptions {
                html: true,
                ..SerializeOptions::default()
            },
        )
    }

    /// Lazily iterate text-node payloads of a subtree in document order
    pub fn text_fragments(&self, id: NodeId) -> TextFragments<'_> {
        TextFragments::new(self, id)
    }

    /// Concatenated text-node payloads of a subtree
    pub fn inner_text(&self, id: NodeId) -> String {
        self.text_fragments(id).collect()
    }
}

impl Default for Document {
    fn default() -> Self {
        Document::new()
    }
}

/// Iterator over descendant nodes (depth-first, document order)
pub struct DescendantIter<'d> {
    doc: &'d Document,
    stack: Vec<NodeId>,
}

impl<'d> Iterator for DescendantIter<'d> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.stack.pop()?;
        // Push children in reverse so the first child is processed first
        let children = self.doc.children(current);
        for &child in children.iter().rev() {
            self.stack.push(child);
        }
        Some(current)
    }
}

/// NodeFilter bitmask constants for [`TreeWalker`]
pub struct NodeFilter;

impl NodeFilter {
    pub const SHOW_ALL: u32 = 0xFFFF_FFFF;
    pub const SHOW_ELEMENT: u32 = 0x1;
    pub const SHOW_ATTRIBUTE: u32 = 0x2;
    pub const SHOW_TEXT: u32 = 0x4;
    pub const SHOW_COMMENT: u32 = 0x80;
    pub const SHOW_DOCUMENT: u32 = 0x100;
    pub const SHOW_DOCUMENT_FRAGMENT: u32 = 0x400;
}

/// Document-order walker filtered by a NodeFilter bitmask
pub struct TreeWalker<'d> {
    inner: DescendantIter<'d>,
    mask: u32,
}

impl<'d> TreeWalker<'d> {
    fn accepts(&self, kind: NodeKind) -> bool {
        let bit = match kind {
            NodeKind::Element => NodeFilter::SHOW_ELEMENT,
            NodeKind::Attribute => NodeFilter::SHOW_ATTRIBUTE,
            NodeKind::Text => NodeFilter::SHOW_TEXT,
            NodeKind::Comment => NodeFilter::SHOW_COMMENT,
            NodeKind::Document => NodeFilter::SHOW_DOCUMENT,
            NodeKind::Fragment => NodeFilter::SHOW_DOCUMENT_FRAGMENT,
        };
        self.mask & bit != 0
    }
}

impl<'d> Iterator for TreeWalker<'d> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        loop {
            let id = self.inner.next()?;
            if let Some(kind) = self.inner.doc.kind(id) {
                if self.accepts(kind) {
                    return Some(id);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every child's parent link must point at the list containing it,
    /// and no node may appear in two child lists
    fn assert_tree_consistent(doc: &Document) {
        let mut seen = std::collections::HashSet::new();
        for id in 0..doc.node_count() as NodeId {
            for &child in doc.children(id) {
                assert!(seen.insert(child), "node {child} in two child lists");
                assert_eq!(doc.parent(child), Some(id));
            }
        }
    }

    #[test]
    fn test_append_detaches_first() {
        let mut doc = Document::new();
        let a = doc.create_element("a");
        let b = doc.create_element("b");
        let x = doc.create_text("x");
        doc.append_child(a, x);
        doc.append_child(b, x);
        assert_eq!(doc.children(a), &[] as &[NodeId]);
        assert_eq!(doc.children(b), &[x]);
        assert_eq!(doc.parent(x), Some(b));
        assert_tree_consistent(&doc);
    }

    #[test]
    fn test_fragment_splices() {
        let mut doc = Document::new();
        let target = doc.create_element("div");
        let frag = doc.create_fragment();
        let a = doc.create_element("a");
        let b = doc.create_element("b");
        doc.append_child(frag, a);
        doc.append_child(frag, b);
        doc.append_child(target, frag);
        assert_eq!(doc.children(target), &[a, b]);
        assert!(doc.children(frag).is_empty());
        assert_eq!(doc.parent(a), Some(target));
        assert_tree_consistent(&doc);
    }

    #[test]
    fn test_fragment_splices_on_insert_before() {
        let mut doc = Document::new();
        let target = doc.create_element("div");
        let anchor = doc.create_element("z");
        doc.append_child(target, anchor);
        let frag = doc.create_fragment();
        let a = doc.create_element("a");
        doc.append_child(frag, a);
        doc.insert_before(target, frag, anchor);
        assert_eq!(doc.children(target), &[a, anchor]);
        assert!(doc.children(frag).is_empty());
        assert_tree_consistent(&doc);
    }

    #[test]
    fn test_insert_before_noop_for_non_child() {
        let mut doc = Document::new();
        let parent = doc.create_element("p");
        let stranger = doc.create_element("s");
        let new = doc.create_element("n");
        doc.insert_before(parent, new, stranger);
        assert!(doc.children(parent).is_empty());
        assert_eq!(doc.parent(new), None);
    }

    #[test]
    fn test_insert_before_earlier_sibling() {
        let mut doc = Document::new();
        let parent = doc.create_element("p");
        let a = doc.create_element("a");
        let b = doc.create_element("b");
        let c = doc.create_element("c");
        doc.append_child(parent, a);
        doc.append_child(parent, b);
        doc.append_child(parent, c);
        // Move a before c: the reference index shifts after detach
        doc.insert_before(parent, a, c);
        assert_eq!(doc.children(parent), &[b, a, c]);
        assert_tree_consistent(&doc);
    }

    #[test]
    fn test_remove_and_replace() {
        let mut doc = Document::new();
        let parent = doc.create_element("p");
        let a = doc.create_element("a");
        let b = doc.create_element("b");
        doc.append_child(parent, a);
        doc.remove_child(parent, b); // not a child: no-op
        assert_eq!(doc.children(parent), &[a]);
        doc.replace_child(parent, b, a);
        assert_eq!(doc.children(parent), &[b]);
        assert_eq!(doc.parent(a), None);
        assert_tree_consistent(&doc);
    }

    #[test]
    fn test_before_after() {
        let mut doc = Document::new();
        let parent = doc.create_element("p");
        let a = doc.create_element("a");
        doc.append_child(parent, a);
        let x = doc.create_element("x");
        let y = doc.create_element("y");
        doc.before(a, x);
        doc.after(a, y);
        assert_eq!(doc.children(parent), &[x, a, y]);
        assert_tree_consistent(&doc);
    }

    #[test]
    fn test_shallow_clone_empty_children() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        doc.set_attribute(div, "id", "d");
        let child = doc.create_text("t");
        doc.append_child(div, child);
        let copy = doc.clone_node(div, false).unwrap();
        assert!(doc.children(copy).is_empty());
        assert_eq!(doc.get_attribute(copy, "id"), Some("d"));
        assert_eq!(doc.parent(copy), None);
    }

    #[test]
    fn test_deep_clone_no_aliasing() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        let child = doc.create_text("t");
        doc.append_child(div, child);
        let copy = doc.clone_node(div, true).unwrap();
        assert_eq!(doc.children(copy).len(), 1);
        let cloned_child = doc.children(copy)[0];
        assert_ne!(cloned_child, child);
        assert_eq!(doc.parent(cloned_child), Some(copy));
        // Source untouched
        assert_eq!(doc.children(div), &[child]);
        assert_tree_consistent(&doc);
    }

    #[test]
    fn test_presence_only_attribute() {
        let mut doc = Document::new();
        let e = doc.create_element("input");
        doc.set_attribute_present(e, "disabled");
        assert!(doc.has_attribute(e, "disabled"));
        assert_eq!(doc.get_attribute(e, "disabled"), None);
    }

    #[test]
    fn test_class_tokens() {
        let mut doc = Document::new();
        let e = doc.create_element("div");
        doc.add_class(e, "a");
        doc.add_class(e, "b");
        doc.add_class(e, "a"); // already present
        assert_eq!(doc.get_attribute(e, "class"), Some("a b"));
        assert!(doc.has_class(e, "a"));
        doc.remove_class(e, "a");
        assert_eq!(doc.get_attribute(e, "class"), Some("b"));
        assert!(doc.toggle_class(e, "c"));
        assert!(!doc.toggle_class(e, "c"));
        assert!(!doc.has_class(e, "c"));
    }

    #[test]
    fn test_data_attr() {
        let mut doc = Document::new();
        let e = doc.create_element("div");
        doc.set_attribute(e, "data-count", "3");
        assert_eq!(doc.data_attr(e, "count"), Some("3"));
        assert_eq!(doc.data_attr(e, "missing"), None);
    }

    #[test]
    fn test_element_by_id_finds_detached() {
        let mut doc = Document::new();
        let root = doc.root();
        let e = doc.create_element("div");
        doc.set_attribute(e, "id", "x");
        doc.append_child(root, e);
        doc.remove_child(root, e);
        // Registry is never pruned
        assert_eq!(doc.element_by_id("x"), Some(e));
    }

    #[test]
    fn test_text_content() {
        let doc = Document::parse("<div>a<b>b</b>c</div>");
        let root = doc.root();
        assert_eq!(doc.text_content(root), "abc");
    }

    #[test]
    fn test_descendants_document_order() {
        let doc = Document::parse("<a><b/><c><d/></c></a>");
        let names: Vec<_> = doc
            .descendants(doc.root())
            .filter_map(|id| doc.node_name(id).map(str::to_string))
            .collect();
        assert_eq!(names, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_tree_walker_mask() {
        let doc = Document::parse("<a>x<!--c--><b>y</b></a>");
        let texts: Vec<_> = doc
            .tree_walker(doc.root(), NodeFilter::SHOW_TEXT)
            .map(|id| doc.text_content(id))
            .collect();
        assert_eq!(texts, vec!["x", "y"]);
        let comments = doc
            .tree_walker(doc.root(), NodeFilter::SHOW_COMMENT)
            .count();
        assert_eq!(comments, 1);
    }

    #[test]
    fn test_mutation_sequences_keep_invariants() {
        let mut doc = Document::parse("<a><b>1</b><c>2</c></a>");
        let a = doc.query_selector(doc.root(), "a").unwrap().unwrap();
        let b = doc.query_selector(doc.root(), "b").unwrap().unwrap();
        let c = doc.query_selector(doc.root(), "c").unwrap().unwrap();
        doc.append_child(b, c);
        doc.insert_before(a, c, b);
        doc.after(b, c);
        doc.before(b, c);
        doc.remove_child(a, c);
        doc.append_child(a, c);
        assert_tree_consistent(&doc);
    }
}
