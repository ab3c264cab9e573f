//! Tree node representation
//!
//! Nodes live in an arena owned by the Document and reference each other
//! through NodeId (u32) indices; the parent link is a plain index, never a
//! second owning reference. The variant payload is a closed tagged union,
//! so only Element carries attributes, namespace and style data.

/// Compact node identifier (index into the document arena)
pub type NodeId = u32;

/// Discriminant of a node variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Document root
    Document,
    /// Container whose children splice into a target on insertion
    Fragment,
    /// Element node
    Element,
    /// Standalone attribute node
    Attribute,
    /// Text content
    Text,
    /// Comment
    Comment,
}

/// Variant payload: divergent data behind a shared node shape
#[derive(Debug, Clone)]
pub enum NodeData {
    Document,
    Fragment,
    Element(ElementData),
    Attribute { value: String },
    Text { text: String },
    Comment { text: String },
}

/// Element-only data: namespace, ordered attributes, namespaced
/// attributes and the structured style map
#[derive(Debug, Clone, Default)]
pub struct ElementData {
    pub namespace: Option<String>,
    /// Insertion-ordered; setting an existing name replaces in place
    pub attrs: Vec<Attr>,
    /// Keyed by namespace, then ordered by name within each namespace
    pub attrs_ns: Vec<(String, Vec<Attr>)>,
    /// Structured style entries, merged into the literal `style`
    /// attribute at serialization time
    pub style: Vec<(String, String)>,
}

/// A stored attribute; `value` is None for presence-only attributes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    pub name: String,
    pub value: Option<String>,
}

impl Attr {
    pub fn new(name: impl Into<String>, value: Option<String>) -> Self {
        Attr {
            name: name.into(),
            value,
        }
    }
}

/// A node in the document arena
#[derive(Debug, Clone)]
pub struct Node {
    /// Node name: tag name for elements, `#text`, `#comment`,
    /// `#document`, `#fragment` for the rest
    pub name: String,
    /// Parent node, None while detached
    pub parent: Option<NodeId>,
    /// Child list; its order is authoritative document order
    pub children: Vec<NodeId>,
    /// Variant payload
    pub data: NodeData,
}

impl Node {
    pub(crate) fn new(name: impl Into<String>, data: NodeData) -> Self {
        Node {
            name: name.into(),
            parent: None,
            children: Vec::new(),
            data,
        }
    }

    /// The variant discriminant
    #[inline]
    pub fn kind(&self) -> NodeKind {
        match self.data {
            NodeData::Document => NodeKind::Document,
            NodeData::Fragment => NodeKind::Fragment,
            NodeData::Element(_) => NodeKind::Element,
            NodeData::Attribute { .. } => NodeKind::Attribute,
            NodeData::Text { .. } => NodeKind::Text,
            NodeData::Comment { .. } => NodeKind::Comment,
        }
    }

    /// Check if this is an element node
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    /// Check if this is a text node
    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self.data, NodeData::Text { .. })
    }

    /// Check if this node has children
    #[inline]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Element payload, if this is an element
    #[inline]
    pub fn element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Mutable element payload, if this is an element
    #[inline]
    pub fn element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Textual payload of leaf variants (text, comment, attribute)
    pub fn payload(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text { text } | NodeData::Comment { text } => Some(text),
            NodeData::Attribute { value } => Some(value),
            _ => None,
        }
    }
}

impl ElementData {
    /// Look up an attribute slot by name
    pub fn attr(&self, name: &str) -> Option<&Attr> {
        self.attrs.iter().find(|a| a.name == name)
    }

    /// Set an attribute, replacing in place when the name exists
    pub fn set_attr(&mut self, name: &str, value: Option<String>) {
        match self.attrs.iter_mut().find(|a| a.name == name) {
            Some(slot) => slot.value = value,
            None => self.attrs.push(Attr::new(name, value)),
        }
    }

    /// Remove an attribute by name
    pub fn remove_attr(&mut self, name: &str) {
        self.attrs.retain(|a| a.name != name);
    }

    /// Look up a namespaced attribute
    pub fn attr_ns(&self, ns: &str, name: &str) -> Option<&Attr> {
        self.attrs_ns
            .iter()
            .find(|(n, _)| n == ns)
            .and_then(|(_, attrs)| attrs.iter().find(|a| a.name == name))
    }

    /// Set a namespaced attribute
    pub fn set_attr_ns(&mut self, ns: &str, name: &str, value: Option<String>) {
        let idx = match self.attrs_ns.iter().position(|(n, _)| n == ns) {
            Some(i) => i,
            None => {
                self.attrs_ns.push((ns.to_string(), Vec::new()));
                self.attrs_ns.len() - 1
            }
        };
        let attrs = &mut self.attrs_ns[idx].1;
        match attrs.iter_mut().find(|a| a.name == name) {
            Some(slot) => slot.value = value,
            None => attrs.push(Attr::new(name, value)),
        }
    }
}
