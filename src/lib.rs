//! softdom - tolerant HTML/XML parsing with a mutable document tree
//!
//! Pipeline:
//! - tokenizer: raw markup to a lazy stream of spanned markers
//! - builder: markers to an arena-backed tree, recovering from
//!   malformed input instead of failing
//! - document: mutation, attributes, traversal and selector queries
//! - serializer: lazy XML, HTML or plain-text output
//!
//! ```
//! use softdom::{Document, SerializeOptions};
//!
//! let doc = Document::parse("<ul><li class=\"item\">one</li></ul>");
//! let li = doc.query_selector(doc.root(), "ul .item").unwrap().unwrap();
//! assert_eq!(doc.text_content(li), "one");
//! assert_eq!(doc.to_xml(li), "<li class=\"item\">one</li>");
//! let _ = SerializeOptions::default();
//! ```

pub mod core;
pub mod dom;
pub mod query;

pub use crate::core::attributes::{parse_attributes, serialize_attributes, RawAttr};
pub use crate::core::entities::{decode_text, escape_text};
pub use crate::core::tokenizer::{is_void_element, Marker, MarkerKind, Span, Tokenizer};
pub use dom::{
    Attr, Document, Node, NodeData, NodeFilter, NodeId, NodeKind, SerializeOptions,
    Serializer, TreeWalker,
};
pub use query::{Query, Simple};
