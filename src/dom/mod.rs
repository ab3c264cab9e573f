//! Document tree
//!
//! - [`document`]: arena-backed [`Document`] owning all nodes
//! - [`node`]: node storage and the per-kind payload union
//! - [`builder`]: marker-stream to tree assembly with recovery
//! - [`serialize`]: lazy XML/HTML/text output

pub mod builder;
pub mod document;
pub mod node;
pub mod serialize;

pub use document::{DescendantIter, Document, NodeFilter, TreeWalker};
pub use node::{Attr, ElementData, Node, NodeData, NodeId, NodeKind};
pub use serialize::{SerializeOptions, Serializer, TextFragments};
