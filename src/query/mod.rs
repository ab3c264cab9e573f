//! Selector queries
//!
//! A small CSS-flavored query engine: `tag`, `.class`, `#id`, `[attr]`
//! simples combined into compounds, with whitespace meaning descendant.
//! Queries compile once into a [`Query`] and are evaluated against the
//! tree read-only.

pub mod matcher;
pub mod parser;

pub use matcher::{matches, query_all};
pub use parser::{parse, Query, Simple};
