//! Pull-based serialization
//!
//! A [`Serializer`] walks the tree with an explicit enter/exit step stack
//! and yields output fragments lazily; callers `collect()` for a full
//! string or stop early. Nothing is buffered beyond the current fragment.
//!
//! Two dialects share one walker:
//!
//! - XML (default): childless elements self-close, an XML prolog is
//!   emitted for document nodes
//! - HTML: void elements never take children or a closing tag, other
//!   elements always get an explicit close

use super::document::Document;
use super::node::{NodeData, NodeId, NodeKind};
use crate::core::entities::{escape_comment, escape_text};
use crate::core::tokenizer::is_void_element;

/// Elements serialized with an explicit closing tag even when childless
const NO_VOID_OVERRIDE: &[&str] = &["slot"];

/// Output controls for [`Serializer`]
#[derive(Debug, Clone, Copy)]
pub struct SerializeOptions {
    /// Emit comment nodes
    pub comments: bool,
    /// Emit the XML prolog / HTML doctype for document nodes
    pub doctype: bool,
    /// HTML dialect (void elements, HTML doctype)
    pub html: bool,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        SerializeOptions {
            comments: true,
            doctype: true,
            html: false,
        }
    }
}

enum Step {
    Enter(NodeId),
    Exit(NodeId),
}

/// Lazy markup serializer over a subtree
pub struct Serializer<'d> {
    doc: &'d Document,
    options: SerializeOptions,
    stack: Vec<Step>,
    prolog: Option<String>,
}

impl<'d> Serializer<'d> {
    pub(crate) fn new(doc: &'d Document, root: NodeId, options: SerializeOptions) -> Self {
        let prolog = if options.doctype && doc.kind(root) == Some(NodeKind::Document) {
            Some(if options.html {
                "<!DOCTYPE html>\n".to_string()
            } else {
                "<?xml version='1.0' charset='utf-8' ?>\n".to_string()
            })
        } else {
            None
        };
        Serializer {
            doc,
            options,
            stack: vec![Step::Enter(root)],
            prolog,
        }
    }

    fn qualified_name(&self, id: NodeId) -> String {
        let node = match self.doc.get(id) {
            Some(n) => n,
            None => return String::new(),
        };
        match node.element().and_then(|e| e.namespace.as_deref()) {
            Some(ns) => format!("{ns}:{}", node.name),
            None => node.name.clone(),
        }
    }

    /// Render the attribute portion of an open tag, leading space
    /// included, with the structured style map merged into `style`
    fn render_attributes(&self, id: NodeId) -> String {
        let element = match self.doc.get(id).and_then(|n| n.element()) {
            Some(e) => e,
            None => return String::new(),
        };
        let style = merged_style(
            element.attr("style").and_then(|a| a.value.as_deref()),
            &element.style,
        );
        let mut out = String::new();
        for attr in &element.attrs {
            if attr.name == "style" {
                continue;
            }
            match &attr.value {
                Some(value) => {
                    out.push_str(&format!(" {}=\"{}\"", attr.name, value));
                }
                None => {
                    out.push(' ');
                    out.push_str(&attr.name);
                }
            }
        }
        for (ns, attrs) in &element.attrs_ns {
            for attr in attrs {
                match &attr.value {
                    Some(value) => {
                        out.push_str(&format!(" {ns}:{}=\"{}\"", attr.name, value));
                    }
                    None => {
                        out.push_str(&format!(" {ns}:{}", attr.name));
                    }
                }
            }
        }
        if let Some(style) = style {
            out.push_str(&format!(" style=\"{style}\""));
        }
        out
    }

    fn enter_element(&mut self, id: NodeId) -> String {
        let name = self.qualified_name(id);
        let attrs = self.render_attributes(id);
        let children = self.doc.children(id);
        if self.options.html {
            if is_void_element(&name) {
                // Void elements take neither children nor a closing tag
                return format!("<{name}{attrs}>");
            }
            self.stack.push(Step::Exit(id));
            for &child in children.iter().rev() {
                self.stack.push(Step::Enter(child));
            }
            format!("<{name}{attrs}>")
        } else if children.is_empty() && !NO_VOID_OVERRIDE.contains(&name.as_str()) {
            format!("<{name}{attrs} />")
        } else {
            self.stack.push(Step::Exit(id));
            for &child in children.iter().rev() {
                self.stack.push(Step::Enter(child));
            }
            format!("<{name}{attrs}>")
        }
    }
}

impl<'d> Iterator for Serializer<'d> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if let Some(prolog) = self.prolog.take() {
            return Some(prolog);
        }
        loop {
            let step = self.stack.pop()?;
            match step {
                Step::Exit(id) => {
                    return Some(format!("</{}>", self.qualified_name(id)));
                }
                Step::Enter(id) => {
                    let node = self.doc.get(id)?;
                    match &node.data {
                        NodeData::Document | NodeData::Fragment => {
                            // Containers contribute no markup of their own
                            for &child in node.children.iter().rev() {
                                self.stack.push(Step::Enter(child));
                            }
                        }
                        NodeData::Attribute { .. } => {}
                        NodeData::Text { text } => {
                            return Some(escape_text(text).into_owned());
                        }
                        NodeData::Comment { text } => {
                            if self.options.comments {
                                return Some(format!("<!-- {} -->", escape_comment(text)));
                            }
                        }
                        NodeData::Element(_) => {
                            return Some(self.enter_element(id));
                        }
                    }
                }
            }
        }
    }
}

/// Combine a literal `style` attribute with structured style entries.
/// The literal value comes first; property names are de-camel-cased.
fn merged_style(literal: Option<&str>, entries: &[(String, String)]) -> Option<String> {
    let mut parts: Vec<String> = Vec::new();
    if let Some(literal) = literal {
        let trimmed = literal.trim().trim_end_matches(';').trim_end();
        if !trimmed.is_empty() {
            parts.push(trimmed.to_string());
        }
    }
    for (property, value) in entries {
        parts.push(format!("{}: {value}", css_property_name(property)));
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("; "))
    }
}

/// Convert a camelCase property name to its CSS form
/// (`backgroundColor` to `background-color`)
pub fn css_property_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Lazy iterator over text-node payloads in document order
pub struct TextFragments<'d> {
    doc: &'d Document,
    stack: Vec<NodeId>,
}

impl<'d> TextFragments<'d> {
    pub(crate) fn new(doc: &'d Document, root: NodeId) -> Self {
        TextFragments {
            doc,
            stack: vec![root],
        }
    }
}

impl<'d> Iterator for TextFragments<'d> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            let id = self.stack.pop()?;
            let node = self.doc.get(id)?;
            for &child in node.children.iter().rev() {
                self.stack.push(child);
            }
            if let NodeData::Text { text } = &node.data {
                return Some(text.clone());
            }
        }
    }
}
