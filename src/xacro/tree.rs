//! Owned XML tree and writer
//!
//! roxmltree only reads documents, so expansion builds this owned tree and
//! serializes it back out. Output is normalized: two-space indentation, an
//! XML declaration, attributes in source order. Whitespace-only text is
//! dropped, so the output shape is stable regardless of template formatting.

use std::fmt::Write;

#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct XmlElement {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Serialize with an XML declaration and two-space indentation.
    pub fn to_pretty_xml(&self) -> String {
        let mut out = String::from("<?xml version=\"1.0\" ?>\n");
        self.write_indented(&mut out, 0);
        out
    }

    fn write_indented(&self, out: &mut String, depth: usize) {
        let indent = "  ".repeat(depth);
        write!(out, "{}<{}", indent, self.name).unwrap();
        for (name, value) in &self.attrs {
            write!(out, " {}=\"{}\"", name, escape_attr(value)).unwrap();
        }

        let children: Vec<&XmlNode> = self
            .children
            .iter()
            .filter(|child| match child {
                XmlNode::Text(text) => !text.trim().is_empty(),
                XmlNode::Element(_) => true,
            })
            .collect();

        if children.is_empty() {
            out.push_str("/>\n");
            return;
        }

        // A lone text child stays inline; anything else gets its own lines.
        if let [XmlNode::Text(text)] = children.as_slice() {
            writeln!(out, ">{}</{}>", escape_text(text.trim()), self.name).unwrap();
            return;
        }

        out.push_str(">\n");
        for child in children {
            match child {
                XmlNode::Element(element) => element.write_indented(out, depth + 1),
                XmlNode::Text(text) => {
                    writeln!(out, "{}  {}", indent, escape_text(text.trim())).unwrap();
                }
            }
        }
        writeln!(out, "{}</{}>", indent, self.name).unwrap();
    }
}

fn escape_text(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}
