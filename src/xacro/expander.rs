//! Template expansion pass

use super::{
    loader::read_template,
    tree::{XmlElement, XmlNode},
};
use crate::error::TemplateError;
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

/// Namespace URIs under which xacro elements appear in the wild.
const XACRO_NAMESPACES: &[&str] = &[
    "http://www.ros.org/wiki/xacro",
    "http://ros.org/wiki/xacro",
    "http://wiki.ros.org/xacro",
];

/// Expand a template file into a normalized XML document.
pub fn expand_file(path: &Path) -> Result<String, TemplateError> {
    let content = read_template(path)?;
    Expander::default().expand(&content, path)
}

/// Expand template source directly. `file` provides the base directory for
/// relative includes and context for error messages.
pub fn expand_str(content: &str, file: &Path) -> Result<String, TemplateError> {
    Expander::default().expand(content, file)
}

/// An unexpanded template element, owned so macro bodies can outlive the
/// document they were parsed from.
#[derive(Debug, Clone)]
enum TemplateNode {
    Element(TemplateElement),
    Text(String),
}

#[derive(Debug, Clone)]
struct TemplateElement {
    tag: Tag,
    attrs: Vec<(String, String)>,
    children: Vec<TemplateNode>,
}

impl TemplateElement {
    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Tag {
    Plain(String),
    Xacro(String),
}

#[derive(Debug, Clone)]
struct MacroDef {
    params: Vec<MacroParam>,
    body: Vec<TemplateNode>,
}

#[derive(Debug, Clone)]
struct MacroParam {
    name: String,
    default: Option<String>,
}

#[derive(Default)]
struct Expander {
    properties: HashMap<String, String>,
    macros: HashMap<String, MacroDef>,
    args: HashMap<String, String>,
    /// Innermost entry is the file currently being processed; relative
    /// includes resolve against its parent directory.
    file_stack: Vec<PathBuf>,
}

impl Expander {
    fn expand(mut self, content: &str, file: &Path) -> Result<String, TemplateError> {
        let root = self.parse(content, file)?;
        self.file_stack.push(file.to_path_buf());

        let mut out = Vec::new();
        self.process_node(&TemplateNode::Element(root), &mut out)?;
        self.file_stack.pop();

        let mut elements: Vec<XmlElement> = out
            .into_iter()
            .filter_map(|node| match node {
                XmlNode::Element(element) => Some(element),
                XmlNode::Text(_) => None,
            })
            .collect();
        if elements.len() != 1 {
            return Err(TemplateError::MultipleRoots(elements.len()));
        }
        Ok(elements.remove(0).to_pretty_xml())
    }

    fn parse(&self, content: &str, file: &Path) -> Result<TemplateElement, TemplateError> {
        let doc = roxmltree::Document::parse(content).map_err(|source| TemplateError::Xml {
            file: file.display().to_string(),
            source,
        })?;
        Ok(convert_element(doc.root_element()))
    }

    fn current_file(&self) -> String {
        self.file_stack
            .last()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<inline>".to_string())
    }

    fn process_nodes(
        &mut self,
        nodes: &[TemplateNode],
        out: &mut Vec<XmlNode>,
    ) -> Result<(), TemplateError> {
        for node in nodes {
            self.process_node(node, out)?;
        }
        Ok(())
    }

    fn process_node(
        &mut self,
        node: &TemplateNode,
        out: &mut Vec<XmlNode>,
    ) -> Result<(), TemplateError> {
        match node {
            TemplateNode::Text(text) => {
                if !text.trim().is_empty() {
                    out.push(XmlNode::Text(self.substitute(text)?));
                }
                Ok(())
            }
            TemplateNode::Element(element) => self.process_element(element, out),
        }
    }

    fn process_element(
        &mut self,
        element: &TemplateElement,
        out: &mut Vec<XmlNode>,
    ) -> Result<(), TemplateError> {
        let name = match &element.tag {
            Tag::Plain(name) => {
                let mut output = XmlElement::new(name.clone());
                for (attr, value) in &element.attrs {
                    output.attrs.push((attr.clone(), self.substitute(value)?));
                }
                self.process_nodes(&element.children, &mut output.children)?;
                out.push(XmlNode::Element(output));
                return Ok(());
            }
            Tag::Xacro(name) => name.as_str(),
        };

        match name {
            "property" => self.define_property(element),
            "arg" => self.declare_arg(element),
            "macro" => self.define_macro(element),
            "include" => self.process_include(element, out),
            "if" => self.process_conditional(element, out, true),
            "unless" => self.process_conditional(element, out, false),
            "insert_block" => Err(TemplateError::Unsupported {
                feature: "xacro:insert_block".to_string(),
                file: self.current_file(),
            }),
            _ => self.call_macro(name, element, out),
        }
    }

    fn define_property(&mut self, element: &TemplateElement) -> Result<(), TemplateError> {
        let name = self.require_attr(element, "property", "name")?;
        let raw = self.require_attr(element, "property", "value")?;
        let value = self.substitute(&raw)?;
        log::trace!("Property ${{{}}} = {}", name, value);
        self.properties.insert(name, value);
        Ok(())
    }

    fn declare_arg(&mut self, element: &TemplateElement) -> Result<(), TemplateError> {
        let name = self.require_attr(element, "arg", "name")?;
        if self.args.contains_key(&name) {
            return Ok(());
        }
        if let Some(default) = element.attr("default") {
            let value = self.substitute(default)?;
            self.args.insert(name, value);
        }
        Ok(())
    }

    fn define_macro(&mut self, element: &TemplateElement) -> Result<(), TemplateError> {
        let name = self.require_attr(element, "macro", "name")?;
        let mut params = Vec::new();
        if let Some(param_spec) = element.attr("params") {
            for token in param_spec.split_whitespace() {
                if token.starts_with('*') {
                    return Err(TemplateError::Unsupported {
                        feature: format!("block parameter '{}'", token),
                        file: self.current_file(),
                    });
                }
                let (pname, default) = match token.split_once(":=") {
                    Some((pname, default)) => (pname, Some(default.to_string())),
                    None => (token, None),
                };
                params.push(MacroParam {
                    name: pname.to_string(),
                    default,
                });
            }
        }
        self.macros.insert(
            name,
            MacroDef {
                params,
                body: element.children.clone(),
            },
        );
        Ok(())
    }

    fn process_include(
        &mut self,
        element: &TemplateElement,
        out: &mut Vec<XmlNode>,
    ) -> Result<(), TemplateError> {
        let raw = self.require_attr(element, "include", "filename")?;
        let filename = self.substitute(&raw)?;

        let base = self
            .file_stack
            .last()
            .and_then(|f| f.parent())
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let path = base.join(&filename);
        log::debug!("Including template fragment: {}", path.display());

        let content = read_template(&path)?;
        let root = self.parse(&content, &path)?;

        // The included root element is discarded; its children merge into
        // the current scope, properties and macros included.
        self.file_stack.push(path);
        let result = self.process_nodes(&root.children, out);
        self.file_stack.pop();
        result
    }

    fn process_conditional(
        &mut self,
        element: &TemplateElement,
        out: &mut Vec<XmlNode>,
        wanted: bool,
    ) -> Result<(), TemplateError> {
        let tag = if wanted { "if" } else { "unless" };
        let raw = self.require_attr(element, tag, "value")?;
        let value = self.substitute(&raw)?;
        let truthy = match value.as_str() {
            "true" | "1" => true,
            "false" | "0" => false,
            other => {
                return Err(TemplateError::InvalidCondition {
                    element: format!("xacro:{}", tag),
                    value: other.to_string(),
                })
            }
        };
        if truthy == wanted {
            self.process_nodes(&element.children, out)?;
        }
        Ok(())
    }

    fn call_macro(
        &mut self,
        name: &str,
        element: &TemplateElement,
        out: &mut Vec<XmlNode>,
    ) -> Result<(), TemplateError> {
        let def = self
            .macros
            .get(name)
            .cloned()
            .ok_or_else(|| TemplateError::UndefinedMacro {
                name: name.to_string(),
                file: self.current_file(),
            })?;

        // Bind parameters in the caller's scope: call-site attributes win,
        // then parameter defaults.
        let mut bindings = Vec::with_capacity(def.params.len());
        for param in &def.params {
            let value = match element.attr(&param.name) {
                Some(value) => self.substitute(value)?,
                None => match &param.default {
                    Some(default) => self.substitute(default)?,
                    None => {
                        return Err(TemplateError::MissingMacroParameter {
                            name: name.to_string(),
                            param: param.name.clone(),
                        })
                    }
                },
            };
            bindings.push((param.name.clone(), value));
        }

        // Macro-local scope: overlay the bindings, restore afterwards so
        // properties defined inside the body do not leak out.
        let saved = self.properties.clone();
        for (pname, value) in bindings {
            self.properties.insert(pname, value);
        }
        let result = self.process_nodes(&def.body, out);
        self.properties = saved;
        result
    }

    fn require_attr(
        &self,
        element: &TemplateElement,
        tag: &str,
        attr: &str,
    ) -> Result<String, TemplateError> {
        element
            .attr(attr)
            .map(str::to_string)
            .ok_or_else(|| TemplateError::MissingAttribute {
                element: format!("xacro:{}", tag),
                attribute: attr.to_string(),
            })
    }

    /// Resolve `${property}` and `$(arg name)` references in a string.
    /// `$$` escapes a literal dollar sign.
    fn substitute(&self, input: &str) -> Result<String, TemplateError> {
        let mut result = String::with_capacity(input.len());
        let mut chars = input.char_indices().peekable();

        while let Some((i, ch)) = chars.next() {
            if ch != '$' {
                result.push(ch);
                continue;
            }
            match chars.peek() {
                Some((_, '$')) => {
                    chars.next();
                    result.push('$');
                }
                Some((_, '{')) => {
                    chars.next();
                    let start = i + 2;
                    let end = find_closing(&mut chars, '}').ok_or_else(|| {
                        TemplateError::UnterminatedSubstitution(input.to_string())
                    })?;
                    let key = input[start..end].trim();
                    let value = self.properties.get(key).ok_or_else(|| {
                        TemplateError::UndefinedProperty {
                            name: key.to_string(),
                            file: self.current_file(),
                        }
                    })?;
                    result.push_str(value);
                }
                Some((_, '(')) => {
                    chars.next();
                    let start = i + 2;
                    let end = find_closing(&mut chars, ')').ok_or_else(|| {
                        TemplateError::UnterminatedSubstitution(input.to_string())
                    })?;
                    result.push_str(&self.resolve_call(input[start..end].trim())?);
                }
                _ => result.push(ch),
            }
        }

        Ok(result)
    }

    /// Resolve the content of a `$(...)` reference.
    fn resolve_call(&self, content: &str) -> Result<String, TemplateError> {
        match content.split_once(char::is_whitespace) {
            Some(("arg", arg_name)) => {
                let arg_name = arg_name.trim();
                self.args.get(arg_name).cloned().ok_or_else(|| {
                    TemplateError::UndefinedArgument {
                        name: arg_name.to_string(),
                        file: self.current_file(),
                    }
                })
            }
            _ => Err(TemplateError::UnsupportedSubstitution(content.to_string())),
        }
    }
}

/// Advance the iterator to the next `closer`, returning its byte position.
fn find_closing(
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
    closer: char,
) -> Option<usize> {
    for (pos, c) in chars.by_ref() {
        if c == closer {
            return Some(pos);
        }
    }
    None
}

fn convert_element(node: roxmltree::Node) -> TemplateElement {
    let tag_name = node.tag_name();
    let tag = match tag_name.namespace() {
        Some(ns) if XACRO_NAMESPACES.contains(&ns) => Tag::Xacro(tag_name.name().to_string()),
        _ => Tag::Plain(tag_name.name().to_string()),
    };

    let attrs = node
        .attributes()
        .map(|attr| (attr.name().to_string(), attr.value().to_string()))
        .collect();

    let children = node
        .children()
        .filter_map(|child| {
            if child.is_element() {
                Some(TemplateNode::Element(convert_element(child)))
            } else if child.is_text() {
                child
                    .text()
                    .map(|text| TemplateNode::Text(text.to_string()))
            } else {
                None
            }
        })
        .collect();

    TemplateElement {
        tag,
        attrs,
        children,
    }
}
