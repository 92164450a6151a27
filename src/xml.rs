//! # XML Documents
//!
//! Thin layer over `xot` used by every step that reads or writes one of the
//! configuration files. It adds three things on top of the raw tree:
//!
//! - **Context**: a document remembers the file it came from, so structural
//!   errors can name it.
//! - **Layout preservation**: configuration dumps are indented with
//!   whitespace text nodes. Inserting or removing a record goes through
//!   helpers that copy or drop the neighbouring indentation, so the written
//!   file keeps the layout of the input and repeated runs produce identical
//!   bytes.
//! - **Stable output**: documents are written as UTF-8 with an XML
//!   declaration, without a byte-order mark, ending in a single newline.

use std::fs;
use std::path::{Path, PathBuf};

use xot::{NameId, Node, Xot};

use crate::error::{Error, Result};

const DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// A parsed XML document bound to its file path.
pub struct XmlDocument {
    xot: Xot,
    root: Node,
    path: PathBuf,
}

impl std::fmt::Debug for XmlDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XmlDocument")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl XmlDocument {
    /// Read and parse the file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| Error::Filesystem {
            message: format!("Failed to read '{}': {}", path.display(), e),
        })?;
        Self::parse(path, &text)
    }

    /// Parse `text`. `path` is only used for error messages and as the
    /// default destination.
    pub fn parse(path: &Path, text: &str) -> Result<Self> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut xot = Xot::new();
        let root = xot.parse(text).map_err(|e| Error::XmlParse {
            file: path.display().to_string(),
            message: e.to_string(),
        })?;
        Ok(Self {
            xot,
            root,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The top-level element.
    pub fn document_element(&self) -> Result<Node> {
        self.xot.document_element(self.root).map_err(Error::xml)
    }

    /// Interned name of an element in namespace `ns`.
    pub fn name_ns(&mut self, ns: &str, local: &str) -> NameId {
        let ns = self.xot.add_namespace(ns);
        self.xot.add_name_ns(local, ns)
    }

    /// Interned name without namespace, as used by plain attributes.
    pub fn name(&mut self, local: &str) -> NameId {
        self.xot.add_name(local)
    }

    pub fn is_named(&self, node: Node, name: NameId) -> bool {
        self.xot.element(node).is_some_and(|e| e.name() == name)
    }

    /// Local name of an element, without prefix or namespace.
    pub fn local_name(&self, node: Node) -> Option<&str> {
        self.xot
            .element(node)
            .map(|e| self.xot.local_name_str(e.name()))
    }

    pub fn child_elements(&self, node: Node) -> Vec<Node> {
        self.xot
            .children(node)
            .filter(|n| self.xot.is_element(*n))
            .collect()
    }

    pub fn first_child_named(&self, node: Node, name: NameId) -> Option<Node> {
        self.xot.children(node).find(|n| self.is_named(*n, name))
    }

    pub fn children_named(&self, node: Node, name: NameId) -> Vec<Node> {
        self.xot
            .children(node)
            .filter(|n| self.is_named(*n, name))
            .collect()
    }

    /// All elements below `node` (not including it) in document order.
    pub fn descendant_elements(&self, node: Node) -> Vec<Node> {
        self.xot
            .descendants(node)
            .filter(|n| *n != node && self.xot.is_element(*n))
            .collect()
    }

    pub fn descendants_named(&self, node: Node, name: NameId) -> Vec<Node> {
        self.xot
            .descendants(node)
            .filter(|n| *n != node && self.is_named(*n, name))
            .collect()
    }

    /// Concatenated text of the direct text children of `node`.
    pub fn text(&self, node: Node) -> String {
        self.xot
            .children(node)
            .filter_map(|n| self.xot.text_str(n))
            .collect()
    }

    /// Whether `node` is an element holding only text, like `<Name>X</Name>`.
    pub fn is_text_leaf(&self, node: Node) -> bool {
        self.xot.is_element(node)
            && self.xot.first_child(node).is_some()
            && self
                .xot
                .children(node)
                .all(|n| self.xot.text_str(n).is_some())
    }

    /// Replace all children of `node` with a single text node.
    pub fn set_text(&mut self, node: Node, text: &str) -> Result<()> {
        let children: Vec<Node> = self.xot.children(node).collect();
        for child in children {
            self.xot.remove(child).map_err(Error::xml)?;
        }
        let text = self.xot.new_text(text);
        self.xot.append(node, text).map_err(Error::xml)
    }

    pub fn attribute(&self, node: Node, name: NameId) -> Option<String> {
        self.xot.attributes(node).get(name).map(|v| v.to_string())
    }

    pub fn set_attribute(&mut self, node: Node, name: NameId, value: &str) {
        self.xot.attributes_mut(node).insert(name, value.to_string());
    }

    /// Create a detached element.
    pub fn new_element(&mut self, name: NameId) -> Node {
        self.xot.new_element(name)
    }

    /// The whitespace text node directly in front of `node`, if any.
    fn leading_whitespace(&self, node: Node) -> Option<Node> {
        let parent = self.xot.parent(node)?;
        let siblings: Vec<Node> = self.xot.children(parent).collect();
        let idx = siblings.iter().position(|n| *n == node)?;
        let prev = *siblings.get(idx.checked_sub(1)?)?;
        self.xot
            .text_str(prev)
            .filter(|t| t.trim().is_empty())
            .map(|_| prev)
    }

    /// The line break and indentation in front of `node`, or `None` when the
    /// document is not indented at that point.
    pub fn indent_of(&self, node: Node) -> Option<String> {
        let ws = self.leading_whitespace(node)?;
        let text = self.xot.text_str(ws)?;
        Some(match text.rfind('\n') {
            Some(idx) => text[idx..].to_string(),
            None => text.to_string(),
        })
    }

    /// One level of indentation as used inside `parent`. Falls back to a tab.
    pub fn indent_unit(&self, parent: Node) -> String {
        let parent_indent = self.indent_of(parent);
        let child_indent = self
            .child_elements(parent)
            .first()
            .and_then(|c| self.indent_of(*c));
        match (parent_indent, child_indent) {
            (Some(p), Some(c)) if c.len() > p.len() && c.starts_with(&p) => c[p.len()..].to_string(),
            _ => "\t".to_string(),
        }
    }

    fn insert_text_before(&mut self, node: Node, text: &str) -> Result<()> {
        let ws = self.xot.new_text(text);
        self.xot.insert_before(node, ws).map_err(Error::xml)
    }

    fn insert_text_after(&mut self, node: Node, text: &str) -> Result<()> {
        let ws = self.xot.new_text(text);
        self.xot.insert_after(node, ws).map_err(Error::xml)
    }

    /// Insert `new` as the next sibling of `anchor` on its own line, indented
    /// like `anchor`.
    pub fn insert_after_indented(&mut self, anchor: Node, new: Node) -> Result<()> {
        let indent = self.indent_of(anchor);
        self.xot.insert_after(anchor, new).map_err(Error::xml)?;
        if let Some(indent) = indent {
            self.insert_text_before(new, &indent)?;
        }
        Ok(())
    }

    /// Insert `new` as the previous sibling of `anchor` on its own line,
    /// indented like `anchor`.
    pub fn insert_before_indented(&mut self, anchor: Node, new: Node) -> Result<()> {
        let indent = self.indent_of(anchor);
        self.xot.insert_before(anchor, new).map_err(Error::xml)?;
        if let Some(indent) = indent {
            self.insert_text_after(new, &indent)?;
        }
        Ok(())
    }

    /// Append `new` as the last child element of `parent`.
    pub fn append_indented(&mut self, parent: Node, new: Node) -> Result<()> {
        if let Some(last) = self.child_elements(parent).last().copied() {
            return self.insert_after_indented(last, new);
        }

        let parent_indent = self.indent_of(parent);
        let unit = self.indent_unit(parent);
        let blank: Vec<Node> = self
            .xot
            .children(parent)
            .filter(|n| self.xot.text_str(*n).is_some_and(|t| t.trim().is_empty()))
            .collect();
        for node in blank {
            self.xot.remove(node).map_err(Error::xml)?;
        }

        match parent_indent {
            Some(indent) => {
                let open = self.xot.new_text(&format!("{}{}", indent, unit));
                self.xot.append(parent, open).map_err(Error::xml)?;
                self.xot.append(parent, new).map_err(Error::xml)?;
                let close = self.xot.new_text(&indent);
                self.xot.append(parent, close).map_err(Error::xml)
            }
            None => self.xot.append(parent, new).map_err(Error::xml),
        }
    }

    /// Fill a detached `parent` with `children`, one per line, indented one
    /// `unit` deeper than `parent_indent`.
    pub fn append_block(
        &mut self,
        parent: Node,
        children: &[Node],
        parent_indent: Option<&str>,
        unit: &str,
    ) -> Result<()> {
        for child in children {
            if let Some(indent) = parent_indent {
                let ws = self.xot.new_text(&format!("{}{}", indent, unit));
                self.xot.append(parent, ws).map_err(Error::xml)?;
            }
            self.xot.append(parent, *child).map_err(Error::xml)?;
        }
        if let (Some(indent), false) = (parent_indent, children.is_empty()) {
            let ws = self.xot.new_text(indent);
            self.xot.append(parent, ws).map_err(Error::xml)?;
        }
        Ok(())
    }

    /// Remove `node` together with the indentation in front of it.
    pub fn remove_indented(&mut self, node: Node) -> Result<()> {
        if let Some(ws) = self.leading_whitespace(node) {
            self.xot.remove(ws).map_err(Error::xml)?;
        }
        self.xot.remove(node).map_err(Error::xml)
    }

    /// Serialize the whole document.
    pub fn to_xml_string(&self) -> Result<String> {
        let body = self.xot.to_string(self.root).map_err(Error::xml)?;
        let body = strip_declaration(&body);
        Ok(format!("{}\n{}\n", DECLARATION, body.trim()))
    }
}

fn strip_declaration(text: &str) -> &str {
    let trimmed = text.trim_start();
    if trimmed.starts_with("<?xml") {
        if let Some(end) = trimmed.find("?>") {
            return &trimmed[end + 2..];
        }
    }
    trimmed
}

#[cfg(test)]
mod tests {
    use super::*;

    const NS: &str = "urn:test";

    fn doc(text: &str) -> XmlDocument {
        XmlDocument::parse(Path::new("test.xml"), text).unwrap()
    }

    #[test]
    fn test_parse_error_names_file() {
        let err = XmlDocument::parse(Path::new("broken.xml"), "<a><b></a>").unwrap_err();
        let display = err.to_string();
        assert!(display.contains("XML parsing error in broken.xml"));
    }

    #[test]
    fn test_byte_order_mark_is_ignored() {
        let d = doc("\u{feff}<a xmlns=\"urn:test\"/>");
        assert!(d.document_element().is_ok());
    }

    #[test]
    fn test_output_has_declaration_and_trailing_newline() {
        let d = doc("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<a xmlns=\"urn:test\"><b>x</b></a>");
        let out = d.to_xml_string().unwrap();
        assert!(out.starts_with(DECLARATION));
        assert_eq!(out.matches("<?xml").count(), 1);
        assert!(out.ends_with("</a>\n"));
        assert!(out.contains("<b>x</b>"));
    }

    #[test]
    fn test_text_and_set_text() {
        let mut d = doc("<a xmlns=\"urn:test\"><Name>Old</Name></a>");
        let name = d.name_ns(NS, "Name");
        let root = d.document_element().unwrap();
        let node = d.first_child_named(root, name).unwrap();
        assert_eq!(d.text(node), "Old");
        assert!(d.is_text_leaf(node));
        d.set_text(node, "New").unwrap();
        assert_eq!(d.text(node), "New");
        assert!(d.to_xml_string().unwrap().contains("<Name>New</Name>"));
    }

    #[test]
    fn test_attributes() {
        let mut d = doc("<a xmlns=\"urn:test\" uuid=\"1\"/>");
        let uuid = d.name("uuid");
        let root = d.document_element().unwrap();
        assert_eq!(d.attribute(root, uuid).as_deref(), Some("1"));
        d.set_attribute(root, uuid, "2");
        assert_eq!(d.attribute(root, uuid).as_deref(), Some("2"));
    }

    #[test]
    fn test_insert_after_copies_indentation() {
        let mut d = doc("<a xmlns=\"urn:test\">\n\t<x>1</x>\n\t<x>2</x>\n</a>");
        let x = d.name_ns(NS, "x");
        let root = d.document_element().unwrap();
        let first = d.children_named(root, x)[0];
        let new = d.new_element(x);
        d.insert_after_indented(first, new).unwrap();
        d.set_text(new, "new").unwrap();
        let out = d.to_xml_string().unwrap();
        assert!(out.contains("<x>1</x>\n\t<x>new</x>\n\t<x>2</x>\n</a>"));
    }

    #[test]
    fn test_insert_before_copies_indentation() {
        let mut d = doc("<a xmlns=\"urn:test\">\n\t<x>1</x>\n\t<y>2</y>\n</a>");
        let x = d.name_ns(NS, "x");
        let y = d.name_ns(NS, "y");
        let root = d.document_element().unwrap();
        let anchor = d.first_child_named(root, y).unwrap();
        let new = d.new_element(x);
        d.insert_before_indented(anchor, new).unwrap();
        d.set_text(new, "new").unwrap();
        let out = d.to_xml_string().unwrap();
        assert!(out.contains("<x>1</x>\n\t<x>new</x>\n\t<y>2</y>\n</a>"));
    }

    #[test]
    fn test_remove_then_insert_restores_layout() {
        let input = "<a xmlns=\"urn:test\">\n\t<x>1</x>\n\t<x>2</x>\n</a>";
        let mut d = doc(input);
        let before = d.to_xml_string().unwrap();
        let x = d.name_ns(NS, "x");
        let root = d.document_element().unwrap();
        let second = d.children_named(root, x)[1];
        d.remove_indented(second).unwrap();
        assert!(d.to_xml_string().unwrap().contains("<x>1</x>\n</a>"));
        let first = d.children_named(root, x)[0];
        let new = d.new_element(x);
        d.insert_after_indented(first, new).unwrap();
        d.set_text(new, "2").unwrap();
        assert_eq!(d.to_xml_string().unwrap(), before);
    }

    #[test]
    fn test_append_into_empty_parent() {
        let mut d = doc("<a xmlns=\"urn:test\">\n\t<list/>\n</a>");
        let list = d.name_ns(NS, "list");
        let x = d.name_ns(NS, "x");
        let root = d.document_element().unwrap();
        let parent = d.first_child_named(root, list).unwrap();
        let new = d.new_element(x);
        d.append_indented(parent, new).unwrap();
        let out = d.to_xml_string().unwrap();
        assert!(out.contains("<list>\n\t\t<x/>\n\t</list>"));
    }

    #[test]
    fn test_indent_unit_detection() {
        let d = doc("<a xmlns=\"urn:test\">\n  <list>\n    <x/>\n  </list>\n</a>");
        let root = d.document_element().unwrap();
        let list = d.child_elements(root)[0];
        assert_eq!(d.indent_unit(list), "  ");
    }

    #[test]
    fn test_strip_declaration() {
        assert_eq!(strip_declaration("<?xml version=\"1.0\"?><a/>"), "<a/>");
        assert_eq!(strip_declaration("<a/>"), "<a/>");
    }
}
