//! A small namespace-aware XML document tree.
//!
//! Documents are fully materialized before any item is parsed, and items are
//! emitted into a tree before anything is written out. The tree owns an
//! `indextree::Arena` of nodes; element and text nodes are linked through the
//! arena's parent/child edges, so child order is document order.
//!
//! Namespaces follow the DOM model: a declaration lives on the element that
//! carries the `xmlns` attribute, and elements point at the declaration they
//! use. `search_ns_by_href` walks ancestors and honors prefix shadowing.

use indextree::{Arena, NodeId};

/// Identifier for a node stored in a document arena.
pub type ElementId = NodeId;

/// A namespace declaration: `xmlns:prefix="href"`, or `xmlns="href"` when
/// `prefix` is `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    pub href: String,
    pub prefix: Option<String>,
}

impl Namespace {
    pub fn new(href: impl Into<String>, prefix: Option<&str>) -> Self {
        Namespace {
            href: href.into(),
            prefix: prefix.map(str::to_owned),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlAttribute {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    pub local_name: String,
    /// Namespace this element is in, if any.
    pub namespace: Option<Namespace>,
    pub attributes: Vec<XmlAttribute>,
    /// Declarations made on this element.
    pub namespace_decls: Vec<Namespace>,
}

impl XmlElement {
    pub fn new(local_name: impl Into<String>) -> Self {
        XmlElement {
            local_name: local_name.into(),
            namespace: None,
            attributes: Vec::new(),
            namespace_decls: Vec::new(),
        }
    }

    /// Name as written: `prefix:local` or `local`.
    pub fn qualified_name(&self) -> String {
        match self.namespace.as_ref().and_then(|ns| ns.prefix.as_deref()) {
            Some(prefix) => format!("{}:{}", prefix, self.local_name),
            None => self.local_name.clone(),
        }
    }

    pub fn namespace_uri(&self) -> Option<&str> {
        self.namespace.as_ref().map(|ns| ns.href.as_str())
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

#[derive(Debug, Clone, Default)]
pub struct XmlDocument {
    arena: Arena<XmlNode>,
    root: Option<ElementId>,
}

impl XmlDocument {
    pub fn new() -> Self {
        XmlDocument::default()
    }

    pub fn root(&self) -> Option<ElementId> {
        self.root
    }

    /// Creates the document element. Any previous root is detached.
    pub fn new_root(&mut self, local_name: &str) -> ElementId {
        if let Some(previous) = self.root.take() {
            previous.remove_subtree(&mut self.arena);
        }
        let id = self
            .arena
            .new_node(XmlNode::Element(XmlElement::new(local_name)));
        self.root = Some(id);
        id
    }

    pub fn new_child(&mut self, parent: ElementId, local_name: &str) -> ElementId {
        self.append_element(parent, XmlElement::new(local_name))
    }

    pub fn append_element(&mut self, parent: ElementId, element: XmlElement) -> ElementId {
        let id = self.arena.new_node(XmlNode::Element(element));
        parent.append(id, &mut self.arena);
        id
    }

    pub fn append_text(&mut self, parent: ElementId, text: impl Into<String>) {
        let text = text.into();
        if text.is_empty() {
            return;
        }
        let id = self.arena.new_node(XmlNode::Text(text));
        parent.append(id, &mut self.arena);
    }

    pub(crate) fn set_root(&mut self, id: ElementId) {
        self.root = Some(id);
    }

    /// Removes whitespace-only text children of an element that also has
    /// element children. Text of leaf elements is left alone.
    pub(crate) fn drop_formatting_text(&mut self, id: ElementId) {
        if self.child_elements(id).next().is_none() {
            return;
        }
        let blanks: Vec<ElementId> = id
            .children(&self.arena)
            .filter(|&child| match self.node(child) {
                Some(XmlNode::Text(text)) => is_xml_whitespace(text),
                _ => false,
            })
            .collect();
        for blank in blanks {
            blank.remove(&mut self.arena);
        }
    }

    pub(crate) fn new_detached(&mut self, element: XmlElement) -> ElementId {
        self.arena.new_node(XmlNode::Element(element))
    }

    pub fn node(&self, id: ElementId) -> Option<&XmlNode> {
        self.arena.get(id).map(|node| node.get())
    }

    pub fn element(&self, id: ElementId) -> Option<&XmlElement> {
        match self.node(id)? {
            XmlNode::Element(element) => Some(element),
            XmlNode::Text(_) => None,
        }
    }

    pub fn element_mut(&mut self, id: ElementId) -> Option<&mut XmlElement> {
        match self.arena.get_mut(id)?.get_mut() {
            XmlNode::Element(element) => Some(element),
            XmlNode::Text(_) => None,
        }
    }

    /// All child nodes, text included, in document order.
    pub fn children(&self, id: ElementId) -> impl Iterator<Item = ElementId> + '_ {
        id.children(&self.arena)
    }

    pub fn child_elements(&self, id: ElementId) -> impl Iterator<Item = ElementId> + '_ {
        id.children(&self.arena)
            .filter(move |child| self.element(*child).is_some())
    }

    /// Concatenated text of every descendant text node.
    pub fn text_content(&self, id: ElementId) -> String {
        id.descendants(&self.arena)
            .filter_map(|node| match self.node(node) {
                Some(XmlNode::Text(text)) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn attribute(&self, id: ElementId, name: &str) -> Option<&str> {
        self.element(id)?.attribute(name)
    }

    /// Sets `name` on the element, replacing an existing value in place.
    pub fn set_attribute(&mut self, id: ElementId, name: &str, value: &str) {
        let Some(element) = self.element_mut(id) else {
            return;
        };
        match element.attributes.iter_mut().find(|attr| attr.name == name) {
            Some(attr) => attr.value = value.to_owned(),
            None => element.attributes.push(XmlAttribute {
                name: name.to_owned(),
                value: value.to_owned(),
            }),
        }
    }

    /// Declares `href` on `id` and returns the declaration.
    pub fn new_ns(&mut self, id: ElementId, href: &str, prefix: Option<&str>) -> Namespace {
        let ns = Namespace::new(href, prefix);
        if let Some(element) = self.element_mut(id) {
            element.namespace_decls.retain(|decl| decl.prefix != ns.prefix);
            element.namespace_decls.push(ns.clone());
        }
        ns
    }

    pub fn set_ns(&mut self, id: ElementId, ns: Namespace) {
        if let Some(element) = self.element_mut(id) {
            element.namespace = Some(ns);
        }
    }

    /// Finds a declaration of `href` visible from `id` (inclusive).
    ///
    /// A declaration on an ancestor is only usable when no closer element
    /// rebinds the same prefix.
    pub fn search_ns_by_href(&self, id: ElementId, href: &str) -> Option<Namespace> {
        let mut shadowed: Vec<Option<&str>> = Vec::new();

        for ancestor in id.ancestors(&self.arena) {
            let Some(element) = self.element(ancestor) else {
                continue;
            };
            for decl in &element.namespace_decls {
                let prefix = decl.prefix.as_deref();
                if shadowed.contains(&prefix) {
                    continue;
                }
                if decl.href == href {
                    return Some(decl.clone());
                }
                shadowed.push(prefix);
            }
        }

        None
    }
}

fn is_xml_whitespace(text: &str) -> bool {
    text.bytes()
        .all(|b| matches!(b, b' ' | b'\t' | b'\r' | b'\n'))
}
