//! Owned element tree standing in for the browser document.
//!
//! Widgets build `Element` subtrees and the page enhancer splices them into a
//! parsed `Document`. Serialization produces XHTML-compatible markup.

mod parse;

use quick_xml::escape::{escape, partial_escape};

pub use parse::parse_document;

/// Elements that never have children or an end tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Elements whose text content is emitted without escaping.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

pub fn is_raw_text_element(tag: &str) -> bool {
    RAW_TEXT_ELEMENTS.contains(&tag)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
}

impl Node {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Node::Text(text.to_string())
    }
}

impl From<String> for Node {
    fn from(text: String) -> Self {
        Node::Text(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    // --- builders ---

    /// Set the `class` attribute (space separated class names).
    pub fn class(mut self, class: &str) -> Self {
        if !class.is_empty() {
            self.set_attr("class", class);
        }
        self
    }

    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children<I, N>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    // --- attributes ---

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value,
            None => self.attrs.push((name.to_string(), value)),
        }
    }

    pub fn remove_attr(&mut self, name: &str) {
        self.attrs.retain(|(key, _)| key != name);
    }

    /// The `id` attribute, ignoring empty values.
    pub fn id(&self) -> Option<&str> {
        self.get_attr("id").filter(|id| !id.is_empty())
    }

    pub fn data(&self, name: &str) -> Option<&str> {
        self.get_attr(&format!("data-{name}"))
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.get_attr("class").unwrap_or_default().split_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|name| name == class)
    }

    pub fn add_class(&mut self, class: &str) {
        if self.has_class(class) {
            return;
        }
        let joined = match self.get_attr("class") {
            Some(existing) if !existing.trim().is_empty() => format!("{} {class}", existing.trim()),
            _ => class.to_string(),
        };
        self.set_attr("class", joined);
    }

    pub fn remove_class(&mut self, class: &str) {
        if !self.has_class(class) {
            return;
        }
        let remaining: Vec<&str> = self.classes().filter(|name| *name != class).collect();
        let joined = remaining.join(" ");
        self.set_attr("class", joined);
    }

    pub fn toggle_class(&mut self, class: &str, on: bool) {
        if on {
            self.add_class(class);
        } else {
            self.remove_class(class);
        }
    }

    // --- queries ---

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(text) => out.push_str(text),
                Node::Element(element) => element.collect_text(out),
                Node::Comment(_) => {}
            }
        }
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// First descendant (excluding `self`) matching `pred`, in document order.
    pub fn find(&self, pred: impl Fn(&Element) -> bool + Copy) -> Option<&Element> {
        for child in self.child_elements() {
            if pred(child) {
                return Some(child);
            }
            if let Some(found) = child.find(pred) {
                return Some(found);
            }
        }
        None
    }

    pub fn find_mut(&mut self, pred: impl Fn(&Element) -> bool + Copy) -> Option<&mut Element> {
        for child in self.children.iter_mut().filter_map(Node::as_element_mut) {
            if pred(child) {
                return Some(child);
            }
            if let Some(found) = child.find_mut(pred) {
                return Some(found);
            }
        }
        None
    }

    /// All descendants matching `pred`, in document order.
    pub fn find_all(&self, pred: impl Fn(&Element) -> bool + Copy) -> Vec<&Element> {
        let mut found = Vec::new();
        self.collect_matching(pred, &mut found);
        found
    }

    fn collect_matching<'a>(
        &'a self,
        pred: impl Fn(&Element) -> bool + Copy,
        out: &mut Vec<&'a Element>,
    ) {
        for child in self.child_elements() {
            if pred(child) {
                out.push(child);
            }
            child.collect_matching(pred, out);
        }
    }

    /// Visit every descendant element in document order.
    pub fn walk_mut(&mut self, visit: &mut impl FnMut(&mut Element)) {
        for child in self.children.iter_mut().filter_map(Node::as_element_mut) {
            visit(child);
            child.walk_mut(visit);
        }
    }

    // --- mutation ---

    pub fn replace_children(&mut self, children: Vec<Node>) {
        self.children = children;
    }

    pub fn prepend(&mut self, node: impl Into<Node>) {
        self.children.insert(0, node.into());
    }

    /// Insert `nodes` right after the first descendant matching `pred`.
    /// Returns false when nothing matched.
    pub fn insert_after(
        &mut self,
        pred: impl Fn(&Element) -> bool + Copy,
        nodes: Vec<Node>,
    ) -> bool {
        let position = self
            .children
            .iter()
            .position(|child| child.as_element().is_some_and(pred));
        if let Some(position) = position {
            let tail = self.children.split_off(position + 1);
            self.children.extend(nodes);
            self.children.extend(tail);
            return true;
        }
        for child in self.children.iter_mut().filter_map(Node::as_element_mut) {
            if child.insert_after(pred, nodes.clone()) {
                return true;
            }
        }
        false
    }

    /// Insert `node` before the first direct child matching `pred`, or at the
    /// front when no child matches.
    pub fn insert_before_child(&mut self, pred: impl Fn(&Element) -> bool, node: impl Into<Node>) {
        let position = self
            .children
            .iter()
            .position(|child| child.as_element().is_some_and(&pred))
            .unwrap_or(0);
        self.children.insert(position, node.into());
    }

    // --- serialization ---

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape(value.as_str()));
            out.push('"');
        }
        if is_void_element(&self.tag) {
            out.push_str(" />");
            return;
        }
        out.push('>');
        let raw = is_raw_text_element(&self.tag);
        for child in &self.children {
            match child {
                Node::Element(element) => element.write_html(out),
                Node::Text(text) if raw => out.push_str(text),
                Node::Text(text) => out.push_str(&partial_escape(text.as_str())),
                Node::Comment(comment) => {
                    out.push_str("<!--");
                    out.push_str(comment);
                    out.push_str("-->");
                }
            }
        }
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }
}

/// A parsed page: optional doctype plus the root element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub doctype: Option<String>,
    pub root: Element,
}

impl Document {
    pub fn new(root: Element) -> Self {
        Self {
            doctype: None,
            root,
        }
    }

    pub fn parse(markup: &str) -> Result<Self, crate::error::PageError> {
        parse_document(markup)
    }

    pub fn body(&self) -> Option<&Element> {
        if self.root.tag == "body" {
            return Some(&self.root);
        }
        self.root.find(is_tag("body"))
    }

    pub fn body_mut(&mut self) -> Option<&mut Element> {
        if self.root.tag == "body" {
            return Some(&mut self.root);
        }
        self.root.find_mut(is_tag("body"))
    }

    pub fn find(&self, pred: impl Fn(&Element) -> bool + Copy) -> Option<&Element> {
        if pred(&self.root) {
            return Some(&self.root);
        }
        self.root.find(pred)
    }

    pub fn find_mut(&mut self, pred: impl Fn(&Element) -> bool + Copy) -> Option<&mut Element> {
        if pred(&self.root) {
            return Some(&mut self.root);
        }
        self.root.find_mut(pred)
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        if let Some(doctype) = &self.doctype {
            out.push_str("<!DOCTYPE ");
            out.push_str(doctype);
            out.push_str(">\n");
        }
        out.push_str(&self.root.to_html());
        out
    }
}

// --- predicates ---

pub fn is_tag(tag: &'static str) -> impl Fn(&Element) -> bool + Copy {
    move |element| element.tag.eq_ignore_ascii_case(tag)
}

pub fn has_class(class: &'static str) -> impl Fn(&Element) -> bool + Copy {
    move |element| element.has_class(class)
}

pub fn tag_with_class(tag: &'static str, class: &'static str) -> impl Fn(&Element) -> bool + Copy {
    move |element| element.tag.eq_ignore_ascii_case(tag) && element.has_class(class)
}
