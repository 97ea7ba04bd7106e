use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A child of an [`Element`]: either a nested element or a named text value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Node {
    Element(Element),
    Value { name: String, text: String },
}

/// Named node with an attribute map and ordered children.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Append a child element.
    pub fn add_element(&mut self, child: Element) -> &mut Self {
        self.children.push(Node::Element(child));
        self
    }

    /// Append a named text value.
    pub fn add_value(&mut self, name: impl Into<String>, value: impl Display) -> &mut Self {
        self.children.push(Node::Value {
            name: name.into(),
            text: value.to_string(),
        });
        self
    }

    /// Set an attribute, replacing any previous value.
    pub fn add_attribute(&mut self, name: impl Into<String>, value: impl Display) -> &mut Self {
        self.attributes.insert(name.into(), value.to_string());
        self
    }

    /// First child element called `name`.
    pub fn element<'a>(&'a self, name: &'a str) -> Option<&'a Element> {
        self.elements(name).next()
    }

    /// All child elements called `name`, in order.
    pub fn elements<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter_map(move |node| match node {
            Node::Element(e) if e.name == name => Some(e),
            _ => None,
        })
    }

    pub fn value_str(&self, name: &str) -> Option<&str> {
        self.children.iter().find_map(|node| match node {
            Node::Value { name: n, text } if n == name => Some(text.as_str()),
            _ => None,
        })
    }

    /// First value called `name`, parsed. `None` if absent or unparseable.
    pub fn value<T: FromStr>(&self, name: &str) -> Option<T> {
        self.value_str(name)?.parse().ok()
    }

    pub fn attribute_str(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Attribute called `name`, parsed. `None` if absent or unparseable.
    pub fn attribute<T: FromStr>(&self, name: &str) -> Option<T> {
        self.attribute_str(name)?.parse().ok()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.children.is_empty()
    }
}

/// One saved configuration: a set of named root elements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Configuration {
    roots: Vec<Element>,
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a root element, replacing an earlier root of the same name.
    pub fn add_named_configuration(&mut self, root: Element) {
        match self.roots.iter_mut().find(|r| r.name == root.name) {
            Some(existing) => *existing = root,
            None => self.roots.push(root),
        }
    }

    pub fn named_configuration(&self, name: &str) -> Option<&Element> {
        self.roots.iter().find(|r| r.name == name)
    }

    pub fn roots(&self) -> &[Element] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}
