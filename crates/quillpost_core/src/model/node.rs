//! Tree node primitives shared by the HTML codec, sanitizer and editor.
//!
//! # Responsibility
//! - Define the text/element node shape used for every content tree.
//! - Provide text-length and text-content helpers measured in Unicode scalar
//!   values (the unit used by selection offsets and preview budgets).
//!
//! # Invariants
//! - Tag and attribute names are stored ASCII-lowercase.
//! - Attribute order is preserved; names are unique per element.

/// Single attribute on an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Element node with a structural tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    /// Returns the value of attribute `name`, if present.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attribute| attribute.name == name)
            .map(|attribute| attribute.value.as_str())
    }

    /// Clones tag and attributes with a replacement child list.
    pub fn shallow_clone_with(&self, children: Vec<Node>) -> Self {
        Self {
            tag: self.tag.clone(),
            attributes: self.attributes.clone(),
            children,
        }
    }

    /// Returns whether two elements carry the same tag and attributes.
    pub fn same_shape(&self, other: &Element) -> bool {
        self.tag == other.tag && self.attributes == other.attributes
    }
}

/// Content tree node: an opaque text leaf or an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(String),
    Element(Element),
}

impl Node {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            Self::Text(_) => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    /// Number of Unicode scalar values in this subtree's text content.
    pub fn text_len(&self) -> usize {
        match self {
            Self::Text(value) => value.chars().count(),
            Self::Element(element) => text_len(&element.children),
        }
    }

    /// Appends this subtree's text content to `out` in document order.
    pub fn collect_text(&self, out: &mut String) {
        match self {
            Self::Text(value) => out.push_str(value),
            Self::Element(element) => {
                for child in &element.children {
                    child.collect_text(out);
                }
            }
        }
    }
}

/// Total text length of a node list.
pub fn text_len(nodes: &[Node]) -> usize {
    nodes.iter().map(Node::text_len).sum()
}

/// Concatenated text content of a node list.
pub fn text_content(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        node.collect_text(&mut out);
    }
    out
}

/// Merges adjacent text leaves and drops empty ones, recursively.
pub fn merge_text_nodes(nodes: Vec<Node>) -> Vec<Node> {
    let mut merged: Vec<Node> = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            Node::Text(value) => {
                if value.is_empty() {
                    continue;
                }
                if let Some(Node::Text(previous)) = merged.last_mut() {
                    previous.push_str(&value);
                } else {
                    merged.push(Node::Text(value));
                }
            }
            Node::Element(mut element) => {
                element.children = merge_text_nodes(std::mem::take(&mut element.children));
                merged.push(Node::Element(element));
            }
        }
    }
    merged
}

/// Splits `value` at a character index, clamping to the string length.
pub fn split_at_char(value: &str, at: usize) -> (&str, &str) {
    match value.char_indices().nth(at) {
        Some((byte_index, _)) => value.split_at(byte_index),
        None => (value, ""),
    }
}
