//! Formatted document: immutable-per-revision content tree.
//!
//! # Responsibility
//! - Hold one sanitized revision of editable rich content.
//! - Resolve node paths and positions, and map positions to and from global
//!   character offsets.
//!
//! # Invariants
//! - A document is only built from sanitized nodes or derived from a previous
//!   revision by the toggle engine.
//! - `revision` increases by one for every derived document; `id` is stable
//!   across revisions of the same editing surface.
//! - Offsets inside text leaves count Unicode scalar values; offsets on
//!   elements and on the root count children.

use crate::html::{parse_fragment, serialize_fragment};
use crate::model::node::{text_content, text_len, Element, Node};
use crate::sanitize::{sanitize_nodes, SanitizationPolicy};
use uuid::Uuid;

/// Stable identifier of one editing surface.
pub type DocumentId = Uuid;

/// Child-index path from the document root. The empty path is the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn new(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn parent(&self) -> Option<Self> {
        if self.0.is_empty() {
            return None;
        }
        Some(Self(self.0[..self.0.len() - 1].to_vec()))
    }

    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    /// Longest shared prefix of two paths.
    pub fn common_prefix(&self, other: &NodePath) -> Self {
        let shared = self
            .0
            .iter()
            .zip(other.0.iter())
            .take_while(|(left, right)| left == right)
            .count();
        Self(self.0[..shared].to_vec())
    }
}

impl From<Vec<usize>> for NodePath {
    fn from(value: Vec<usize>) -> Self {
        Self(value)
    }
}

/// Boundary point inside a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub path: NodePath,
    pub offset: usize,
}

impl Position {
    pub fn new(path: impl Into<NodePath>, offset: usize) -> Self {
        Self {
            path: path.into(),
            offset,
        }
    }
}

/// Which leaf wins when a character offset sits between two text leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bias {
    /// Prefer the start of the following leaf.
    Forward,
    /// Prefer the end of the preceding leaf.
    Backward,
}

/// Text leaf location with its global character span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLeaf {
    pub path: NodePath,
    pub start: usize,
    pub len: usize,
}

/// One revision of editable rich content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedDocument {
    id: DocumentId,
    revision: u64,
    nodes: Vec<Node>,
}

impl FormattedDocument {
    /// Parses and sanitizes `html` into a fresh document.
    pub fn from_html(html: &str, policy: &SanitizationPolicy) -> Self {
        Self {
            id: Uuid::new_v4(),
            revision: 0,
            nodes: sanitize_nodes(parse_fragment(html), policy),
        }
    }

    /// Replaces the content of an existing editing surface with sanitized
    /// `html`, keeping its identity.
    pub fn reload_html(&self, html: &str, policy: &SanitizationPolicy) -> Self {
        self.next_revision(sanitize_nodes(parse_fragment(html), policy))
    }

    /// Derives the next revision with the given content.
    pub(crate) fn next_revision(&self, nodes: Vec<Node>) -> Self {
        Self {
            id: self.id,
            revision: self.revision + 1,
            nodes,
        }
    }

    pub fn id(&self) -> DocumentId {
        self.id
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn to_html(&self) -> String {
        serialize_fragment(&self.nodes)
    }

    pub fn text(&self) -> String {
        text_content(&self.nodes)
    }

    pub fn text_len(&self) -> usize {
        text_len(&self.nodes)
    }

    /// Returns the node at `path`; the root is not a node.
    pub fn node(&self, path: &NodePath) -> Option<&Node> {
        let (last, parents) = path.indices().split_last()?;
        let mut siblings: &[Node] = &self.nodes;
        for &index in parents {
            siblings = &siblings.get(index)?.as_element()?.children;
        }
        siblings.get(*last)
    }

    /// Returns the element at `path`, if that node is an element.
    pub fn element_at(&self, path: &NodePath) -> Option<&Element> {
        self.node(path)?.as_element()
    }

    /// Returns the child list of the root or of the element at `path`.
    pub fn children_at(&self, path: &NodePath) -> Option<&[Node]> {
        if path.is_root() {
            return Some(&self.nodes);
        }
        Some(&self.element_at(path)?.children)
    }

    pub fn contains_path(&self, path: &NodePath) -> bool {
        path.is_root() || self.node(path).is_some()
    }

    /// Maximum offset of a position inside the node at `path`.
    pub fn node_len(&self, path: &NodePath) -> Option<usize> {
        if path.is_root() {
            return Some(self.nodes.len());
        }
        match self.node(path)? {
            Node::Text(value) => Some(value.chars().count()),
            Node::Element(element) => Some(element.children.len()),
        }
    }

    pub fn is_valid_position(&self, position: &Position) -> bool {
        self.node_len(&position.path)
            .is_some_and(|len| position.offset <= len)
    }

    /// Global character offset of `position`, or `None` when it does not
    /// resolve in this revision.
    pub fn text_offset(&self, position: &Position) -> Option<usize> {
        let indices = position.path.indices();
        let mut base = 0;
        let mut siblings: &[Node] = &self.nodes;

        for (depth, &index) in indices.iter().enumerate() {
            let node = siblings.get(index)?;
            base += text_len(&siblings[..index]);
            match node {
                Node::Element(element) => siblings = &element.children,
                Node::Text(value) => {
                    if depth + 1 != indices.len() {
                        return None;
                    }
                    let len = value.chars().count();
                    return (position.offset <= len).then_some(base + position.offset);
                }
            }
        }

        if position.offset > siblings.len() {
            return None;
        }
        Some(base + text_len(&siblings[..position.offset]))
    }

    /// Text leaves in document order with their global spans.
    pub fn text_leaves(&self) -> Vec<TextLeaf> {
        let mut leaves = Vec::new();
        let mut cursor = 0;
        collect_leaves(&self.nodes, &NodePath::root(), &mut cursor, &mut leaves);
        leaves
    }

    /// Resolves a global character offset to a position inside a text leaf.
    ///
    /// Offsets past the end clamp to the end of the content. A document
    /// without text resolves to a root position.
    pub fn position_at(&self, offset: usize, bias: Bias) -> Position {
        let leaves = self.text_leaves();
        let total = leaves.last().map_or(0, |leaf| leaf.start + leaf.len);
        let offset = offset.min(total);

        let found = match bias {
            Bias::Forward => leaves
                .iter()
                .find(|leaf| leaf.start <= offset && offset < leaf.start + leaf.len)
                .or_else(|| leaves.last()),
            Bias::Backward => leaves
                .iter()
                .find(|leaf| leaf.start < offset && offset <= leaf.start + leaf.len)
                .or_else(|| leaves.first()),
        };

        match found {
            Some(leaf) => Position::new(
                leaf.path.clone(),
                offset.saturating_sub(leaf.start).min(leaf.len),
            ),
            None => match bias {
                Bias::Forward => Position::new(NodePath::root(), self.nodes.len()),
                Bias::Backward => Position::new(NodePath::root(), 0),
            },
        }
    }
}

fn collect_leaves(nodes: &[Node], parent: &NodePath, cursor: &mut usize, out: &mut Vec<TextLeaf>) {
    for (index, node) in nodes.iter().enumerate() {
        match node {
            Node::Text(value) => {
                let len = value.chars().count();
                out.push(TextLeaf {
                    path: parent.child(index),
                    start: *cursor,
                    len,
                });
                *cursor += len;
            }
            Node::Element(element) => {
                collect_leaves(&element.children, &parent.child(index), cursor, out);
            }
        }
    }
}
