//! HTML fragment parsing on top of html5ever.
//!
//! # Responsibility
//! - Run untrusted HTML through the standard HTML5 tree builder and convert
//!   the result into `Node` trees.
//!
//! # Invariants
//! - Input is parsed as the content of `<body>`; implied end tags, entity
//!   decoding and misnesting repair follow the HTML5 parsing algorithm.
//! - Tag and attribute names are lowercased; attributes are kept in name
//!   order with one entry per name.
//! - Comments, doctypes and processing instructions never reach the tree.

use crate::model::node::{Attribute, Element, Node};
use kuchikikiki::traits::TendrilSink;
use kuchikikiki::{NodeData, NodeRef};

const BODY_TAG: &str = "body";

/// Parses an HTML fragment into a list of top-level nodes.
pub fn parse_fragment(html: &str) -> Vec<Node> {
    // An explicit body start keeps leading whitespace and stops head-only
    // elements from being hoisted out of the fragment.
    let document = kuchikikiki::parse_html().one(format!("<{BODY_TAG}>{html}"));
    document
        .descendants()
        .find(|node| {
            node.as_element()
                .is_some_and(|element| &*element.name.local == BODY_TAG)
        })
        .map(|body| convert_children(&body))
        .unwrap_or_default()
}

fn convert_children(parent: &NodeRef) -> Vec<Node> {
    parent
        .children()
        .filter_map(|child| convert(&child))
        .collect()
}

fn convert(node: &NodeRef) -> Option<Node> {
    match node.data() {
        NodeData::Text(text) => Some(Node::Text(text.borrow().clone())),
        NodeData::Element(element) => {
            let mut attributes: Vec<Attribute> = element
                .attributes
                .borrow()
                .map
                .iter()
                .map(|(name, attribute)| {
                    Attribute::new(
                        str::to_ascii_lowercase(&name.local),
                        attribute.value.clone(),
                    )
                })
                .collect();
            attributes.sort_by(|left, right| left.name.cmp(&right.name));
            attributes.dedup_by(|next, kept| next.name == kept.name);

            Some(Node::Element(Element {
                tag: str::to_ascii_lowercase(&element.name.local),
                attributes,
                children: convert_children(node),
            }))
        }
        _ => None,
    }
}
