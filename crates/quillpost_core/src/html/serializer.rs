//! HTML serializer for content trees.
//!
//! # Invariants
//! - Text escapes `&`, `<`, `>`; attribute values are double-quoted and also
//!   escape `"`.
//! - Void elements are written without an end tag.
//! - For trees produced by the parser, `parse(serialize(tree)) == tree`.

use crate::model::node::{Element, Node};

/// Elements that never have children or an end tag.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Serializes a node list to HTML.
pub fn serialize_fragment(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        write_node(&mut out, node);
    }
    out
}

fn write_node(out: &mut String, node: &Node) {
    match node {
        Node::Text(value) => escape_text_into(out, value),
        Node::Element(element) => write_element(out, element),
    }
}

fn write_element(out: &mut String, element: &Element) {
    out.push('<');
    out.push_str(&element.tag);
    for attribute in &element.attributes {
        out.push(' ');
        out.push_str(&attribute.name);
        out.push_str("=\"");
        escape_attribute_into(out, &attribute.value);
        out.push('"');
    }
    out.push('>');

    if VOID_ELEMENTS.contains(&element.tag.as_str()) {
        return;
    }

    for child in &element.children {
        write_node(out, child);
    }
    out.push_str("</");
    out.push_str(&element.tag);
    out.push('>');
}

fn escape_text_into(out: &mut String, value: &str) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

fn escape_attribute_into(out: &mut String, value: &str) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::serialize_fragment;
    use crate::html::parser::parse_fragment;

    #[test]
    fn serializes_escaped_text_and_attributes() {
        let nodes = parse_fragment(r#"<a href="/q?a=1&amp;b=&quot;2&quot;">1 &lt; 2</a>"#);
        assert_eq!(
            serialize_fragment(&nodes),
            r#"<a href="/q?a=1&amp;b=&quot;2&quot;">1 &lt; 2</a>"#
        );
    }

    #[test]
    fn void_elements_have_no_end_tag() {
        let nodes = parse_fragment("line<br/>next");
        assert_eq!(serialize_fragment(&nodes), "line<br>next");
    }

    #[test]
    fn reparse_of_serialized_tree_is_stable() {
        let source = "<p>x <b>y</b> &amp;lt; <unknown data-x='1'>z</unknown></p>";
        let first = parse_fragment(source);
        let second = parse_fragment(&serialize_fragment(&first));
        assert_eq!(first, second);
    }

    #[test]
    fn decoded_entities_are_written_as_characters() {
        let nodes = parse_fragment("<p>caf&eacute; &amp; &euro;5</p>");
        assert_eq!(serialize_fragment(&nodes), "<p>café &amp; €5</p>");
    }
}
