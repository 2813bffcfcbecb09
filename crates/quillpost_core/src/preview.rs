//! Plain-text previews of stored post content.
//!
//! # Invariants
//! - Length is measured in Unicode scalar values of the sanitized text.
//! - Content within budget is returned byte-for-byte unchanged.

use crate::html::parse_fragment;
use crate::model::node::{text_len, Node};
use crate::sanitize::{sanitize_nodes, SanitizationPolicy};

/// Truncates `html` to at most `max_chars` characters of plain text.
///
/// When the sanitized text fits, the original input is returned unchanged;
/// otherwise the text is cut hard at exactly `max_chars` characters and no
/// markup is kept.
pub fn truncate(html: &str, max_chars: usize) -> String {
    if html.is_empty() {
        return String::new();
    }

    let nodes = sanitize_nodes(parse_fragment(html), SanitizationPolicy::article());
    if text_len(&nodes) <= max_chars {
        return html.to_string();
    }

    let mut out = String::new();
    let mut remaining = max_chars;
    take_text(&nodes, &mut remaining, &mut out);
    out
}

fn take_text(nodes: &[Node], remaining: &mut usize, out: &mut String) {
    for node in nodes {
        if *remaining == 0 {
            return;
        }
        match node {
            Node::Text(value) => {
                let taken: String = value.chars().take(*remaining).collect();
                *remaining -= taken.chars().count();
                out.push_str(&taken);
            }
            Node::Element(element) => take_text(&element.children, remaining, out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::truncate;

    #[test]
    fn content_within_budget_is_returned_verbatim() {
        let html = "<p>short <b>post</b></p>";
        assert_eq!(truncate(html, 10), html);
        assert_eq!(truncate("", 10), "");
    }

    #[test]
    fn long_content_is_cut_to_plain_text() {
        let html = "<p>one <strong>two</strong> three</p>";
        assert_eq!(truncate(html, 9), "one two t");
    }

    #[test]
    fn script_text_does_not_count() {
        let html = "<p>ab</p><script>very long script body</script>";
        assert_eq!(truncate(html, 2), html);
    }
}
