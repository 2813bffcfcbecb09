//! Allow-list HTML sanitization.
//!
//! # Responsibility
//! - Strip every element and attribute not admitted by a policy.
//! - Keep the text of stripped elements (unwrap), except for script-like
//!   containers, which are removed with their content.
//!
//! # Invariants
//! - Pure: no state, no logging, no I/O.
//! - Idempotent: `sanitize(sanitize(x, p), p) == sanitize(x, p)`.
//! - All input is untrusted, including the editor's own previous output.

mod policy;

pub use policy::SanitizationPolicy;

use crate::html::{parse_fragment, serialize_fragment};
use crate::model::node::{merge_text_nodes, text_content, Attribute, Node};

/// Containers removed together with their content under every policy.
const DROP_WITH_CONTENT: &[&str] = &[
    "script", "style", "template", "noscript", "title", "iframe", "frame", "frameset",
    "object", "embed", "applet", "noembed", "noframes", "xmp", "plaintext", "svg", "math",
    "head", "meta", "link", "base",
];
const URL_ATTRIBUTES: &[&str] = &["href", "src", "action", "formaction", "cite"];
const SAFE_URL_SCHEMES: &[&str] = &["http", "https", "mailto"];
const MAX_REPARSE_PASSES: usize = 4;

/// Sanitizes `html` against `policy` and returns safe HTML.
pub fn sanitize(html: &str, policy: &SanitizationPolicy) -> String {
    serialize_fragment(&sanitize_nodes(parse_fragment(html), policy))
}

/// Returns the text content of `html` after sanitization.
pub fn plain_text(html: &str, policy: &SanitizationPolicy) -> String {
    text_content(&sanitize_nodes(parse_fragment(html), policy))
}

/// Sanitizes an already parsed tree and normalizes its text leaves.
///
/// Unwrapping can leave nestings the HTML parser would restructure (a
/// heading directly inside a heading, a paragraph inside a paragraph). The
/// result is re-parsed until it reaches a fixed point so that sanitizing the
/// serialized output yields the same tree.
pub fn sanitize_nodes(nodes: Vec<Node>, policy: &SanitizationPolicy) -> Vec<Node> {
    let mut current = merge_text_nodes(filter_nodes(nodes, policy));
    for _ in 0..MAX_REPARSE_PASSES {
        let reparsed = merge_text_nodes(filter_nodes(
            parse_fragment(&serialize_fragment(&current)),
            policy,
        ));
        if reparsed == current {
            break;
        }
        current = reparsed;
    }
    current
}

fn filter_nodes(nodes: Vec<Node>, policy: &SanitizationPolicy) -> Vec<Node> {
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            Node::Text(value) => out.push(Node::Text(value)),
            Node::Element(mut element) => {
                if DROP_WITH_CONTENT.contains(&element.tag.as_str()) {
                    continue;
                }
                let children = filter_nodes(std::mem::take(&mut element.children), policy);
                if policy.allows_tag(&element.tag) {
                    element.attributes =
                        filter_attributes(&element.tag, element.attributes, policy);
                    element.children = children;
                    out.push(Node::Element(element));
                } else {
                    out.extend(children);
                }
            }
        }
    }
    out
}

fn filter_attributes(
    tag: &str,
    attributes: Vec<Attribute>,
    policy: &SanitizationPolicy,
) -> Vec<Attribute> {
    attributes
        .into_iter()
        .filter(|attribute| {
            let name = attribute.name.as_str();
            policy.allows_attribute(tag, name)
                && !name.starts_with("data-")
                && !name.starts_with("on")
                && (!URL_ATTRIBUTES.contains(&name) || is_safe_url(&attribute.value))
        })
        .collect()
}

/// Returns whether a URL attribute value is relative or uses a safe scheme.
///
/// Whitespace and control characters are ignored while detecting the scheme,
/// matching how browsers resolve `java\tscript:` style values.
pub fn is_safe_url(value: &str) -> bool {
    let compact: String = value
        .chars()
        .filter(|ch| !ch.is_whitespace() && !ch.is_control())
        .collect();
    match url_scheme(&compact) {
        Some(scheme) => SAFE_URL_SCHEMES.contains(&scheme.as_str()),
        None => true,
    }
}

fn url_scheme(value: &str) -> Option<String> {
    let end = value.find([':', '/', '?', '#'])?;
    if value[end..].starts_with(':') {
        Some(value[..end].to_ascii_lowercase())
    } else {
        None
    }
}
