//! Structural tree surgery used by the toggle engine.
//!
//! All functions take a node list plus the global character offset of its
//! first character (`base`) and a selected span `[start, end)` in global
//! offsets. Inputs are never mutated; new node lists are returned.

use crate::model::format::Format;
use crate::model::node::{split_at_char, text_len, Element, Node};

/// Wrapping strategy used by the add path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapStrategy {
    /// Selected children were wrapped in place; only text leaves were split.
    Surround,
    /// Straddling elements were split and the extracted content re-inserted
    /// inside the wrapper.
    ExtractAndInsert,
}

/// Node list cut into the parts before, inside and after a span.
#[derive(Debug, Default)]
pub(crate) struct Partition {
    pub before: Vec<Node>,
    pub inside: Vec<Node>,
    pub after: Vec<Node>,
    /// Whether an element (not just a text leaf) straddled a boundary.
    pub split_elements: bool,
}

/// Cuts `nodes` at `start` and `end`, splitting text leaves and straddling
/// elements. Each side keeps copies of the split elements' tag and
/// attributes.
pub(crate) fn partition(nodes: &[Node], base: usize, start: usize, end: usize) -> Partition {
    let mut parts = Partition::default();
    let mut cursor = base;

    for node in nodes {
        let node_start = cursor;
        let node_end = cursor + node.text_len();
        cursor = node_end;

        if node_end <= start {
            parts.before.push(node.clone());
        } else if node_start >= end {
            parts.after.push(node.clone());
        } else if start <= node_start && node_end <= end {
            parts.inside.push(node.clone());
        } else {
            match node {
                Node::Text(value) => {
                    let local_start = start.saturating_sub(node_start);
                    let local_end = end.min(node_end) - node_start;
                    let (head, rest) = split_at_char(value, local_start);
                    let (middle, tail) = split_at_char(rest, local_end - local_start);
                    push_text(&mut parts.before, head);
                    push_text(&mut parts.inside, middle);
                    push_text(&mut parts.after, tail);
                }
                Node::Element(element) => {
                    let inner = partition(&element.children, node_start, start, end);
                    parts.split_elements = true;
                    push_element(&mut parts.before, element, inner.before);
                    push_element(&mut parts.inside, element, inner.inside);
                    push_element(&mut parts.after, element, inner.after);
                }
            }
        }
    }
    parts
}

fn push_text(out: &mut Vec<Node>, value: &str) {
    if !value.is_empty() {
        out.push(Node::text(value));
    }
}

fn push_element(out: &mut Vec<Node>, template: &Element, children: Vec<Node>) {
    if !children.is_empty() {
        out.push(Node::Element(template.shallow_clone_with(children)));
    }
}

/// Removes `format` from the span `[start, end)`.
///
/// Matching elements inside the span are unwrapped; matching elements that
/// straddle a boundary are split so the unselected parts keep the format.
/// `unwrapped` counts every matching element touched.
pub(crate) fn lift_format(
    nodes: &[Node],
    base: usize,
    start: usize,
    end: usize,
    format: Format,
    unwrapped: &mut usize,
) -> Vec<Node> {
    let mut out = Vec::with_capacity(nodes.len());
    let mut cursor = base;

    for node in nodes {
        let node_start = cursor;
        let node_end = cursor + node.text_len();
        cursor = node_end;

        let element = match node {
            Node::Element(element) if node_start < end && node_end > start => element,
            _ => {
                out.push(node.clone());
                continue;
            }
        };

        if !format.matches_tag(&element.tag) {
            let children =
                lift_format(&element.children, node_start, start, end, format, unwrapped);
            out.push(Node::Element(element.shallow_clone_with(children)));
            continue;
        }

        *unwrapped += 1;
        if start <= node_start && node_end <= end {
            out.extend(unwrap_format(&element.children, format, unwrapped));
        } else {
            let parts = partition(&element.children, node_start, start, end);
            push_element(&mut out, element, parts.before);
            out.extend(unwrap_format(&parts.inside, format, unwrapped));
            push_element(&mut out, element, parts.after);
        }
    }
    out
}

/// Unwraps every element of `format` in `nodes`, at any depth.
pub(crate) fn unwrap_format(nodes: &[Node], format: Format, unwrapped: &mut usize) -> Vec<Node> {
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            Node::Element(element) if format.matches_tag(&element.tag) => {
                *unwrapped += 1;
                out.extend(unwrap_format(&element.children, format, unwrapped));
            }
            Node::Element(element) => {
                let children = unwrap_format(&element.children, format, unwrapped);
                out.push(Node::Element(element.shallow_clone_with(children)));
            }
            Node::Text(_) => out.push(node.clone()),
        }
    }
    out
}

/// Tags that start a block. Wrappers are never placed around them.
const BLOCK_TAGS: &[&str] = &[
    "p", "li", "ul", "ol", "h1", "h2", "h3", "h4", "h5", "h6", "blockquote", "div",
];

/// Wraps the span `[start, end)` in `wrapper` at the container addressed by
/// `container` (child indices from `nodes`; empty for `nodes` itself).
///
/// Inside the container, each run of inline content overlapping the span is
/// wrapped separately; blocks are descended into, never split.
///
/// Returns `None` when `container` does not address an element.
pub(crate) fn wrap_span(
    nodes: &[Node],
    container: &[usize],
    base: usize,
    start: usize,
    end: usize,
    wrapper: &Element,
) -> Option<(Vec<Node>, WrapStrategy)> {
    let Some((&index, rest)) = container.split_first() else {
        let mut strategy = WrapStrategy::Surround;
        let out = wrap_runs(nodes, base, start, end, wrapper, &mut strategy);
        return Some((out, strategy));
    };

    let element = nodes.get(index)?.as_element()?;
    let child_base = base + text_len(&nodes[..index]);
    let (children, strategy) = wrap_span(&element.children, rest, child_base, start, end, wrapper)?;

    let mut out = nodes.to_vec();
    out[index] = Node::Element(element.shallow_clone_with(children));
    Some((out, strategy))
}

fn wrap_runs(
    nodes: &[Node],
    base: usize,
    start: usize,
    end: usize,
    wrapper: &Element,
    strategy: &mut WrapStrategy,
) -> Vec<Node> {
    let mut out = Vec::with_capacity(nodes.len() + 1);
    let mut run: Vec<Node> = Vec::new();
    let mut run_base = base;
    let mut cursor = base;

    for node in nodes {
        let node_start = cursor;
        let node_end = cursor + node.text_len();
        cursor = node_end;

        let block = match node {
            Node::Element(element) if holds_block(element) => element,
            _ => {
                if run.is_empty() {
                    run_base = node_start;
                }
                run.push(node.clone());
                continue;
            }
        };

        out.extend(wrap_run(&run, run_base, start, end, wrapper, strategy));
        run.clear();
        if node_start < end && node_end > start {
            let children = wrap_runs(&block.children, node_start, start, end, wrapper, strategy);
            out.push(Node::Element(block.shallow_clone_with(children)));
        } else {
            out.push(node.clone());
        }
    }
    out.extend(wrap_run(&run, run_base, start, end, wrapper, strategy));
    out
}

/// Wraps the selected part of one run of inline siblings.
fn wrap_run(
    run: &[Node],
    base: usize,
    start: usize,
    end: usize,
    wrapper: &Element,
    strategy: &mut WrapStrategy,
) -> Vec<Node> {
    let run_end = base + text_len(run);
    if run.is_empty() || run_end <= start || base >= end {
        return run.to_vec();
    }

    let parts = partition(run, base, start, end);
    if parts.inside.is_empty() {
        return run.to_vec();
    }
    if parts.split_elements {
        *strategy = WrapStrategy::ExtractAndInsert;
    }
    let mut out = parts.before;
    out.push(Node::Element(wrapper.shallow_clone_with(parts.inside)));
    out.extend(parts.after);
    out
}

fn holds_block(element: &Element) -> bool {
    BLOCK_TAGS.contains(&element.tag.as_str())
        || element
            .children
            .iter()
            .any(|child| child.as_element().is_some_and(holds_block))
}

/// Returns whether every selected character of `[start, end)` sits inside an
/// element matching `format`.
pub(crate) fn span_has_format(
    nodes: &[Node],
    base: usize,
    start: usize,
    end: usize,
    format: Format,
) -> bool {
    covered_by(nodes, base, start, end, format, false)
}

fn covered_by(
    nodes: &[Node],
    base: usize,
    start: usize,
    end: usize,
    format: Format,
    inherited: bool,
) -> bool {
    let mut cursor = base;
    for node in nodes {
        let node_start = cursor;
        let node_end = cursor + node.text_len();
        cursor = node_end;
        if node_end <= start || node_start >= end {
            continue;
        }
        let covered = match node {
            Node::Text(_) => inherited,
            Node::Element(element) => covered_by(
                &element.children,
                node_start,
                start,
                end,
                format,
                inherited || format.matches_tag(&element.tag),
            ),
        };
        if !covered {
            return false;
        }
    }
    true
}

/// Merges adjacent text leaves everywhere, and adjacent identical inline
/// format elements only where they meet at one of the `cuts` offsets.
///
/// Cuts are the selection boundaries of the toggle; elements that were
/// already adjacent elsewhere in the document are left alone. Empty text
/// leaves are dropped.
pub(crate) fn normalize(nodes: Vec<Node>, base: usize, cuts: &[usize]) -> Vec<Node> {
    let mut out: Vec<Node> = Vec::with_capacity(nodes.len());
    let mut cursor = base;
    let mut last_start = base;

    for node in nodes {
        let node_start = cursor;
        cursor += node.text_len();
        match node {
            Node::Text(value) => {
                if value.is_empty() {
                    continue;
                }
                if let Some(Node::Text(previous)) = out.last_mut() {
                    previous.push_str(&value);
                    continue;
                }
                last_start = node_start;
                out.push(Node::Text(value));
            }
            Node::Element(mut element) => {
                if cuts.contains(&node_start) && is_mergeable(&element) {
                    if let Some(Node::Element(previous)) = out.last_mut() {
                        if previous.same_shape(&element) {
                            previous.children.extend(element.children);
                            previous.children =
                                normalize(std::mem::take(&mut previous.children), last_start, cuts);
                            continue;
                        }
                    }
                }
                element.children = normalize(std::mem::take(&mut element.children), node_start, cuts);
                last_start = node_start;
                out.push(Node::Element(element));
            }
        }
    }
    out
}

fn is_mergeable(element: &Element) -> bool {
    Format::from_tag(&element.tag).is_some_and(Format::is_inline)
}
