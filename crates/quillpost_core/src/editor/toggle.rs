//! Format toggle engine.
//!
//! # Responsibility
//! - Add or remove one format over a selection and produce the next
//!   document revision, the re-derived range and the resulting formats.
//!
//! # Invariants
//! - Input documents are never mutated; a skipped toggle returns the input
//!   revision unchanged.
//! - Removing a format only touches the selected span: straddling wrappers
//!   are split so unselected text keeps its formatting.
//! - Supplied attributes are validated before anything else; an invalid
//!   value skips the toggle on both the add and the remove path.
//! - Normalization only merges identical inline wrappers that meet at the
//!   selection boundaries; formatting elsewhere is left as it was.

use crate::editor::detect::active_formats;
use crate::editor::link::{validate_attributes, AttributeError};
use crate::editor::selection::{restore, SelectionRange};
use crate::editor::tree_ops::{lift_format, normalize, span_has_format, wrap_span, WrapStrategy};
use crate::model::document::FormattedDocument;
use crate::model::format::{Format, FormatSet};
use crate::model::node::{Attribute, Element, Node};
use log::{debug, info, warn};
use std::fmt::{Display, Formatter};

/// Why a toggle left the document untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleSkip {
    NoSelection,
    EmptySelection,
    /// The range does not resolve in the given revision.
    StaleRange,
    InvalidAttribute(AttributeError),
}

impl ToggleSkip {
    fn code(&self) -> &'static str {
        match self {
            Self::NoSelection => "no_selection",
            Self::EmptySelection => "empty_selection",
            Self::StaleRange => "stale_range",
            Self::InvalidAttribute(_) => "invalid_attribute",
        }
    }
}

impl Display for ToggleSkip {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoSelection => write!(f, "no selection"),
            Self::EmptySelection => write!(f, "selection contains no text"),
            Self::StaleRange => write!(f, "selection does not belong to this document revision"),
            Self::InvalidAttribute(err) => write!(f, "{err}"),
        }
    }
}

/// What a toggle did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleChange {
    Added(WrapStrategy),
    Removed { unwrapped: usize },
    Skipped(ToggleSkip),
}

/// Result of one toggle command.
#[derive(Debug, Clone)]
pub struct ToggleOutcome {
    pub document: FormattedDocument,
    pub range: Option<SelectionRange>,
    pub formats: FormatSet,
    pub change: ToggleChange,
}

impl ToggleOutcome {
    pub fn is_applied(&self) -> bool {
        !matches!(self.change, ToggleChange::Skipped(_))
    }
}

/// Toggles `format` over `range` in `root`.
///
/// When the format is active on the range, or covers every selected
/// character, it is removed from the selected span; otherwise the selection
/// is wrapped in a new `format` element carrying the validated `attributes`. The returned range covers the same characters
/// in the new revision.
pub fn toggle(
    format: Format,
    attributes: &[Attribute],
    range: Option<&SelectionRange>,
    root: &FormattedDocument,
) -> ToggleOutcome {
    let Some(range) = range else {
        return skipped(root, None, ToggleSkip::NoSelection);
    };
    if !range.is_valid_for(root) {
        return skipped(root, Some(range), ToggleSkip::StaleRange);
    }
    if range.text().is_empty() {
        return skipped(root, Some(range), ToggleSkip::EmptySelection);
    }

    let supplied = if attributes.is_empty() {
        None
    } else {
        match validate_attributes(format, attributes) {
            Ok(attributes) => Some(attributes),
            Err(err) => return rejected(format, root, range, err),
        }
    };

    let (start, end) = (range.start_offset(), range.end_offset());
    let active = active_formats(Some(range), root).contains(format)
        || span_has_format(root.nodes(), 0, start, end, format);
    let (nodes, change) = if active {
        let mut unwrapped = 0;
        let nodes = lift_format(root.nodes(), 0, start, end, format, &mut unwrapped);
        (nodes, ToggleChange::Removed { unwrapped })
    } else {
        let attributes = match supplied.map_or_else(|| validate_attributes(format, &[]), Ok) {
            Ok(attributes) => attributes,
            Err(err) => return rejected(format, root, range, err),
        };
        let wrapper = Element {
            tag: format.tag().to_string(),
            attributes,
            children: Vec::new(),
        };
        let mut container = range.common_ancestor().clone();
        if matches!(root.node(&container), Some(Node::Text(_))) {
            container = container.parent().unwrap_or_default();
        }
        match wrap_span(root.nodes(), container.indices(), 0, start, end, &wrapper) {
            Some((nodes, strategy)) => (nodes, ToggleChange::Added(strategy)),
            None => return skipped(root, Some(range), ToggleSkip::StaleRange),
        }
    };

    let document = root.next_revision(normalize(nodes, 0, &[start, end]));
    let (anchor, focus) = if range.is_backward() {
        (end, start)
    } else {
        (start, end)
    };
    let next_range = SelectionRange::from_text_offsets(&document, anchor, focus)
        .or_else(|| restore(range, &document));
    let formats = active_formats(next_range.as_ref(), &document);

    info!(
        "event=format_toggle module=editor status=ok format={} action={} revision={} selected_chars={}",
        format,
        change_label(&change),
        document.revision(),
        end - start
    );

    ToggleOutcome {
        document,
        range: next_range,
        formats,
        change,
    }
}

fn rejected(
    format: Format,
    root: &FormattedDocument,
    range: &SelectionRange,
    err: AttributeError,
) -> ToggleOutcome {
    warn!(
        "event=format_toggle module=editor status=rejected format={} error_code=invalid_attribute error={}",
        format, err
    );
    skipped(root, Some(range), ToggleSkip::InvalidAttribute(err))
}

fn skipped(
    root: &FormattedDocument,
    range: Option<&SelectionRange>,
    reason: ToggleSkip,
) -> ToggleOutcome {
    debug!(
        "event=format_toggle module=editor status=skipped reason={} revision={}",
        reason.code(),
        root.revision()
    );
    ToggleOutcome {
        document: root.clone(),
        range: range.cloned(),
        formats: active_formats(range, root),
        change: ToggleChange::Skipped(reason),
    }
}

fn change_label(change: &ToggleChange) -> &'static str {
    match change {
        ToggleChange::Added(WrapStrategy::Surround) => "add_surround",
        ToggleChange::Added(WrapStrategy::ExtractAndInsert) => "add_extract",
        ToggleChange::Removed { .. } => "remove",
        ToggleChange::Skipped(_) => "skip",
    }
}

#[cfg(test)]
mod tests {
    use super::{toggle, ToggleChange, ToggleSkip};
    use crate::editor::selection::SelectionRange;
    use crate::editor::tree_ops::WrapStrategy;
    use crate::model::document::FormattedDocument;
    use crate::editor::link::{AttributeError, LinkError};
    use crate::model::format::Format;
    use crate::model::node::Attribute;
    use crate::sanitize::SanitizationPolicy;

    fn doc(html: &str) -> FormattedDocument {
        FormattedDocument::from_html(html, SanitizationPolicy::editor())
    }

    #[test]
    fn bold_round_trip_restores_tree() {
        let original = doc("<p>hello world</p>");
        let range = SelectionRange::from_text_offsets(&original, 6, 11).expect("range");

        let added = toggle(Format::Bold, &[], Some(&range), &original);
        assert_eq!(added.document.to_html(), "<p>hello <strong>world</strong></p>");
        assert_eq!(added.change, ToggleChange::Added(WrapStrategy::Surround));
        assert!(added.formats.contains(Format::Bold));

        let removed = toggle(Format::Bold, &[], added.range.as_ref(), &added.document);
        assert_eq!(removed.document.to_html(), "<p>hello world</p>");
        assert_eq!(removed.change, ToggleChange::Removed { unwrapped: 1 });
        assert!(!removed.formats.contains(Format::Bold));
        assert_eq!(removed.document.revision(), 2);
    }

    #[test]
    fn collapsed_range_is_skipped() {
        let document = doc("<p>abc</p>");
        let range = SelectionRange::from_text_offsets(&document, 1, 1).expect("range");
        let outcome = toggle(Format::Italic, &[], Some(&range), &document);
        assert_eq!(outcome.change, ToggleChange::Skipped(ToggleSkip::EmptySelection));
        assert_eq!(outcome.document, document);
    }

    #[test]
    fn range_from_previous_revision_is_stale() {
        let document = doc("<p>abc</p>");
        let range = SelectionRange::from_text_offsets(&document, 0, 3).expect("range");
        let shorter = document.reload_html("<p>a</p>", SanitizationPolicy::editor());
        let outcome = toggle(Format::Bold, &[], Some(&range), &shorter);
        assert_eq!(outcome.change, ToggleChange::Skipped(ToggleSkip::StaleRange));
    }

    #[test]
    fn invalid_href_inside_existing_link_leaves_it_in_place() {
        let document = doc(r#"<p><a href="https://a.test/">x</a></p>"#);
        let range = SelectionRange::from_text_offsets(&document, 0, 1).expect("range");
        let outcome = toggle(
            Format::Link,
            &[Attribute::new("href", "javascript:alert(1)")],
            Some(&range),
            &document,
        );
        assert_eq!(
            outcome.change,
            ToggleChange::Skipped(ToggleSkip::InvalidAttribute(AttributeError::InvalidLink(
                LinkError::UnsupportedScheme("javascript".to_string())
            )))
        );
        assert_eq!(outcome.document, document);
    }

    #[test]
    fn link_without_href_can_still_be_removed() {
        let document = doc(r#"<p><a href="https://a.test/">x</a></p>"#);
        let range = SelectionRange::from_text_offsets(&document, 0, 1).expect("range");
        let outcome = toggle(Format::Link, &[], Some(&range), &document);
        assert_eq!(outcome.change, ToggleChange::Removed { unwrapped: 1 });
        assert_eq!(outcome.document.to_html(), "<p>x</p>");
    }

    #[test]
    fn untouched_neighbours_are_not_merged() {
        let original = doc("<p><em>a</em><em>b</em> cd</p>");
        let range = SelectionRange::from_text_offsets(&original, 3, 5).expect("range");
        let added = toggle(Format::Bold, &[], Some(&range), &original);
        assert_eq!(
            added.document.to_html(),
            "<p><em>a</em><em>b</em> <strong>cd</strong></p>"
        );
        let removed = toggle(Format::Bold, &[], added.range.as_ref(), &added.document);
        assert_eq!(removed.document.nodes(), original.nodes());
    }
}
