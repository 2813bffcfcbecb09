//! Active format detection.
//!
//! # Invariants
//! - Pure: the result is derived from the tree and range on every call.
//! - Only ancestors of the range's common ancestor contribute; formatting
//!   that covers part of the selection is not reported.

use crate::editor::selection::SelectionRange;
use crate::model::document::FormattedDocument;
use crate::model::format::{Format, FormatSet};
use crate::model::node::Node;

/// Returns the formats applied to the whole of `range`.
///
/// Walks from the common ancestor (its parent when it is a text leaf) up to,
/// but excluding, the document root. A missing or stale range yields the
/// empty set.
pub fn active_formats(range: Option<&SelectionRange>, root: &FormattedDocument) -> FormatSet {
    let mut formats = FormatSet::new();
    let Some(range) = range else {
        return formats;
    };
    if !range.is_valid_for(root) {
        return formats;
    }

    let mut path = range.common_ancestor().clone();
    if matches!(root.node(&path), Some(Node::Text(_))) {
        path = path.parent().unwrap_or_default();
    }

    while !path.is_root() {
        if let Some(format) = root
            .element_at(&path)
            .and_then(|element| Format::from_tag(&element.tag))
        {
            formats.insert(format);
        }
        path = path.parent().unwrap_or_default();
    }
    formats
}

#[cfg(test)]
mod tests {
    use super::active_formats;
    use crate::editor::selection::SelectionRange;
    use crate::model::document::FormattedDocument;
    use crate::model::format::Format;
    use crate::sanitize::SanitizationPolicy;

    fn doc(html: &str) -> FormattedDocument {
        FormattedDocument::from_html(html, SanitizationPolicy::editor())
    }

    #[test]
    fn reports_every_enclosing_format() {
        let document = doc("<blockquote><p><em><b>quoted</b></em></p></blockquote>");
        let range = SelectionRange::from_text_offsets(&document, 1, 3).expect("range");
        let formats = active_formats(Some(&range), &document);
        assert!(formats.contains(Format::Quote));
        assert!(formats.contains(Format::Italic));
        assert!(formats.contains(Format::Bold));
        assert_eq!(formats.len(), 3);
    }

    #[test]
    fn partial_coverage_is_not_active() {
        let document = doc("<p>plain <strong>bold</strong></p>");
        let range = SelectionRange::from_text_offsets(&document, 2, 8).expect("range");
        assert!(active_formats(Some(&range), &document).is_empty());
    }

    #[test]
    fn no_range_means_no_formats() {
        let document = doc("<h2>title</h2>");
        assert!(active_formats(None, &document).is_empty());
    }
}
