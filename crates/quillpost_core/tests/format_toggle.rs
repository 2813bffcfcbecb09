use quillpost_core::editor::{AttributeError, LinkError};
use quillpost_core::model::node::Attribute;
use quillpost_core::{
    active_formats, toggle, Format, FormattedDocument, SanitizationPolicy, SelectionRange,
    ToggleChange, ToggleSkip, WrapStrategy,
};

fn doc(html: &str) -> FormattedDocument {
    FormattedDocument::from_html(html, SanitizationPolicy::editor())
}

fn select(document: &FormattedDocument, start: usize, end: usize) -> SelectionRange {
    SelectionRange::from_text_offsets(document, start, end).unwrap()
}

fn link_to(url: &str) -> Vec<Attribute> {
    vec![Attribute::new("href", url)]
}

#[test]
fn every_format_toggles_back_to_the_original_tree() {
    for format in Format::ALL {
        let original = doc("<p>hello world</p>");
        let attributes = if format == Format::Link {
            link_to("https://example.com")
        } else {
            Vec::new()
        };

        let added = toggle(format, &attributes, Some(&select(&original, 6, 11)), &original);
        assert!(
            matches!(added.change, ToggleChange::Added(_)),
            "{format}: {:?}",
            added.change
        );
        assert!(added.formats.contains(format), "{format} not active after add");

        let removed = toggle(format, &[], added.range.as_ref(), &added.document);
        assert!(
            matches!(removed.change, ToggleChange::Removed { .. }),
            "{format}: {:?}",
            removed.change
        );
        assert_eq!(removed.document.nodes(), original.nodes(), "{format}");
        assert!(!removed.formats.contains(format));
    }
}

#[test]
fn removing_inside_a_wrapper_splits_it() {
    let document = doc("<p><strong>bold text</strong></p>");
    let outcome = toggle(Format::Bold, &[], Some(&select(&document, 5, 9)), &document);
    assert_eq!(outcome.change, ToggleChange::Removed { unwrapped: 1 });
    assert_eq!(outcome.document.to_html(), "<p><strong>bold </strong>text</p>");

    let range = outcome.range.expect("range survives");
    assert_eq!(range.text(), "text");
    assert!(!outcome.formats.contains(Format::Bold));
}

#[test]
fn alias_tags_are_detected_and_removed() {
    let document = doc("<h1><i>Title</i></h1>");
    let range = select(&document, 0, 5);
    let formats = active_formats(Some(&range), &document);
    assert!(formats.contains(Format::Heading));
    assert!(formats.contains(Format::Italic));

    let outcome = toggle(Format::Italic, &[], Some(&range), &document);
    assert_eq!(outcome.document.to_html(), "<h1>Title</h1>");
}

#[test]
fn wrapping_across_elements_extracts_and_inserts() {
    let document = doc("<p><em>ab</em><em>cd</em></p>");
    let outcome = toggle(Format::Bold, &[], Some(&select(&document, 1, 3)), &document);
    assert_eq!(outcome.change, ToggleChange::Added(WrapStrategy::ExtractAndInsert));
    assert_eq!(
        outcome.document.to_html(),
        "<p><em>a</em><strong><em>b</em><em>c</em></strong><em>d</em></p>"
    );
    assert_eq!(outcome.range.as_ref().map(SelectionRange::text), Some("bc"));
    assert!(outcome.formats.contains(Format::Bold));

    let restored = toggle(Format::Bold, &[], outcome.range.as_ref(), &outcome.document);
    assert_eq!(restored.document.to_html(), "<p><em>ab</em><em>cd</em></p>");
}

#[test]
fn selection_across_paragraphs_round_trips() {
    let original = doc("<p>ab</p><p>cd</p>");
    let added = toggle(Format::Bold, &[], Some(&select(&original, 1, 3)), &original);
    assert_eq!(added.change, ToggleChange::Added(WrapStrategy::Surround));
    assert_eq!(
        added.document.to_html(),
        "<p>a<strong>b</strong></p><p><strong>c</strong>d</p>"
    );

    let removed = toggle(Format::Bold, &[], added.range.as_ref(), &added.document);
    assert_eq!(removed.change, ToggleChange::Removed { unwrapped: 2 });
    assert_eq!(removed.document.nodes(), original.nodes());
    assert_eq!(removed.document.to_html(), "<p>ab</p><p>cd</p>");
}

#[test]
fn list_items_keep_their_structure_when_wrapped() {
    let original = doc("<ul><li>one</li><li>two</li></ul>");
    let added = toggle(Format::Italic, &[], Some(&select(&original, 0, 6)), &original);
    assert_eq!(
        added.document.to_html(),
        "<ul><li><em>one</em></li><li><em>two</em></li></ul>"
    );
    let removed = toggle(Format::Italic, &[], added.range.as_ref(), &added.document);
    assert_eq!(removed.document.nodes(), original.nodes());
}

#[test]
fn adjacent_identical_wrappers_are_merged() {
    let document = doc("<p><em>ab</em>cd</p>");
    let outcome = toggle(Format::Italic, &[], Some(&select(&document, 2, 4)), &document);
    assert_eq!(outcome.document.to_html(), "<p><em>abcd</em></p>");
}

#[test]
fn links_get_https_and_safe_defaults() {
    let document = doc("<p>visit us</p>");
    let outcome = toggle(
        Format::Link,
        &link_to("example.com"),
        Some(&select(&document, 6, 8)),
        &document,
    );
    assert_eq!(
        outcome.document.to_html(),
        r#"<p>visit <a href="https://example.com/" rel="noopener noreferrer" target="_blank">us</a></p>"#
    );
}

#[test]
fn unsafe_links_leave_the_document_untouched() {
    let document = doc("<p>click me</p>");
    let outcome = toggle(
        Format::Link,
        &link_to("javascript:alert(1)"),
        Some(&select(&document, 0, 5)),
        &document,
    );
    assert_eq!(
        outcome.change,
        ToggleChange::Skipped(ToggleSkip::InvalidAttribute(AttributeError::InvalidLink(
            LinkError::UnsupportedScheme("javascript".to_string())
        )))
    );
    assert_eq!(outcome.document, document);
    assert!(!outcome.is_applied());
}

#[test]
fn missing_selection_is_a_no_op() {
    let document = doc("<p>x</p>");
    let outcome = toggle(Format::Code, &[], None, &document);
    assert_eq!(outcome.change, ToggleChange::Skipped(ToggleSkip::NoSelection));
    assert_eq!(outcome.document.revision(), document.revision());
    assert!(outcome.formats.is_empty());
}

#[test]
fn backward_selection_direction_is_kept() {
    let document = doc("<p>hello world</p>");
    let range = select(&document, 11, 6);
    assert!(range.is_backward());

    let outcome = toggle(Format::Code, &[], Some(&range), &document);
    let range = outcome.range.expect("range");
    assert!(range.is_backward());
    assert_eq!(range.text(), "world");
}
