use quillpost_core::{
    EditorSession, Format, HostRange, HostSelection, Position, SelectionError, ToggleChange,
    WrapStrategy,
};

struct FixedHost(HostRange);

impl HostSelection for FixedHost {
    fn range_count(&self) -> usize {
        1
    }

    fn range_at(&self, _index: usize) -> Result<HostRange, SelectionError> {
        Ok(self.0.clone())
    }
}

#[test]
fn toolbar_flow_over_a_host_selection() {
    let mut session = EditorSession::open("<p>Rust is <i>fun</i></p>");
    let host = FixedHost(HostRange {
        document: session.document_id(),
        anchor: Position::new(vec![0, 0], 0),
        focus: Position::new(vec![0, 0], 4),
    });
    assert_eq!(session.select_from_host(&host).map(|range| range.text()), Some("Rust"));

    assert_eq!(
        session.toggle(Format::Bold, &[]),
        ToggleChange::Added(WrapStrategy::Surround)
    );
    assert!(session.active_formats().contains(Format::Bold));

    assert!(matches!(
        session.toggle_link("rust-lang.org"),
        ToggleChange::Added(_)
    ));
    assert!(session.active_formats().contains(Format::Link));
    assert_eq!(
        session.content_html(),
        r#"<p><strong><a href="https://rust-lang.org/" rel="noopener noreferrer" target="_blank">Rust</a></strong> is <i>fun</i></p>"#
    );

    assert!(session.undo());
    assert!(session.undo());
    assert!(!session.undo());
    assert_eq!(session.content_html(), "<p>Rust is <i>fun</i></p>");
    assert!(session.can_redo());
}

#[test]
fn host_range_from_a_previous_revision_is_ignored() {
    let mut session = EditorSession::open("<p>abc</p>");
    session.replace_content("<p>a</p>");
    let host = FixedHost(HostRange {
        document: session.document_id(),
        anchor: Position::new(vec![0, 0], 0),
        focus: Position::new(vec![0, 0], 3),
    });
    assert!(session.select_from_host(&host).is_none());
    assert!(session.active_formats().is_empty());
}
