//! Editing session over one authoring surface.
//!
//! # Responsibility
//! - Own the current document revision and selection of one editor.
//! - Route toolbar commands through the toggle engine and keep undo/redo
//!   history of the resulting revisions.
//!
//! # Invariants
//! - The active format set is recomputed on every query, never cached.
//! - Content leaving the session is re-sanitized with the editor policy.

use crate::config::CoreLimits;
use crate::editor::detect::active_formats;
use crate::editor::history::{History, Snapshot};
use crate::editor::link::link_attributes;
use crate::editor::selection::{current_selection, restore, HostSelection, SelectionRange};
use crate::editor::toggle::{toggle, ToggleChange};
use crate::model::document::{DocumentId, FormattedDocument};
use crate::model::format::{Format, FormatSet};
use crate::model::node::Attribute;
use crate::sanitize::{sanitize, SanitizationPolicy};
use log::debug;

pub struct EditorSession {
    document: FormattedDocument,
    range: Option<SelectionRange>,
    history: History,
}

impl EditorSession {
    /// Opens a session on sanitized `html` with the default history depth.
    pub fn open(html: &str) -> Self {
        Self::with_limits(html, &CoreLimits::default())
    }

    pub fn with_limits(html: &str, limits: &CoreLimits) -> Self {
        Self {
            document: FormattedDocument::from_html(html, SanitizationPolicy::editor()),
            range: None,
            history: History::with_max_levels(limits.history_depth),
        }
    }

    pub fn document_id(&self) -> DocumentId {
        self.document.id()
    }

    pub fn document(&self) -> &FormattedDocument {
        &self.document
    }

    pub fn range(&self) -> Option<&SelectionRange> {
        self.range.as_ref()
    }

    /// Captures the host's current selection.
    pub fn select_from_host<H>(&mut self, host: &H) -> Option<&SelectionRange>
    where
        H: HostSelection + ?Sized,
    {
        self.range = current_selection(host, &self.document);
        self.range.as_ref()
    }

    /// Selects the characters between two global offsets.
    pub fn select_text(&mut self, anchor: usize, focus: usize) -> Option<&SelectionRange> {
        self.range = SelectionRange::from_text_offsets(&self.document, anchor, focus);
        self.range.as_ref()
    }

    pub fn clear_selection(&mut self) {
        self.range = None;
    }

    pub fn active_formats(&self) -> FormatSet {
        active_formats(self.range.as_ref(), &self.document)
    }

    /// Toggles `format` on the current selection.
    pub fn toggle(&mut self, format: Format, attributes: &[Attribute]) -> ToggleChange {
        let outcome = toggle(format, attributes, self.range.as_ref(), &self.document);
        if outcome.is_applied() {
            let previous = self.replace_state(outcome.document, outcome.range);
            self.history.record(previous);
        }
        outcome.change
    }

    /// Toggles a link to `url` on the current selection; removes the link
    /// when the selection is already inside one.
    pub fn toggle_link(&mut self, url: &str) -> ToggleChange {
        self.toggle(Format::Link, &link_attributes(url))
    }

    /// Replaces the content with `html` coming from the editing surface.
    ///
    /// The input is sanitized and the selection restored best effort.
    pub fn replace_content(&mut self, html: &str) {
        let document = self.document.reload_html(html, SanitizationPolicy::editor());
        let range = self
            .range
            .as_ref()
            .and_then(|range| restore(range, &document));
        let previous = self.replace_state(document, range);
        self.history.record(previous);
    }

    pub fn undo(&mut self) -> bool {
        let current = self.snapshot();
        match self.history.undo(current) {
            Some(previous) => {
                self.apply_snapshot(previous);
                true
            }
            None => {
                debug!("event=editor_undo module=editor status=skipped reason=empty_history");
                false
            }
        }
    }

    pub fn redo(&mut self) -> bool {
        let current = self.snapshot();
        match self.history.redo(current) {
            Some(next) => {
                self.apply_snapshot(next);
                true
            }
            None => {
                debug!("event=editor_redo module=editor status=skipped reason=empty_history");
                false
            }
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Current content, re-sanitized for storage or submission.
    pub fn content_html(&self) -> String {
        sanitize(&self.document.to_html(), SanitizationPolicy::editor())
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            document: self.document.clone(),
            range: self.range.clone(),
        }
    }

    fn apply_snapshot(&mut self, snapshot: Snapshot) {
        self.document = snapshot.document;
        self.range = snapshot.range;
    }

    fn replace_state(
        &mut self,
        document: FormattedDocument,
        range: Option<SelectionRange>,
    ) -> Snapshot {
        Snapshot {
            document: std::mem::replace(&mut self.document, document),
            range: std::mem::replace(&mut self.range, range),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::EditorSession;
    use crate::editor::toggle::{ToggleChange, ToggleSkip};
    use crate::model::format::Format;

    #[test]
    fn undo_and_redo_walk_revisions() {
        let mut session = EditorSession::open("<p>hello world</p>");
        session.select_text(0, 5).expect("range");
        session.toggle(Format::Italic, &[]);
        assert_eq!(session.content_html(), "<p><em>hello</em> world</p>");
        assert!(session.active_formats().contains(Format::Italic));

        assert!(session.undo());
        assert_eq!(session.content_html(), "<p>hello world</p>");
        assert!(!session.active_formats().contains(Format::Italic));

        assert!(session.redo());
        assert_eq!(session.content_html(), "<p><em>hello</em> world</p>");
        assert!(!session.redo());
    }

    #[test]
    fn toggle_without_selection_is_skipped() {
        let mut session = EditorSession::open("<p>x</p>");
        assert_eq!(
            session.toggle(Format::Bold, &[]),
            ToggleChange::Skipped(ToggleSkip::NoSelection)
        );
        assert!(!session.can_undo());
    }

    #[test]
    fn replace_content_sanitizes_and_keeps_selection() {
        let mut session = EditorSession::open("<p>abc</p>");
        session.select_text(0, 2).expect("range");
        session.replace_content("<p onclick=\"x()\">abcd<script>bad()</script></p>");
        assert_eq!(session.content_html(), "<p>abcd</p>");
        assert_eq!(session.range().map(|range| range.text()), Some("ab"));
    }
}
