//! Selection/range adapter.
//!
//! # Responsibility
//! - Read the host's current selection and normalize it into a
//!   [`SelectionRange`] bound to one document.
//! - Rebuild ranges after a mutation, from positions or from character
//!   offsets.
//!
//! # Invariants
//! - Host failures are logged and reported as "no selection"; nothing here
//!   returns an error to the caller.
//! - A range never leaves the document it was captured from.

use crate::model::document::{Bias, DocumentId, FormattedDocument, NodePath, Position};
use log::{debug, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Raw range reported by the host selection primitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostRange {
    /// Editing surface the range lives in.
    pub document: DocumentId,
    pub anchor: Position,
    pub focus: Position,
}

/// Failure reported by the host selection primitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionError {
    message: String,
}

impl SelectionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Display for SelectionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "host selection failed: {}", self.message)
    }
}

impl Error for SelectionError {}

/// Host selection primitive (the platform's live selection).
pub trait HostSelection {
    fn range_count(&self) -> usize;
    fn range_at(&self, index: usize) -> Result<HostRange, SelectionError>;
}

/// Normalized selection inside one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionRange {
    document: DocumentId,
    start: Position,
    end: Position,
    start_offset: usize,
    end_offset: usize,
    backward: bool,
    common_ancestor: NodePath,
    text: String,
}

impl SelectionRange {
    /// Builds a range from anchor/focus positions.
    ///
    /// Returns `None` when either position does not resolve in `document`.
    pub fn new(document: &FormattedDocument, anchor: Position, focus: Position) -> Option<Self> {
        let anchor_offset = document.text_offset(&anchor)?;
        let focus_offset = document.text_offset(&focus)?;
        let backward = focus_offset < anchor_offset
            || (focus_offset == anchor_offset && focus.path < anchor.path);

        let (start, end, start_offset, end_offset) = if backward {
            (focus, anchor, focus_offset, anchor_offset)
        } else {
            (anchor, focus, anchor_offset, focus_offset)
        };
        let common_ancestor = start.path.common_prefix(&end.path);
        let text = document
            .text()
            .chars()
            .skip(start_offset)
            .take(end_offset - start_offset)
            .collect();

        Some(Self {
            document: document.id(),
            start,
            end,
            start_offset,
            end_offset,
            backward,
            common_ancestor,
            text,
        })
    }

    /// Builds a range from global character offsets.
    ///
    /// The start boundary is biased forward and the end boundary backward, so
    /// a range covering exactly one wrapper's text lands inside it. Returns
    /// `None` when an offset exceeds the document text length.
    pub fn from_text_offsets(
        document: &FormattedDocument,
        anchor: usize,
        focus: usize,
    ) -> Option<Self> {
        let total = document.text_len();
        if anchor > total || focus > total {
            return None;
        }
        let (low, high) = (anchor.min(focus), anchor.max(focus));
        let start = document.position_at(low, Bias::Forward);
        let end = if low == high {
            start.clone()
        } else {
            document.position_at(high, Bias::Backward)
        };

        if focus < anchor {
            Self::new(document, end, start)
        } else {
            Self::new(document, start, end)
        }
    }

    pub fn document_id(&self) -> DocumentId {
        self.document
    }

    pub fn start(&self) -> &Position {
        &self.start
    }

    pub fn end(&self) -> &Position {
        &self.end
    }

    pub fn anchor(&self) -> &Position {
        if self.backward {
            &self.end
        } else {
            &self.start
        }
    }

    pub fn focus(&self) -> &Position {
        if self.backward {
            &self.start
        } else {
            &self.end
        }
    }

    pub fn start_offset(&self) -> usize {
        self.start_offset
    }

    pub fn end_offset(&self) -> usize {
        self.end_offset
    }

    pub fn is_backward(&self) -> bool {
        self.backward
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// Deepest node containing both boundaries.
    pub fn common_ancestor(&self) -> &NodePath {
        &self.common_ancestor
    }

    /// Selected text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether this range still resolves to the same span in `document`.
    pub fn is_valid_for(&self, document: &FormattedDocument) -> bool {
        self.document == document.id()
            && document.text_offset(&self.start) == Some(self.start_offset)
            && document.text_offset(&self.end) == Some(self.end_offset)
    }
}

/// Reads the host's first range and normalizes it against `root`.
///
/// Returns `None` when nothing is selected, when the selection belongs to a
/// different surface, when the host fails, or when the reported positions do
/// not exist in the current revision.
pub fn current_selection<H>(host: &H, root: &FormattedDocument) -> Option<SelectionRange>
where
    H: HostSelection + ?Sized,
{
    if host.range_count() == 0 {
        return None;
    }

    let raw = match host.range_at(0) {
        Ok(raw) => raw,
        Err(err) => {
            warn!(
                "event=selection_read module=editor status=degraded error_code=host_range_failed error={}",
                err
            );
            return None;
        }
    };

    if raw.document != root.id() {
        debug!("event=selection_read module=editor status=ignored reason=outside_editable_root");
        return None;
    }

    let range = SelectionRange::new(root, raw.anchor, raw.focus);
    if range.is_none() {
        debug!(
            "event=selection_read module=editor status=ignored reason=stale_position revision={}",
            root.revision()
        );
    }
    range
}

/// Reapplies `range` to a later revision of its document.
///
/// A boundary whose node no longer exists moves to its closest surviving
/// ancestor: the start to offset 0, the end to the ancestor's end. Returns
/// `None` only when `document` is a different surface.
pub fn restore(range: &SelectionRange, document: &FormattedDocument) -> Option<SelectionRange> {
    if range.document_id() != document.id() {
        return None;
    }

    let start = surviving_position(document, range.start(), Boundary::Start);
    let end = surviving_position(document, range.end(), Boundary::End);
    if range.is_backward() {
        SelectionRange::new(document, end, start)
    } else {
        SelectionRange::new(document, start, end)
    }
}

#[derive(Clone, Copy)]
enum Boundary {
    Start,
    End,
}

fn surviving_position(
    document: &FormattedDocument,
    position: &Position,
    boundary: Boundary,
) -> Position {
    if document.is_valid_position(position) {
        return position.clone();
    }

    let mut path = position.path.clone();
    while !document.contains_path(&path) {
        match path.parent() {
            Some(parent) => path = parent,
            None => break,
        }
    }

    let len = document.node_len(&path).unwrap_or(0);
    if path == position.path {
        return Position::new(path, position.offset.min(len));
    }
    match boundary {
        Boundary::Start => Position::new(path, 0),
        Boundary::End => Position::new(path, len),
    }
}
