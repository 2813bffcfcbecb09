//! Rich-text editing engine.
//!
//! # Responsibility
//! - Normalize host selections into document ranges.
//! - Detect and toggle structural formats over a selection.
//! - Track editing sessions with undo/redo.
//!
//! # Invariants
//! - Operations are synchronous and run on the caller's thread.
//! - Selection problems degrade to no-ops; nothing here panics on user input.
//!
//! # See also
//! - `crate::model::format` for the format/tag table.

pub mod detect;
pub mod history;
pub mod link;
pub mod selection;
pub mod session;
pub mod toggle;
mod tree_ops;

pub use detect::active_formats;
pub use link::{normalize_link_url, AttributeError, LinkError};
pub use selection::{current_selection, restore, HostRange, HostSelection, SelectionError, SelectionRange};
pub use session::EditorSession;
pub use toggle::{toggle, ToggleChange, ToggleOutcome, ToggleSkip};
pub use tree_ops::WrapStrategy;
