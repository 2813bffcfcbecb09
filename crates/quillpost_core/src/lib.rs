//! Core content engine for Quillpost.
//! This crate owns sanitization, the rich-text editing engine, previews and
//! draft persistence; hosts reach it through the FFI crate or the CLI.

pub mod clock;
pub mod config;
pub mod db;
pub mod editor;
pub mod html;
pub mod logging;
pub mod model;
pub mod preview;
pub mod repo;
pub mod sanitize;
pub mod service;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::CoreLimits;
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use editor::{
    active_formats, current_selection, restore, toggle, EditorSession, HostRange, HostSelection,
    SelectionError, SelectionRange, ToggleChange, ToggleOutcome, ToggleSkip, WrapStrategy,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::document::{DocumentId, FormattedDocument, NodePath, Position};
pub use model::draft::DraftData;
pub use model::format::{Format, FormatSet};
pub use preview::truncate;
pub use repo::draft_repo::{DraftSlotRepository, SqliteDraftSlotRepository};
pub use repo::{RepoError, RepoResult};
pub use sanitize::{plain_text, sanitize, SanitizationPolicy};
pub use service::draft_service::{DraftSaveOutcome, DraftService};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
