//! Domain model for the authoring engine.
//!
//! # Responsibility
//! - Define the content tree, format table and document revision types used
//!   by the sanitizer and the editor.
//! - Define the persisted draft envelope and the post/comment records shown
//!   by the blog surface.
//!
//! # Invariants
//! - Content trees reaching the editor have been sanitized.
//! - Documents are immutable per revision; edits derive a new revision.

pub mod comment;
pub mod document;
pub mod draft;
pub mod format;
pub mod node;
pub mod post;
