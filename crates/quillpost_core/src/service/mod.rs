//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repositories and pure helpers into use-case level APIs.
//! - Keep FFI and UI layers decoupled from storage details.

pub mod comment_service;
pub mod draft_service;
pub mod post_service;
pub mod tag_service;
pub mod upload_service;
