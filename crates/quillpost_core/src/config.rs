//! Core limits.
//!
//! # Responsibility
//! - Group every numeric limit enforced by core in one value so hosts can
//!   tune them in one place.
//!
//! # Invariants
//! - `CoreLimits::default()` carries the product limits; tests may shrink them.

pub const DRAFT_TTL_MS: i64 = 24 * 60 * 60 * 1000;
pub const MAX_DRAFT_CHARS: usize = 50_000;
pub const DEFAULT_PREVIEW_CHARS: usize = 200;
pub const MAX_COMMENT_CHARS: usize = 1_000;
pub const COMMENT_INTERVAL_MS: i64 = 30_000;
pub const MAX_TAGS: usize = 50;
pub const MAX_TAG_CHARS: usize = 30;
pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;
pub const HISTORY_DEPTH: usize = 100;

/// Limits enforced by core services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreLimits {
    /// Lifetime of a saved draft in milliseconds.
    pub draft_ttl_ms: i64,
    /// Maximum serialized draft `data` size, in UTF-16 code units (the unit
    /// JavaScript string lengths use).
    pub max_draft_chars: usize,
    pub preview_chars: usize,
    pub max_comment_chars: usize,
    /// Minimum interval between accepted comments in milliseconds.
    pub comment_interval_ms: i64,
    pub max_tags: usize,
    pub max_tag_chars: usize,
    pub max_image_bytes: u64,
    /// Undo entries kept per editor session.
    pub history_depth: usize,
}

impl Default for CoreLimits {
    fn default() -> Self {
        Self {
            draft_ttl_ms: DRAFT_TTL_MS,
            max_draft_chars: MAX_DRAFT_CHARS,
            preview_chars: DEFAULT_PREVIEW_CHARS,
            max_comment_chars: MAX_COMMENT_CHARS,
            comment_interval_ms: COMMENT_INTERVAL_MS,
            max_tags: MAX_TAGS,
            max_tag_chars: MAX_TAG_CHARS,
            max_image_bytes: MAX_IMAGE_BYTES,
            history_depth: HISTORY_DEPTH,
        }
    }
}
