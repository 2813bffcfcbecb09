//! Post tag validation.
//!
//! # Invariants
//! - Accepted tags are lowercase, non-empty, `[a-z0-9-]+`, within the length
//!   limit.
//! - A tag list never holds duplicates or more than `max_tags` entries.

use crate::config::CoreLimits;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z0-9-]+$").expect("valid tag regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagError {
    Empty,
    TooLong { len: usize, max: usize },
    InvalidCharacters(String),
    LimitReached { max: usize },
}

impl Display for TagError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "tag cannot be empty"),
            Self::TooLong { len, max } => write!(f, "tag is {len} characters; the limit is {max}"),
            Self::InvalidCharacters(tag) => write!(
                f,
                "tag `{tag}` may only contain letters, numbers and hyphens"
            ),
            Self::LimitReached { max } => write!(f, "a post can have at most {max} tags"),
        }
    }
}

impl Error for TagError {}

/// Validates one raw tag and returns its normalized form.
pub fn validate_tag(raw: &str, limits: &CoreLimits) -> Result<String, TagError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TagError::Empty);
    }
    let len = trimmed.chars().count();
    if len > limits.max_tag_chars {
        return Err(TagError::TooLong {
            len,
            max: limits.max_tag_chars,
        });
    }
    if !TAG_RE.is_match(trimmed) {
        return Err(TagError::InvalidCharacters(trimmed.to_string()));
    }
    Ok(trimmed.to_ascii_lowercase())
}

/// Returns `tags` with `raw` appended; duplicates leave the list unchanged.
pub fn add_tag(tags: &[String], raw: &str, limits: &CoreLimits) -> Result<Vec<String>, TagError> {
    if tags.len() >= limits.max_tags {
        return Err(TagError::LimitReached {
            max: limits.max_tags,
        });
    }
    let tag = validate_tag(raw, limits)?;
    let mut next = tags.to_vec();
    if !next.contains(&tag) {
        next.push(tag);
    }
    Ok(next)
}

pub fn remove_tag(tags: &[String], tag: &str) -> Vec<String> {
    tags.iter().filter(|current| *current != tag).cloned().collect()
}

/// Drops the most recent tag (backspace on an empty input).
pub fn remove_last_tag(tags: &[String]) -> Vec<String> {
    let mut next = tags.to_vec();
    next.pop();
    next
}
