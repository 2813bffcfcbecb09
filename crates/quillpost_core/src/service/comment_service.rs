//! Comment submission use-case service.
//!
//! # Responsibility
//! - Validate, rate-limit and sanitize reader comments.
//! - Keep accepted comments in submission order.
//!
//! # Invariants
//! - Accepted comment text is render-safe HTML text: the comment policy
//!   keeps no tags and markup characters stay escaped.
//! - Accepted submissions are at least `comment_interval_ms` apart.

use crate::config::CoreLimits;
use crate::model::comment::Comment;
use crate::sanitize::{sanitize, SanitizationPolicy};
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Reason a comment was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentError {
    /// Submitted before the minimum interval elapsed.
    TooSoon { retry_after_ms: i64 },
    Empty,
    TooLong { len: usize, max: usize },
}

impl Display for CommentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooSoon { retry_after_ms } => write!(
                f,
                "please wait {} seconds before commenting again",
                (retry_after_ms + 999) / 1000
            ),
            Self::Empty => write!(f, "comment cannot be empty"),
            Self::TooLong { len, max } => {
                write!(f, "comment is {len} characters; the limit is {max}")
            }
        }
    }
}

impl Error for CommentError {}

/// In-memory comment thread for one post.
#[derive(Debug)]
pub struct CommentService {
    comments: Vec<Comment>,
    last_accepted_at: Option<i64>,
    max_chars: usize,
    interval_ms: i64,
}

impl Default for CommentService {
    fn default() -> Self {
        Self::with_limits(&CoreLimits::default())
    }
}

impl CommentService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: &CoreLimits) -> Self {
        Self {
            comments: Vec::new(),
            last_accepted_at: None,
            max_chars: limits.max_comment_chars,
            interval_ms: limits.comment_interval_ms,
        }
    }

    /// Submits `raw` at time `now_ms` and returns the accepted comment.
    ///
    /// # Errors
    /// - [`CommentError::TooSoon`] inside the interval after the last
    ///   accepted comment.
    /// - [`CommentError::Empty`] when nothing but whitespace or markup remains.
    /// - [`CommentError::TooLong`] when the trimmed text exceeds the limit.
    pub fn submit(&mut self, raw: &str, now_ms: i64) -> Result<&Comment, CommentError> {
        if let Some(last) = self.last_accepted_at {
            let elapsed = now_ms - last;
            if elapsed < self.interval_ms {
                debug!("event=comment_submit module=comment status=rejected reason=too_soon");
                return Err(CommentError::TooSoon {
                    retry_after_ms: self.interval_ms - elapsed,
                });
            }
        }

        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CommentError::Empty);
        }
        let len = trimmed.chars().count();
        if len > self.max_chars {
            return Err(CommentError::TooLong {
                len,
                max: self.max_chars,
            });
        }

        let text = sanitize(trimmed, SanitizationPolicy::comment())
            .trim()
            .to_string();
        if text.is_empty() {
            return Err(CommentError::Empty);
        }

        self.last_accepted_at = Some(now_ms);
        self.comments.push(Comment {
            id: Uuid::new_v4(),
            text,
            created_at: now_ms,
        });
        info!(
            "event=comment_submit module=comment status=ok count={}",
            self.comments.len()
        );
        Ok(&self.comments[self.comments.len() - 1])
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }
}
