//! Published post record shown in the blog list.

use serde::{Deserialize, Serialize};

/// One published post. `content` is stored HTML and is sanitized on render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,
    pub title: String,
    pub content: String,
    pub author: String,
    /// Publication date as `YYYY-MM-DD`.
    pub date: String,
    /// Estimated reading time in minutes.
    pub read_time: u32,
    pub category: String,
    pub tags: Vec<String>,
}
