//! Reader comment record.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Accepted comment. `text` is sanitized HTML with no tags left, so `<`, `>`
/// and `&` arrive escaped and the value can be rendered as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub text: String,
    /// Epoch milliseconds of acceptance.
    pub created_at: i64,
}
