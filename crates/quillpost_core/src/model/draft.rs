//! Persisted draft envelope.
//!
//! # Responsibility
//! - Define the draft payload saved by the authoring form.
//! - Decode stored envelopes, rejecting any shape that is not a complete draft.
//!
//! # Invariants
//! - An envelope with missing `data`, missing/non-numeric/zero `expiry`, or a
//!   `data` value that does not match [`DraftData`] is malformed.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Envelope format written by this crate.
pub const DRAFT_VERSION: &str = "1.0";
/// Category preselected for a new post.
pub const DEFAULT_CATEGORY: &str = "general";

/// In-progress post fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftData {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub category: String,
}

impl Default for DraftData {
    fn default() -> Self {
        Self {
            title: String::new(),
            content: String::new(),
            tags: Vec::new(),
            category: DEFAULT_CATEGORY.to_string(),
        }
    }
}

/// Versioned, expiring record stored in the draft slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftEnvelope {
    pub data: DraftData,
    /// Epoch milliseconds after which the draft is discarded.
    pub expiry: i64,
    pub version: String,
}

impl DraftEnvelope {
    pub fn new(data: DraftData, expiry: i64) -> Self {
        Self {
            data,
            expiry,
            version: DRAFT_VERSION.to_string(),
        }
    }

    pub fn is_expired(&self, now_ms: i64) -> bool {
        now_ms > self.expiry
    }
}

/// Reason a stored envelope was rejected.
#[derive(Debug)]
pub enum DraftDecodeError {
    Json(serde_json::Error),
    MissingData,
    InvalidExpiry,
    InvalidData(serde_json::Error),
}

impl Display for DraftDecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "draft envelope is not valid json: {err}"),
            Self::MissingData => write!(f, "draft envelope has no data"),
            Self::InvalidExpiry => write!(f, "draft envelope has no valid expiry"),
            Self::InvalidData(err) => write!(f, "draft data has an invalid shape: {err}"),
        }
    }
}

impl Error for DraftDecodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) | Self::InvalidData(err) => Some(err),
            Self::MissingData | Self::InvalidExpiry => None,
        }
    }
}

/// Serializes an envelope for storage.
pub fn encode_envelope(envelope: &DraftEnvelope) -> Result<String, serde_json::Error> {
    serde_json::to_string(envelope)
}

/// Decodes a stored envelope.
///
/// The stored `version` is informational; a missing one reads as the current
/// version.
pub fn decode_envelope(raw: &str) -> Result<DraftEnvelope, DraftDecodeError> {
    let value: Value = serde_json::from_str(raw).map_err(DraftDecodeError::Json)?;

    let data = match value.get("data") {
        Some(data) if data.is_object() => data.clone(),
        _ => return Err(DraftDecodeError::MissingData),
    };
    let expiry = value
        .get("expiry")
        .and_then(numeric_millis)
        .filter(|expiry| *expiry != 0)
        .ok_or(DraftDecodeError::InvalidExpiry)?;
    let version = value
        .get("version")
        .and_then(Value::as_str)
        .unwrap_or(DRAFT_VERSION)
        .to_string();
    let data: DraftData = serde_json::from_value(data).map_err(DraftDecodeError::InvalidData)?;

    Ok(DraftEnvelope {
        data,
        expiry,
        version,
    })
}

fn numeric_millis(value: &Value) -> Option<i64> {
    if let Some(millis) = value.as_i64() {
        return Some(millis);
    }
    value
        .as_f64()
        .filter(|millis| millis.is_finite())
        .map(|millis| millis.trunc() as i64)
}
