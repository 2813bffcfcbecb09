//! Draft store use-case service.
//!
//! # Responsibility
//! - Save, load and clear the single in-progress post draft.
//! - Enforce the draft size cap and expiry window.
//!
//! # Invariants
//! - Never panics and never returns storage errors to the caller: failures
//!   are logged and reported through `DraftSaveOutcome` or as "no draft".
//! - Any slot that cannot be returned as a valid, unexpired draft is removed
//!   on load.
//! - Draft content is never logged; only sizes and timestamps are.

use crate::clock::{Clock, SystemClock};
use crate::config::CoreLimits;
use crate::model::draft::{decode_envelope, encode_envelope, DraftData, DraftEnvelope};
use crate::repo::draft_repo::{DraftSlotRepository, POST_DRAFT_KEY};
use log::{error, info, warn};

/// Result of a save request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftSaveOutcome {
    /// Stored; the draft expires at `expiry` (epoch ms).
    Saved { expiry: i64 },
    /// Serialized data is longer than `limit` UTF-16 code units; nothing was
    /// written.
    TooLarge { size: usize, limit: usize },
    /// Serialization or storage failed; nothing was written.
    Failed(String),
}

impl DraftSaveOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved { .. })
    }
}

/// Draft service facade over a slot repository and a clock.
pub struct DraftService<R: DraftSlotRepository, C: Clock = SystemClock> {
    repo: R,
    clock: C,
    ttl_ms: i64,
    max_chars: usize,
}

impl<R: DraftSlotRepository> DraftService<R> {
    /// Creates a service on the system clock with default limits.
    pub fn new(repo: R) -> Self {
        Self::with_clock(repo, SystemClock)
    }
}

impl<R: DraftSlotRepository, C: Clock> DraftService<R, C> {
    pub fn with_clock(repo: R, clock: C) -> Self {
        let limits = CoreLimits::default();
        Self {
            repo,
            clock,
            ttl_ms: limits.draft_ttl_ms,
            max_chars: limits.max_draft_chars,
        }
    }

    /// Overrides the expiry window and size cap.
    pub fn with_limits(mut self, limits: &CoreLimits) -> Self {
        self.ttl_ms = limits.draft_ttl_ms;
        self.max_chars = limits.max_draft_chars;
        self
    }

    /// Persists `data`, replacing any previous draft.
    pub fn save(&self, data: &DraftData) -> DraftSaveOutcome {
        let serialized = match serde_json::to_string(data) {
            Ok(serialized) => serialized,
            Err(err) => return self.save_failed("draft_encode_failed", err.to_string()),
        };
        let size = serialized.encode_utf16().count();
        if size > self.max_chars {
            error!(
                "event=draft_save module=draft status=error error_code=draft_too_large size={} limit={}",
                size, self.max_chars
            );
            return DraftSaveOutcome::TooLarge {
                size,
                limit: self.max_chars,
            };
        }

        let expiry = self.clock.now_ms().saturating_add(self.ttl_ms);
        let payload = match encode_envelope(&DraftEnvelope::new(data.clone(), expiry)) {
            Ok(payload) => payload,
            Err(err) => return self.save_failed("draft_encode_failed", err.to_string()),
        };
        if let Err(err) = self.repo.write_slot(POST_DRAFT_KEY, &payload) {
            return self.save_failed("draft_write_failed", err.to_string());
        }

        info!(
            "event=draft_save module=draft status=ok size={} expiry={}",
            size, expiry
        );
        DraftSaveOutcome::Saved { expiry }
    }

    /// Returns the stored draft when it is well-formed and unexpired.
    ///
    /// Absent, malformed, expired or unreadable slots yield `None`; all but
    /// the absent case also clear the slot.
    pub fn load(&self) -> Option<DraftData> {
        let raw = match self.repo.read_slot(POST_DRAFT_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                error!(
                    "event=draft_load module=draft status=error error_code=draft_read_failed error={}",
                    err
                );
                self.clear();
                return None;
            }
        };

        let envelope = match decode_envelope(&raw) {
            Ok(envelope) => envelope,
            Err(err) => {
                warn!(
                    "event=draft_load module=draft status=discarded error_code=draft_malformed error={}",
                    err
                );
                self.clear();
                return None;
            }
        };

        let now = self.clock.now_ms();
        if envelope.is_expired(now) {
            info!(
                "event=draft_load module=draft status=expired expiry={} now={}",
                envelope.expiry, now
            );
            self.clear();
            return None;
        }

        info!(
            "event=draft_load module=draft status=ok version={}",
            envelope.version
        );
        Some(envelope.data)
    }

    /// Removes the stored draft, if any.
    pub fn clear(&self) {
        match self.repo.delete_slot(POST_DRAFT_KEY) {
            Ok(removed) => info!("event=draft_clear module=draft status=ok removed={removed}"),
            Err(err) => error!(
                "event=draft_clear module=draft status=error error_code=draft_delete_failed error={}",
                err
            ),
        }
    }

    fn save_failed(&self, code: &str, message: String) -> DraftSaveOutcome {
        error!(
            "event=draft_save module=draft status=error error_code={} error={}",
            code, message
        );
        DraftSaveOutcome::Failed(message)
    }
}
