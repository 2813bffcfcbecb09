//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Keep the editor stateless across the boundary: every call carries the
//!   current HTML plus character offsets of the selection.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Failures are reported through `ok` + `message` envelopes, never thrown.

use log::warn;
use quillpost_core::db::open_db;
use quillpost_core::model::node::Attribute;
use quillpost_core::service::tag_service::validate_tag;
use quillpost_core::{
    active_formats, core_version as core_version_inner, init_logging as init_logging_inner,
    ping as ping_inner, sanitize, toggle, truncate, CoreLimits, DraftData,
    DraftSaveOutcome, DraftService, Format, FormattedDocument, SanitizationPolicy,
    SelectionRange, SqliteDraftSlotRepository, ToggleChange,
};
use std::path::PathBuf;
use std::sync::OnceLock;

const DRAFT_DB_FILE_NAME: &str = "quillpost_drafts.sqlite3";
static DRAFT_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Sanitizes stored post HTML with the article render policy.
#[flutter_rust_bridge::frb(sync)]
pub fn sanitize_article_html(html: String) -> String {
    sanitize(&html, SanitizationPolicy::article())
}

/// Strips every tag from comment input; the result stays HTML-escaped.
#[flutter_rust_bridge::frb(sync)]
pub fn sanitize_comment_text(text: String) -> String {
    sanitize(&text, SanitizationPolicy::comment())
}

/// Plain-text preview for the post list.
///
/// `max_chars` defaults to the core preview length; missing HTML yields an
/// empty string.
#[flutter_rust_bridge::frb(sync)]
pub fn preview_text(html: Option<String>, max_chars: Option<u32>) -> String {
    let max_chars = max_chars.map_or(CoreLimits::default().preview_chars, |value| value as usize);
    html.map(|html| truncate(&html, max_chars))
        .unwrap_or_default()
}

/// Formats active over the `[start, end)` character span of editor HTML.
///
/// Returns format identifiers (`bold|italic|heading|link|quote|code`); an
/// out-of-range span yields an empty list.
#[flutter_rust_bridge::frb(sync)]
pub fn editor_active_formats(html: String, start: u32, end: u32) -> Vec<String> {
    let document = FormattedDocument::from_html(&html, SanitizationPolicy::editor());
    let range = SelectionRange::from_text_offsets(&document, start as usize, end as usize);
    active_formats(range.as_ref(), &document)
        .labels()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Toggle response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorToggleResponse {
    /// Whether the document changed.
    pub ok: bool,
    /// Editor HTML after the toggle (unchanged input, sanitized, when skipped).
    pub html: String,
    /// Selection start after the toggle, in characters.
    pub start: u32,
    /// Selection end after the toggle, in characters.
    pub end: u32,
    /// Formats active on the resulting selection.
    pub formats: Vec<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

/// Toggles `format` over the `[start, end)` character span of editor HTML.
///
/// `href` is required when `format` is `link`.
#[flutter_rust_bridge::frb(sync)]
pub fn editor_toggle_format(
    html: String,
    format: String,
    start: u32,
    end: u32,
    href: Option<String>,
) -> EditorToggleResponse {
    let document = FormattedDocument::from_html(&html, SanitizationPolicy::editor());
    let Some(format) = Format::parse(&format) else {
        return EditorToggleResponse {
            ok: false,
            html: document.to_html(),
            start,
            end,
            formats: Vec::new(),
            message: format!("unknown format `{format}`"),
        };
    };

    let range = SelectionRange::from_text_offsets(&document, start as usize, end as usize);
    let attributes: Vec<Attribute> = href
        .map(|href| vec![Attribute::new("href", href)])
        .unwrap_or_default();
    let outcome = toggle(format, &attributes, range.as_ref(), &document);

    let (start, end) = outcome.range.as_ref().map_or((start, end), |range| {
        (
            u32::try_from(range.start_offset()).unwrap_or(start),
            u32::try_from(range.end_offset()).unwrap_or(end),
        )
    });
    let message = match &outcome.change {
        ToggleChange::Added(_) => format!("{format} added"),
        ToggleChange::Removed { .. } => format!("{format} removed"),
        ToggleChange::Skipped(reason) => format!("{format} unchanged: {reason}"),
    };
    EditorToggleResponse {
        ok: outcome.is_applied(),
        html: outcome.document.to_html(),
        start,
        end,
        formats: outcome
            .formats
            .labels()
            .into_iter()
            .map(str::to_string)
            .collect(),
        message,
    }
}

/// Draft fields crossing the FFI boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftPayload {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub category: String,
}

/// Generic action response envelope for draft commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Expiry (epoch ms) of a saved draft.
    pub expiry: Option<i64>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

/// Draft load response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftLoadResponse {
    /// Whether storage could be consulted.
    pub ok: bool,
    /// Restored draft; `None` when absent, expired or discarded as malformed.
    pub draft: Option<DraftPayload>,
    pub message: String,
}

/// Saves the in-progress post draft.
#[flutter_rust_bridge::frb(sync)]
pub fn draft_save(payload: DraftPayload) -> DraftActionResponse {
    let data = DraftData {
        title: payload.title,
        content: payload.content,
        tags: payload.tags,
        category: payload.category,
    };
    let outcome = match with_draft_service(|service| service.save(&data)) {
        Ok(outcome) => outcome,
        Err(message) => return action_failure(message),
    };
    match outcome {
        DraftSaveOutcome::Saved { expiry } => DraftActionResponse {
            ok: true,
            expiry: Some(expiry),
            message: "draft saved".to_string(),
        },
        DraftSaveOutcome::TooLarge { size, limit } => action_failure(format!(
            "draft is too large to save ({size} characters, limit {limit})"
        )),
        DraftSaveOutcome::Failed(message) => action_failure(format!("draft_save failed: {message}")),
    }
}

/// Restores the in-progress post draft.
#[flutter_rust_bridge::frb(sync)]
pub fn draft_load() -> DraftLoadResponse {
    match with_draft_service(|service| service.load()) {
        Ok(draft) => DraftLoadResponse {
            ok: true,
            message: if draft.is_some() {
                "draft restored".to_string()
            } else {
                "no draft".to_string()
            },
            draft: draft.map(|data| DraftPayload {
                title: data.title,
                content: data.content,
                tags: data.tags,
                category: data.category,
            }),
        },
        Err(message) => DraftLoadResponse {
            ok: false,
            draft: None,
            message,
        },
    }
}

/// Removes the in-progress post draft.
#[flutter_rust_bridge::frb(sync)]
pub fn draft_clear() -> DraftActionResponse {
    match with_draft_service(|service| service.clear()) {
        Ok(()) => DraftActionResponse {
            ok: true,
            expiry: None,
            message: "draft cleared".to_string(),
        },
        Err(message) => action_failure(message),
    }
}

/// Tag validation response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagValidateResponse {
    pub ok: bool,
    /// Normalized tag when valid.
    pub tag: Option<String>,
    pub message: String,
}

/// Validates and normalizes one tag typed by the author.
#[flutter_rust_bridge::frb(sync)]
pub fn tag_validate(raw: String) -> TagValidateResponse {
    match validate_tag(&raw, &CoreLimits::default()) {
        Ok(tag) => TagValidateResponse {
            ok: true,
            tag: Some(tag),
            message: "ok".to_string(),
        },
        Err(err) => TagValidateResponse {
            ok: false,
            tag: None,
            message: err.to_string(),
        },
    }
}

fn action_failure(message: String) -> DraftActionResponse {
    DraftActionResponse {
        ok: false,
        expiry: None,
        message,
    }
}

fn with_draft_service<T>(
    run: impl FnOnce(&DraftService<SqliteDraftSlotRepository<'_>>) -> T,
) -> Result<T, String> {
    let conn = open_db(resolve_draft_db_path()).map_err(|err| {
        warn!(
            "event=ffi_draft module=ffi status=error error_code=db_open_failed error={}",
            err
        );
        format!("draft storage unavailable: {err}")
    })?;
    let repo = SqliteDraftSlotRepository::try_new(&conn)
        .map_err(|err| format!("draft storage unavailable: {err}"))?;
    Ok(run(&DraftService::new(repo)))
}

fn resolve_draft_db_path() -> PathBuf {
    DRAFT_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("QUILLPOST_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DRAFT_DB_FILE_NAME)
        })
        .clone()
}
