//! Link URL normalization and wrapper attribute validation.
//!
//! # Invariants
//! - Only `http` and `https` links are ever written by the toggle engine.
//! - Wrapper attributes are limited to the format table's allow-list.

use crate::model::format::Format;
use crate::model::node::Attribute;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use url::Url;

pub const DEFAULT_LINK_TARGET: &str = "_blank";
pub const DEFAULT_LINK_REL: &str = "noopener noreferrer";
const LINK_TARGETS: &[&str] = &["_blank", "_self", "_parent", "_top"];

static SCHEME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.\-]*:(.*)$").expect("valid scheme regex")
});
static PORT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+(?:[/?#].*)?$").expect("valid port regex"));

/// Reason a link URL was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkError {
    Empty,
    Invalid { message: String },
    UnsupportedScheme(String),
}

impl Display for LinkError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "link url is empty"),
            Self::Invalid { message } => write!(f, "link url is invalid: {message}"),
            Self::UnsupportedScheme(scheme) => {
                write!(f, "link scheme `{scheme}` is not allowed; use http or https")
            }
        }
    }
}

impl Error for LinkError {}

/// Reason wrapper attributes were rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeError {
    MissingHref,
    InvalidLink(LinkError),
}

impl Display for AttributeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingHref => write!(f, "link requires an href"),
            Self::InvalidLink(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AttributeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::MissingHref => None,
            Self::InvalidLink(err) => Some(err),
        }
    }
}

impl From<LinkError> for AttributeError {
    fn from(value: LinkError) -> Self {
        Self::InvalidLink(value)
    }
}

/// Normalizes a user-entered link.
///
/// Input without a scheme gets `https://`; `host:port` counts as having no
/// scheme. The result is the parsed, serialized URL.
///
/// # Errors
/// - [`LinkError::Empty`] for blank input.
/// - [`LinkError::Invalid`] when the URL does not parse.
/// - [`LinkError::UnsupportedScheme`] for anything but `http`/`https`.
pub fn normalize_link_url(raw: &str) -> Result<String, LinkError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(LinkError::Empty);
    }

    let candidate = if has_explicit_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };
    let parsed = Url::parse(&candidate).map_err(|err| LinkError::Invalid {
        message: err.to_string(),
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed.into()),
        other => Err(LinkError::UnsupportedScheme(other.to_string())),
    }
}

fn has_explicit_scheme(value: &str) -> bool {
    SCHEME_RE
        .captures(value)
        .and_then(|captures| captures.get(1))
        .is_some_and(|rest| !PORT_RE.is_match(rest.as_str()))
}

/// Attributes for a new link wrapper pointing at `url`.
pub fn link_attributes(url: &str) -> Vec<Attribute> {
    vec![Attribute::new("href", url)]
}

/// Validates the attributes a new `format` wrapper will carry.
///
/// Attributes outside the format's allow-list are dropped. Link wrappers
/// require a valid `href` and get default `target`/`rel` values; the result
/// is in attribute-name order (`href, rel, target`), matching parsed trees.
pub fn validate_attributes(
    format: Format,
    attributes: &[Attribute],
) -> Result<Vec<Attribute>, AttributeError> {
    let allowed = format.allowed_attributes();
    let kept: Vec<&Attribute> = attributes
        .iter()
        .filter(|attribute| {
            let keep = allowed.contains(&attribute.name.as_str());
            if !keep {
                debug!(
                    "event=format_attribute module=editor status=dropped format={} attribute={}",
                    format, attribute.name
                );
            }
            keep
        })
        .collect();

    if format != Format::Link {
        return Ok(kept.into_iter().cloned().collect());
    }

    let href = normalize_link_url(
        attribute_value(&kept, "href").ok_or(AttributeError::MissingHref)?,
    )?;
    let target = attribute_value(&kept, "target")
        .map(str::to_ascii_lowercase)
        .filter(|target| LINK_TARGETS.contains(&target.as_str()))
        .unwrap_or_else(|| DEFAULT_LINK_TARGET.to_string());
    let rel = attribute_value(&kept, "rel")
        .filter(|rel| !rel.is_empty())
        .unwrap_or(DEFAULT_LINK_REL)
        .to_string();

    Ok(vec![
        Attribute::new("href", href),
        Attribute::new("rel", rel),
        Attribute::new("target", target),
    ])
}

fn attribute_value<'a>(attributes: &[&'a Attribute], name: &str) -> Option<&'a str> {
    attributes
        .iter()
        .copied()
        .find(|attribute| attribute.name == name)
        .map(|attribute| attribute.value.trim())
}
