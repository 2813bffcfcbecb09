//! Allow-list sanitization policies.
//!
//! # Invariants
//! - Policies are immutable once built; the shared ones live in statics.
//! - An attribute can only be allowed on a tag that is itself allowed.

use crate::model::format::Format;
use once_cell::sync::Lazy;
use std::collections::{BTreeMap, BTreeSet};

/// Tags admitted by the article render policy.
const ARTICLE_TAGS: &[&str] = &[
    "p", "b", "i", "em", "strong", "a", "h1", "h2", "h3", "ul", "li",
];
const ARTICLE_ANCHOR_ATTRIBUTES: &[&str] = &["href", "target"];

static ARTICLE_POLICY: Lazy<SanitizationPolicy> = Lazy::new(|| {
    ARTICLE_TAGS
        .iter()
        .copied()
        .fold(SanitizationPolicy::new("article"), |policy, tag| {
            policy.allow(tag, &[])
        })
        .allow("a", ARTICLE_ANCHOR_ATTRIBUTES)
});

static EDITOR_POLICY: Lazy<SanitizationPolicy> = Lazy::new(|| {
    let mut policy = ARTICLE_POLICY.renamed("editor");
    for format in Format::ALL {
        policy = policy.allow(format.tag(), format.allowed_attributes());
    }
    policy
});

static COMMENT_POLICY: Lazy<SanitizationPolicy> = Lazy::new(|| SanitizationPolicy::new("comment"));

/// Immutable allow-list of tags and per-tag attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizationPolicy {
    name: &'static str,
    tags: BTreeMap<&'static str, BTreeSet<&'static str>>,
}

impl SanitizationPolicy {
    /// Creates an empty policy (everything is stripped to text).
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            tags: BTreeMap::new(),
        }
    }

    /// Returns a policy that also admits `tag` with `attributes`.
    ///
    /// Allowing an already allowed tag extends its attribute set.
    pub fn allow(mut self, tag: &'static str, attributes: &[&'static str]) -> Self {
        self.tags
            .entry(tag)
            .or_default()
            .extend(attributes.iter().copied());
        self
    }

    fn renamed(&self, name: &'static str) -> Self {
        Self {
            name,
            tags: self.tags.clone(),
        }
    }

    /// Render policy for article bodies.
    pub fn article() -> &'static SanitizationPolicy {
        &ARTICLE_POLICY
    }

    /// Article policy plus every format-table tag, so toggled formats survive
    /// the editor round trip.
    pub fn editor() -> &'static SanitizationPolicy {
        &EDITOR_POLICY
    }

    /// Empty allow-list: comments render as plain text.
    pub fn comment() -> &'static SanitizationPolicy {
        &COMMENT_POLICY
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn allows_tag(&self, tag: &str) -> bool {
        self.tags.contains_key(tag)
    }

    pub fn allows_attribute(&self, tag: &str, attribute: &str) -> bool {
        self.tags
            .get(tag)
            .is_some_and(|attributes| attributes.contains(attribute))
    }

    /// Returns whether the policy admits no tags at all.
    pub fn is_text_only(&self) -> bool {
        self.tags.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::SanitizationPolicy;

    #[test]
    fn article_policy_limits_attributes_to_anchors() {
        let policy = SanitizationPolicy::article();
        assert!(policy.allows_tag("strong"));
        assert!(!policy.allows_tag("blockquote"));
        assert!(policy.allows_attribute("a", "href"));
        assert!(!policy.allows_attribute("a", "rel"));
        assert!(!policy.allows_attribute("p", "href"));
    }

    #[test]
    fn editor_policy_extends_article_policy_with_format_tags() {
        let policy = SanitizationPolicy::editor();
        assert!(policy.allows_tag("blockquote"));
        assert!(policy.allows_tag("code"));
        assert!(policy.allows_tag("ul"));
        assert!(policy.allows_attribute("a", "rel"));
    }

    #[test]
    fn comment_policy_is_text_only() {
        assert!(SanitizationPolicy::comment().is_text_only());
    }
}
