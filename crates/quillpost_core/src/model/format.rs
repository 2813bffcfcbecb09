//! Format identifiers and the authoritative format/tag/attribute table.
//!
//! # Responsibility
//! - Map each toolbar format to its structural tag, tag aliases and the
//!   attributes a wrapper of that format may carry.
//! - Provide `FormatSet`, the derived "active formats" value.
//!
//! # Invariants
//! - Detector, toggle engine and editor sanitization policy all read this one
//!   table; no other module maps tags to formats.
//! - A tag maps to at most one format.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

/// Inline structural format that can be toggled on a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    Bold,
    Italic,
    Heading,
    Link,
    Quote,
    Code,
}

struct FormatSpec {
    format: Format,
    label: &'static str,
    tag: &'static str,
    aliases: &'static [&'static str],
    attributes: &'static [&'static str],
    inline: bool,
}

const FORMAT_TABLE: &[FormatSpec] = &[
    FormatSpec {
        format: Format::Bold,
        label: "bold",
        tag: "strong",
        aliases: &["b"],
        attributes: &[],
        inline: true,
    },
    FormatSpec {
        format: Format::Italic,
        label: "italic",
        tag: "em",
        aliases: &["i"],
        attributes: &[],
        inline: true,
    },
    FormatSpec {
        format: Format::Heading,
        label: "heading",
        tag: "h3",
        aliases: &["h1", "h2"],
        attributes: &[],
        inline: false,
    },
    FormatSpec {
        format: Format::Link,
        label: "link",
        tag: "a",
        aliases: &[],
        attributes: &["href", "target", "rel"],
        inline: true,
    },
    FormatSpec {
        format: Format::Quote,
        label: "quote",
        tag: "blockquote",
        aliases: &[],
        attributes: &[],
        inline: false,
    },
    FormatSpec {
        format: Format::Code,
        label: "code",
        tag: "code",
        aliases: &[],
        attributes: &[],
        inline: true,
    },
];

impl Format {
    pub const ALL: [Format; 6] = [
        Format::Bold,
        Format::Italic,
        Format::Heading,
        Format::Link,
        Format::Quote,
        Format::Code,
    ];

    fn spec(self) -> &'static FormatSpec {
        FORMAT_TABLE
            .iter()
            .find(|spec| spec.format == self)
            .unwrap_or(&FORMAT_TABLE[0])
    }

    /// Stable lowercase identifier (`bold|italic|heading|link|quote|code`).
    pub fn as_str(self) -> &'static str {
        self.spec().label
    }

    /// Parses an identifier produced by [`Format::as_str`].
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        FORMAT_TABLE
            .iter()
            .find(|spec| spec.label == normalized)
            .map(|spec| spec.format)
    }

    /// Tag used when this format wraps a selection.
    pub fn tag(self) -> &'static str {
        self.spec().tag
    }

    /// Whether `tag` renders this format (primary tag or alias).
    pub fn matches_tag(self, tag: &str) -> bool {
        let spec = self.spec();
        spec.tag == tag || spec.aliases.contains(&tag)
    }

    /// Attributes a wrapper of this format may carry.
    pub fn allowed_attributes(self) -> &'static [&'static str] {
        self.spec().attributes
    }

    /// Inline formats may be merged with identical neighbours.
    pub fn is_inline(self) -> bool {
        self.spec().inline
    }

    /// Maps a structural tag (or alias) to its format.
    pub fn from_tag(tag: &str) -> Option<Self> {
        FORMAT_TABLE
            .iter()
            .find(|spec| spec.tag == tag || spec.aliases.contains(&tag))
            .map(|spec| spec.format)
    }
}

impl Display for Format {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unordered set of formats active across a selection.
///
/// Always derived from the current tree and range; never cached.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatSet(BTreeSet<Format>);

impl FormatSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, format: Format) -> bool {
        self.0.insert(format)
    }

    pub fn contains(&self, format: Format) -> bool {
        self.0.contains(&format)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Format> + '_ {
        self.0.iter().copied()
    }

    /// Identifiers for UI consumption.
    pub fn labels(&self) -> Vec<&'static str> {
        self.iter().map(Format::as_str).collect()
    }
}

impl FromIterator<Format> for FormatSet {
    fn from_iter<T: IntoIterator<Item = Format>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
