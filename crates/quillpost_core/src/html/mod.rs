//! HTML codec for the content subset exchanged with the authoring surface.
//!
//! # Responsibility
//! - Parse untrusted HTML into `Node` trees with html5ever.
//! - Serialize trees back to HTML with stable escaping.
//!
//! # Invariants
//! - Parsing never fails; malformed markup degrades to text or is dropped.

mod parser;
mod serializer;

pub use parser::parse_fragment;
pub use serializer::{serialize_fragment, VOID_ELEMENTS};
