//! Flutter-facing FFI crate for Quillpost.

pub mod api;
