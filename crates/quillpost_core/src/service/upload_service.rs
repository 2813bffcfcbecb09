//! Image upload validation.

use crate::config::CoreLimits;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    UnsupportedType(String),
    TooLarge { size: u64, max: u64 },
}

impl Display for UploadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedType(mime) => write!(
                f,
                "unsupported image type `{mime}`; use JPEG, PNG, GIF or WebP"
            ),
            Self::TooLarge { size, max } => {
                write!(f, "image is {size} bytes; the limit is {max} bytes")
            }
        }
    }
}

impl Error for UploadError {}

/// Checks an image's declared MIME type and size before upload.
pub fn validate_image(mime: &str, size_bytes: u64, limits: &CoreLimits) -> Result<(), UploadError> {
    let mime = mime.trim().to_ascii_lowercase();
    if !ALLOWED_IMAGE_TYPES.contains(&mime.as_str()) {
        return Err(UploadError::UnsupportedType(mime));
    }
    if size_bytes > limits.max_image_bytes {
        return Err(UploadError::TooLarge {
            size: size_bytes,
            max: limits.max_image_bytes,
        });
    }
    Ok(())
}
