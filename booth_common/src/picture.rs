//! Opaque encoded image buffers.
//!
//! A `Picture` is encoded bytes plus a format tag. The core never decodes
//! or transforms image data; resizing and compositing live behind the
//! camera role's backend seam. Ownership transfers with the message that
//! carries the picture; the sender must not touch it after send.

use core::fmt;
use serde::{Deserialize, Serialize};

/// Encoding of a [`Picture`]'s byte buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PictureFormat {
    /// JPEG-encoded image data.
    #[default]
    Jpeg,
    /// PNG-encoded image data.
    Png,
}

impl PictureFormat {
    /// Filename extension for this format, without the dot.
    #[inline]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
        }
    }
}

/// An in-memory encoded image.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Picture {
    format: PictureFormat,
    bytes: Vec<u8>,
}

impl Picture {
    /// Wrap already-encoded image bytes.
    pub fn new(format: PictureFormat, bytes: Vec<u8>) -> Self {
        Self { format, bytes }
    }

    /// Encoding of the byte buffer.
    #[inline]
    pub const fn format(&self) -> PictureFormat {
        self.format
    }

    /// Encoded image bytes.
    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Buffer length in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True if the buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Consume the picture, returning the raw buffer.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

// Pictures can be megabytes; keep Debug output bounded.
impl fmt::Debug for Picture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Picture")
            .field("format", &self.format)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors() {
        let pic = Picture::new(PictureFormat::Jpeg, vec![0xFF, 0xD8, 0xFF]);
        assert_eq!(pic.format(), PictureFormat::Jpeg);
        assert_eq!(pic.len(), 3);
        assert!(!pic.is_empty());
        assert_eq!(pic.into_bytes(), vec![0xFF, 0xD8, 0xFF]);
    }

    #[test]
    fn debug_does_not_dump_bytes() {
        let pic = Picture::new(PictureFormat::Jpeg, vec![0u8; 4096]);
        let dbg = format!("{pic:?}");
        assert!(dbg.contains("len"));
        assert!(dbg.len() < 128);
    }

    #[test]
    fn extensions() {
        assert_eq!(PictureFormat::Jpeg.extension(), "jpg");
        assert_eq!(PictureFormat::Png.extension(), "png");
    }
}
