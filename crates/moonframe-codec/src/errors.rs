//! Codec and frame library errors.

use thiserror::Error;

/// Errors produced while encoding a single bitmap.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    /// Bitmap width cannot be split into whole 4-pixel runs.
    #[error("bitmap width {width} is not a multiple of 4")]
    UnalignedWidth {
        /// Offending width in pixels.
        width: u32,
    },

    /// Pixel buffer does not cover `width * height` pixels.
    #[error("pixel buffer holds {actual} bytes, expected {expected} for a {width}x{height} bitmap")]
    BufferSize {
        /// Bitmap width in pixels.
        width: u32,
        /// Bitmap height in pixels.
        height: u32,
        /// Expected buffer length.
        expected: usize,
        /// Actual buffer length.
        actual: usize,
    },
}

/// Errors produced while building a [`crate::FrameSet`].
///
/// Any of these aborts the profile; no partial frame set is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LibraryError {
    /// A source bitmap failed to encode.
    #[error("failed to encode {identifier}: {source}")]
    Encoding {
        /// Identifier of the offending bitmap.
        identifier: String,
        /// Underlying codec error.
        #[source]
        source: EncodingError,
    },

    /// Two bitmaps carry the same identifier, so playback order is ambiguous.
    #[error("duplicate frame identifier {0}")]
    DuplicateIdentifier(String),

    /// No bitmaps were supplied.
    #[error("frame set {0} has no frames")]
    Empty(String),

    /// Profile name not recognised.
    #[error("unknown profile {0:?}, expected small or big")]
    UnknownProfile(String),
}
