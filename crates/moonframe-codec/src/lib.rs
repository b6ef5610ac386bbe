//! Bitmap to glyph codec for moonframe.
//!
//! Each animation still is a monochrome bitmap. Rows are cut into runs of four
//! pixels and every run is replaced by one moon-phase glyph, so a 48 pixel wide
//! frame becomes 12 glyphs per line. The mapping is a fixed 16-entry table; it
//! is a visual contract and is not derived from any rule.
//!
//! Encoding happens once at startup. The resulting [`FrameSet`]s are immutable
//! and shared read-only by every playback session.
//!
//! # Components
//!
//! - [`glyph`]: the 16-entry glyph table and the [`Glyph`] type
//! - [`bitmap`]: raw decoded bitmaps handed over by the loader
//! - [`frame`]: bitmap to [`Frame`] encoding
//! - [`library`]: ordered [`FrameSet`]s per [`Profile`]
//! - [`errors`]: encoding and library errors

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod bitmap;
pub mod errors;
pub mod frame;
pub mod glyph;
pub mod library;

pub use bitmap::RawBitmap;
pub use errors::{EncodingError, LibraryError};
pub use frame::{Frame, encode_frame};
pub use glyph::{Glyph, encode_pixel_quad};
pub use library::{FrameLibrary, FrameSet, Layout, Profile};
