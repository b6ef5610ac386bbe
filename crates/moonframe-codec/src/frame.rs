//! Bitmap to frame encoding.

use crate::{
    bitmap::RawBitmap,
    errors::EncodingError,
    glyph::{Glyph, encode_pixel_quad},
};

/// One encoded animation still.
///
/// Rows of glyphs, top to bottom. The rendered text is built once at
/// construction: every row is followed by `'\n'`, the last one included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    rows: Vec<Box<[Glyph]>>,
    text: String,
}

impl Frame {
    fn from_rows(rows: Vec<Box<[Glyph]>>) -> Self {
        let glyphs: usize = rows.iter().map(|row| row.len()).sum();
        // moon glyphs are 4 bytes in UTF-8
        let mut text = String::with_capacity(glyphs * 4 + rows.len());
        for row in &rows {
            for glyph in row.iter() {
                text.push_str(glyph.as_str());
            }
            text.push('\n');
        }
        Self { rows, text }
    }

    /// Glyph rows, top to bottom.
    pub fn rows(&self) -> &[Box<[Glyph]>] {
        &self.rows
    }

    /// Number of rows (source bitmap height).
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Glyphs per row (source bitmap width / 4).
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, |row| row.len())
    }

    /// Rendered text, one line per row.
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl std::fmt::Display for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

/// Encode a bitmap into a [`Frame`].
///
/// Each row is partitioned into consecutive, non-overlapping runs of four
/// pixels, left to right, and every run is encoded independently.
///
/// # Errors
///
/// Returns [`EncodingError::UnalignedWidth`] if the width is not a multiple
/// of 4.
pub fn encode_frame(bitmap: &RawBitmap) -> Result<Frame, EncodingError> {
    let width = bitmap.width();
    if width as usize % Glyph::RUN != 0 {
        return Err(EncodingError::UnalignedWidth { width });
    }

    let rows = bitmap
        .rows()
        .map(|pixels| {
            pixels
                .chunks_exact(Glyph::RUN)
                .map(|run| encode_pixel_quad([run[0] > 0, run[1] > 0, run[2] > 0, run[3] > 0]))
                .collect::<Box<[Glyph]>>()
        })
        .collect();

    Ok(Frame::from_rows(rows))
}
