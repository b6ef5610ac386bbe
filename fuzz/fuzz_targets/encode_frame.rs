//! Arbitrary pixel buffers through the frame encoder.
//!
//! The first two bytes pick the width, the rest are pixels. Whatever the
//! shape, encoding must either fail cleanly or produce one glyph per run.

#![no_main]

use libfuzzer_sys::fuzz_target;
use moonframe_codec::{RawBitmap, encode_frame};

fuzz_target!(|data: &[u8]| {
    let Some((&[lo, hi], pixels)) = data.split_first_chunk::<2>() else {
        return;
    };

    let width = u32::from(u16::from_le_bytes([lo, hi]) % 64);
    if width == 0 {
        return;
    }
    let height = u32::try_from(pixels.len()).unwrap_or(u32::MAX) / width;
    let len = (width * height) as usize;

    let Ok(bitmap) = RawBitmap::new(width, height, pixels[..len].to_vec()) else {
        return;
    };

    if let Ok(frame) = encode_frame(&bitmap) {
        assert_eq!(width % 4, 0);
        assert_eq!(frame.height(), height as usize);
        assert!(frame.rows().iter().all(|row| row.len() == (width / 4) as usize));
        assert_eq!(frame.text().lines().count(), height as usize);
    }
});
