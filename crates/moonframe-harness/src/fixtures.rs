//! Small synthetic animations.

use moonframe_codec::{FrameLibrary, FrameSet, LibraryError, Profile, RawBitmap};

const WIDTH: u32 = 8;
const HEIGHT: u32 = 2;

/// Bitmaps for an `frames`-long animation: 8x2 pixels, frame `i` lighting the
/// runs that spell `i` in binary. Identifiers are zero-padded file names.
///
/// # Errors
///
/// Returns [`LibraryError::Encoding`] if a bitmap cannot be built.
pub fn bitmaps(frames: usize) -> Result<Vec<(String, RawBitmap)>, LibraryError> {
    (0..frames)
        .map(|i| {
            let identifier = format!("{i:04}.bmp");
            let pixels = (0..(WIDTH * HEIGHT) as usize)
                .map(|p| if i & (1 << (p / 4)) != 0 { 255 } else { 0 })
                .collect();
            let bitmap = RawBitmap::new(WIDTH, HEIGHT, pixels).map_err(|source| {
                LibraryError::Encoding { identifier: identifier.clone(), source }
            })?;
            Ok((identifier, bitmap))
        })
        .collect()
}

/// Encoded frame set of `frames` frames for `profile`.
///
/// # Errors
///
/// Returns [`LibraryError::Empty`] if `frames` is zero.
pub fn frame_set(profile: Profile, frames: usize) -> Result<FrameSet, LibraryError> {
    FrameSet::build(profile, bitmaps(frames)?)
}

/// Library with both profiles loaded, `frames` frames each.
///
/// # Errors
///
/// Returns [`LibraryError::Empty`] if `frames` is zero.
pub fn library(frames: usize) -> Result<FrameLibrary, LibraryError> {
    let mut library = FrameLibrary::new();
    for profile in Profile::ALL {
        library.insert(frame_set(profile, frames)?);
    }
    Ok(library)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bitmaps_are_named_in_order() {
        let names: Vec<String> = bitmaps(3).unwrap().into_iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["0000.bmp", "0001.bmp", "0002.bmp"]);
    }

    #[test]
    fn frame_lights_runs_spelling_its_index() {
        let set = frame_set(Profile::Small, 4).unwrap();
        let runs: Vec<u8> = set.frame(3).unwrap().rows()[0].iter().map(|g| g.bits()).collect();
        assert_eq!(runs, [0b1111, 0b1111]);
        assert!(set.frame(0).unwrap().rows().iter().flatten().all(|g| g.bits() == 0));
    }

    #[test]
    fn zero_frames_is_an_error() {
        assert!(matches!(frame_set(Profile::Big, 0), Err(LibraryError::Empty(_))));
        assert!(library(0).is_err());
    }
}
