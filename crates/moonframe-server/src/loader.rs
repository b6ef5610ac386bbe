//! Bitmap directory loading.
//!
//! An animation is a directory of `.bmp` files, one per frame. Files are
//! ordered by name when the frame set is built, so `0000.bmp`, `0001.bmp`, ...
//! play in sequence. Any non-zero luma counts as a lit pixel.

use std::{fs, path::Path};

use moonframe_codec::{FrameSet, Profile, RawBitmap};
use tracing::debug;

use crate::error::LoadError;

const EXTENSION: &str = "bmp";

/// Decode one bitmap file into 8-bit luma pixels.
///
/// # Errors
///
/// - [`LoadError::Decode`] if the bytes are not a readable image
/// - [`LoadError::Bitmap`] if the decoded dimensions are unusable
pub fn decode_bitmap(name: &str, bytes: &[u8]) -> Result<RawBitmap, LoadError> {
    let image = image::load_from_memory(bytes)
        .map_err(|source| LoadError::Decode { name: name.to_string(), source })?;
    let luma = image.to_luma8();
    let (width, height) = luma.dimensions();

    RawBitmap::new(width, height, luma.into_raw())
        .map_err(|source| LoadError::Bitmap { name: name.to_string(), source })
}

/// Read every `.bmp` file in `dir`, keyed by file name.
///
/// Subdirectories and files with any other extension are rejected rather
/// than skipped, so a stray file cannot silently shift frame numbering.
///
/// # Errors
///
/// - [`LoadError::Io`] if the directory or a file cannot be read
/// - [`LoadError::UnexpectedEntry`] for anything that is not a `.bmp` file
/// - any error from [`decode_bitmap`]
pub fn load_dir(dir: &Path) -> Result<Vec<(String, RawBitmap)>, LoadError> {
    let io_err = |source| LoadError::Io { path: dir.to_path_buf(), source };
    let mut bitmaps = Vec::new();

    for entry in fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();

        let is_bmp = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case(EXTENSION));
        if !is_bmp || !path.is_file() {
            return Err(LoadError::UnexpectedEntry(name));
        }

        let bytes =
            fs::read(&path).map_err(|source| LoadError::Io { path: path.clone(), source })?;
        let bitmap = decode_bitmap(&name, &bytes)?;
        debug!(file = %name, width = bitmap.width(), height = bitmap.height(), "bitmap decoded");
        bitmaps.push((name, bitmap));
    }

    Ok(bitmaps)
}

/// Load a directory and build the frame set for `profile`.
///
/// # Errors
///
/// Any error from [`load_dir`], or [`LoadError::Library`] if the frames do
/// not form a valid set.
pub fn load_frame_set(
    profile: Profile,
    dir: &Path,
    caption_prefix: &str,
) -> Result<FrameSet, LoadError> {
    let bitmaps = load_dir(dir)?;
    Ok(FrameSet::build(profile, bitmaps)?.with_caption_prefix(caption_prefix))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use moonframe_codec::{EncodingError, LibraryError};

    use super::*;

    /// Encode a single-row BMP where `lit[i]` sets pixel `i` white.
    fn bmp(lit: &[bool]) -> Vec<u8> {
        let width = u32::try_from(lit.len()).unwrap();
        let img = RgbImage::from_fn(width, 1, |x, _| {
            if lit[x as usize] { Rgb([255, 255, 255]) } else { Rgb([0, 0, 0]) }
        });
        let mut buf = Vec::new();
        DynamicImage::ImageRgb8(img).write_to(&mut Cursor::new(&mut buf), ImageFormat::Bmp).unwrap();
        buf
    }

    #[test]
    fn decode_maps_white_to_lit() {
        let bitmap =
            decode_bitmap("f.bmp", &bmp(&[true, false, false, true, false, true, true, false]))
                .unwrap();

        assert_eq!((bitmap.width(), bitmap.height()), (8, 1));
        let lit: Vec<bool> = bitmap.row(0).unwrap().iter().map(|&p| p > 0).collect();
        assert_eq!(lit, [true, false, false, true, false, true, true, false]);
    }

    #[test]
    fn decode_rejects_garbage() {
        let err = decode_bitmap("junk.bmp", b"not an image").unwrap_err();
        assert!(matches!(err, LoadError::Decode { ref name, .. } if name == "junk.bmp"));
    }

    #[test]
    fn load_dir_reads_every_bitmap() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("0001.bmp"), bmp(&[true; 4])).unwrap();
        fs::write(dir.path().join("0000.bmp"), bmp(&[false; 4])).unwrap();

        let mut names: Vec<String> =
            load_dir(dir.path()).unwrap().into_iter().map(|(name, _)| name).collect();
        names.sort();
        assert_eq!(names, ["0000.bmp", "0001.bmp"]);
    }

    #[test]
    fn load_dir_rejects_foreign_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("0000.bmp"), bmp(&[true; 4])).unwrap();
        fs::write(dir.path().join("notes.txt"), b"hi").unwrap();

        let err = load_dir(dir.path()).unwrap_err();
        assert!(matches!(err, LoadError::UnexpectedEntry(ref name) if name == "notes.txt"));
    }

    #[test]
    fn load_dir_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_dir(&dir.path().join("absent")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn load_frame_set_orders_by_name() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.bmp"), bmp(&[true, true, true, true])).unwrap();
        fs::write(dir.path().join("a.bmp"), bmp(&[false, false, false, false])).unwrap();

        let set = load_frame_set(Profile::Small, dir.path(), "~ ").unwrap();

        assert_eq!(set.len(), 2);
        assert_eq!(set.frame(0).unwrap().rows()[0][0].bits(), 0b0000);
        assert_eq!(set.frame(1).unwrap().rows()[0][0].bits(), 0b1111);
        assert!(set.payload(1).unwrap().ends_with("~ 2/2"));
    }

    #[test]
    fn load_frame_set_rejects_unaligned_width() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("0000.bmp"), bmp(&[true; 6])).unwrap();

        let err = load_frame_set(Profile::Big, dir.path(), "-# ").unwrap_err();
        assert!(matches!(
            err,
            LoadError::Library(LibraryError::Encoding {
                source: EncodingError::UnalignedWidth { width: 6 },
                ..
            })
        ));
    }

    #[test]
    fn load_frame_set_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_frame_set(Profile::Small, dir.path(), "-# ").unwrap_err();
        assert!(matches!(err, LoadError::Library(LibraryError::Empty(_))));
    }
}
