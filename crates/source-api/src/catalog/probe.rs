//! Cheap content sniffing used when hydrating filesystem entries.

use std::path::Path;

use image::{ImageError, ImageReader};

use crate::error::SourceError;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp"];

/// Number of leading bytes inspected for NUL bytes.
const BINARY_SNIFF_LEN: usize = 8192;

pub(super) fn has_image_extension(path: &Path) -> bool {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => IMAGE_EXTENSIONS
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(ext)),
        None => false,
    }
}

pub(super) fn is_binary(bytes: &[u8]) -> bool {
    let check_len = bytes.len().min(BINARY_SNIFF_LEN);
    bytes[..check_len].contains(&0)
}

/// Pixel dimensions read from the image header, without decoding pixels.
///
/// A header the decoder does not understand yields `Ok(None)`.
pub(super) fn image_dimensions(path: &Path) -> Result<Option<(u32, u32)>, SourceError> {
    let reader = ImageReader::open(path)
        .and_then(ImageReader::with_guessed_format)
        .map_err(|err| SourceError::io(path, err))?;
    match reader.into_dimensions() {
        Ok(dimensions) => Ok(Some(dimensions)),
        Err(ImageError::IoError(err)) => Err(SourceError::io(path, err)),
        Err(err) => {
            tracing::debug!(path = %path.display(), error = %err, "unreadable image header");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use image::RgbImage;

    use super::*;

    #[test]
    fn reads_dimensions_for_each_format() {
        let dir = tempfile::tempdir().expect("tempdir");
        for (name, width, height) in [("a.png", 64, 32), ("b.jpg", 12, 7), ("c.bmp", 16, 9)] {
            let path = dir.path().join(name);
            RgbImage::new(width, height).save(&path).expect("encode");
            assert_eq!(
                image_dimensions(&path).expect("header"),
                Some((width, height)),
                "{name}"
            );
        }
    }

    #[test]
    fn format_follows_content_not_extension() {
        let dir = tempfile::tempdir().expect("tempdir");
        let encoded = dir.path().join("real.png");
        RgbImage::new(3, 4).save(&encoded).expect("encode");
        let renamed = dir.path().join("misnamed.jpg");
        fs::rename(&encoded, &renamed).expect("rename");
        assert_eq!(image_dimensions(&renamed).expect("header"), Some((3, 4)));
    }

    #[test]
    fn garbage_headers_have_no_dimensions() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("broken.png");
        fs::write(&path, b"not really an image").expect("write");
        assert_eq!(image_dimensions(&path).expect("no io error"), None);
    }

    #[test]
    fn missing_files_are_io_errors() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = image_dimensions(&dir.path().join("gone.png")).expect_err("missing");
        assert!(matches!(err, SourceError::Io { .. }));
    }

    #[test]
    fn extension_match_ignores_case() {
        assert!(has_image_extension(Path::new("a/B.PNG")));
        assert!(!has_image_extension(Path::new("notes.txt")));
    }
}
