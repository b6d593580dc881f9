/*
    FluxFox
    https://github.com/dbalsom/fluxfox

    Copyright 2024 Daniel Balsom

    Permission is hereby granted, free of charge, to any person obtaining a
    copy of this software and associated documentation files (the “Software”),
    to deal in the Software without restriction, including without limitation
    the rights to use, copy, modify, merge, publish, distribute, sublicense,
    and/or sell copies of the Software, and to permit persons to whom the
    Software is furnished to do so, subject to the following conditions:

    The above copyright notice and this permission notice shall be included in
    all copies or substantial portions of the Software.

    THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
    IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
    FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
    AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
    LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
    FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
    DEALINGS IN THE SOFTWARE.

    --------------------------------------------------------------------------

    src/detect.rs

    Image format detection.
*/

use crate::{
    file_parsers::{MediaImageFileFormat, IMAGE_FORMATS},
    MediaImageError,
};
use std::path::Path;

/// Returns a list of advertised file extensions supported by available image formats.
/// This is a convenience function for use in file dialogs - detection is not limited to these
/// extensions.
pub fn supported_extensions() -> Vec<&'static str> {
    IMAGE_FORMATS.iter().flat_map(|f| f.extensions()).collect()
}

/// Returns a MediaImageFileFormat enum variant based on the file extension provided. If the
/// extension is not recognized, None is returned.
pub fn format_from_ext(ext: &str) -> Option<MediaImageFileFormat> {
    let ext = ext.trim_start_matches('.').to_lowercase();
    IMAGE_FORMATS
        .iter()
        .find(|format| format.extensions().contains(&ext.as_str()))
        .copied()
}

/// Attempt to detect the format of an image file. Formats are tried in order and the first one
/// that identifies the file is returned. If none do, Unrecognized is returned.
pub fn detect_image_format(path: &Path) -> Result<MediaImageFileFormat, MediaImageError> {
    for format in IMAGE_FORMATS.iter() {
        if format.identify(path) {
            log::debug!("detect_image_format(): {} identified as {}", path.display(), format);
            return Ok(*format);
        }
    }
    Err(MediaImageError::Unrecognized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_ext() {
        assert_eq!(format_from_ext("IMG"), Some(MediaImageFileFormat::RawSectorImage));
        assert_eq!(format_from_ext(".iso"), Some(MediaImageFileFormat::RawSectorImage));
        assert_eq!(format_from_ext("td0"), None);
        assert!(supported_extensions().contains(&"2448"));
    }

    #[test]
    fn test_detect_image_format() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("disk.img");
        std::fs::write(&good, vec![0u8; 1_474_560]).unwrap();
        assert_eq!(detect_image_format(&good), Ok(MediaImageFileFormat::RawSectorImage));

        let bad = dir.path().join("notes.txt");
        std::fs::write(&bad, b"not a disk image").unwrap();
        assert_eq!(detect_image_format(&bad), Err(MediaImageError::Unrecognized));
        assert_eq!(
            detect_image_format(&dir.path().join("missing.img")),
            Err(MediaImageError::Unrecognized)
        );
    }
}
