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

    src/file_parsers/mod.rs

    Image file formats and the dispatch from a format to the codec that
    reads and writes it.
*/

use crate::media_image::{MediaImage, WritableImage};
use std::{
    fmt::{self, Display, Formatter},
    path::Path,
};

pub mod raw;

/// `MediaImageFileFormat` is an enumeration listing the image file formats that can be read or
/// written by fluxfox_media.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MediaImageFileFormat {
    /// A headerless sector image. Typically, has extensions IMG, IMA, ISO, BIN.
    RawSectorImage,
}

impl Display for MediaImageFileFormat {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            MediaImageFileFormat::RawSectorImage => write!(f, "Raw Sector Image"),
        }
    }
}

pub(crate) const IMAGE_FORMATS: [MediaImageFileFormat; 1] = [MediaImageFileFormat::RawSectorImage];

impl MediaImageFileFormat {
    /// Return a list of file extensions associated with the format, without the leading dot.
    pub fn extensions(self) -> Vec<&'static str> {
        match self {
            MediaImageFileFormat::RawSectorImage => raw::RawImage::extensions(),
        }
    }

    /// Return true if the file at `path` can be read by this format.
    pub fn identify(self, path: &Path) -> bool {
        self.new_image().identify(path)
    }

    /// Return a new, unopened image of this format.
    pub fn new_image(self) -> Box<dyn MediaImage> {
        match self {
            MediaImageFileFormat::RawSectorImage => Box::new(raw::RawImage::new()),
        }
    }

    /// Return a new, uncreated writable image of this format, or `None` if the format is
    /// read-only.
    pub fn new_writable(self) -> Option<Box<dyn WritableImage>> {
        match self {
            MediaImageFileFormat::RawSectorImage => Some(Box::new(raw::RawImage::new())),
        }
    }
}
