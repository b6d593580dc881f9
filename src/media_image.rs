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

    src/media_image.rs

    Defines the media image contract: the base read trait every codec
    implements, and the capability traits a codec may additionally provide.
    Capabilities are discovered at runtime with the as_* query methods.
*/

use crate::{
    file_parsers::MediaImageFileFormat,
    types::{
        image_info::{DumpHardware, ImageInfo, ImageMetadata},
        media_type::MediaType,
        optical::{Partition, Session, Track},
        tags::{MediaTagType, SectorTagType},
    },
    MediaImageError,
};
use std::{collections::BTreeMap, path::Path};

/// The base read contract of a media image.
///
/// A `MediaImage` is constructed empty, then either opened with [MediaImage::open] or, for
/// writable codecs, created with [WritableImage::create]. All sector addresses are logical block
/// addresses starting at 0.
pub trait MediaImage {
    /// Return the file format implemented by this codec.
    fn format(&self) -> MediaImageFileFormat;

    /// Return true if the file at `path` can be opened by this codec. This is a pure predicate:
    /// it never modifies the codec or the file, and never fails.
    fn identify(&self, path: &Path) -> bool;

    /// Open the image at `path` and populate the image descriptor. An instance can only be opened
    /// once.
    fn open(&mut self, path: &Path) -> Result<(), MediaImageError>;

    /// Return the descriptor of the open image.
    fn info(&self) -> &ImageInfo;

    /// Read the user data of the sector at `address`.
    fn read_sector(&mut self, address: u64) -> Result<Vec<u8>, MediaImageError> {
        self.read_sectors(address, 1)
    }

    /// Read the user data of `count` sectors starting at `address`.
    fn read_sectors(&mut self, address: u64, count: u64) -> Result<Vec<u8>, MediaImageError>;

    /// Read the full physical sector at `address`, including any sync, header, error correction
    /// and subchannel data stored with it.
    fn read_sector_long(&mut self, address: u64) -> Result<Vec<u8>, MediaImageError> {
        self.read_sectors_long(address, 1)
    }

    fn read_sectors_long(&mut self, address: u64, count: u64) -> Result<Vec<u8>, MediaImageError>;

    /// Read a sub-sector component of the sector at `address`.
    fn read_sector_tag(&mut self, address: u64, tag: SectorTagType) -> Result<Vec<u8>, MediaImageError> {
        self.read_sectors_tag(address, 1, tag)
    }

    fn read_sectors_tag(&mut self, address: u64, count: u64, tag: SectorTagType) -> Result<Vec<u8>, MediaImageError>;

    /// Read a media tag. Returns [MediaImageError::NotPresent] if the image carries no such tag.
    fn read_media_tag(&self, tag: MediaTagType) -> Result<Vec<u8>, MediaImageError>;

    /// Return the dump hardware records associated with this image, if any.
    fn dump_hardware(&self) -> Option<&[DumpHardware]> {
        None
    }

    /// Return the CICM XML metadata blob associated with this image, if any.
    fn cicm_metadata(&self) -> Option<&[u8]> {
        None
    }

    fn as_optical(&self) -> Option<&dyn OpticalMediaImage> {
        None
    }
    fn as_optical_mut(&mut self) -> Option<&mut dyn OpticalMediaImage> {
        None
    }
    fn as_verifiable(&self) -> Option<&dyn VerifiableSectorsImage> {
        None
    }
    fn as_verifiable_mut(&mut self) -> Option<&mut dyn VerifiableSectorsImage> {
        None
    }
    fn as_writable(&self) -> Option<&dyn WritableImage> {
        None
    }
    fn as_writable_mut(&mut self) -> Option<&mut dyn WritableImage> {
        None
    }
    fn as_writable_optical_mut(&mut self) -> Option<&mut dyn WritableOpticalImage> {
        None
    }
}

/// Track, session and partition access for optical images.
///
/// Track-relative addresses are relative to the first sector of the track.
pub trait OpticalMediaImage: MediaImage {
    fn tracks(&self) -> Result<&[Track], MediaImageError>;
    fn sessions(&self) -> Result<&[Session], MediaImageError>;
    fn partitions(&self) -> Result<&[Partition], MediaImageError>;

    /// Return the tracks belonging to the specified session.
    fn session_tracks(&self, session: u16) -> Result<Vec<Track>, MediaImageError> {
        Ok(self
            .tracks()?
            .iter()
            .filter(|track| track.session == session)
            .cloned()
            .collect())
    }

    fn read_sector_in_track(&mut self, address: u64, track: u32) -> Result<Vec<u8>, MediaImageError> {
        self.read_sectors_in_track(address, 1, track)
    }
    fn read_sectors_in_track(&mut self, address: u64, count: u64, track: u32) -> Result<Vec<u8>, MediaImageError>;

    fn read_sector_long_in_track(&mut self, address: u64, track: u32) -> Result<Vec<u8>, MediaImageError> {
        self.read_sectors_long_in_track(address, 1, track)
    }
    fn read_sectors_long_in_track(
        &mut self,
        address: u64,
        count: u64,
        track: u32,
    ) -> Result<Vec<u8>, MediaImageError>;

    fn read_sector_tag_in_track(
        &mut self,
        address: u64,
        track: u32,
        tag: SectorTagType,
    ) -> Result<Vec<u8>, MediaImageError> {
        self.read_sectors_tag_in_track(address, 1, track, tag)
    }
    fn read_sectors_tag_in_track(
        &mut self,
        address: u64,
        count: u64,
        track: u32,
        tag: SectorTagType,
    ) -> Result<Vec<u8>, MediaImageError>;
}

/// The result of verifying a range of sectors.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SectorVerification {
    /// `Some(true)` if every sector verified, `Some(false)` if any sector failed, `None` if no
    /// sector failed but at least one could not be verified.
    pub status: Option<bool>,
    pub failing: Vec<u64>,
    pub unknown: Vec<u64>,
}

/// Images whose sectors carry enough redundancy to be checked for integrity.
pub trait VerifiableSectorsImage: MediaImage {
    /// Verify a single sector. Returns `None` if the sector cannot be verified.
    fn verify_sector(&mut self, address: u64) -> Result<Option<bool>, MediaImageError>;

    fn verify_sectors(&mut self, address: u64, count: u64) -> Result<SectorVerification, MediaImageError> {
        let mut result = SectorVerification::default();
        for sector in address..address.saturating_add(count) {
            match self.verify_sector(sector)? {
                Some(true) => {}
                Some(false) => result.failing.push(sector),
                None => result.unknown.push(sector),
            }
        }
        result.status = if !result.failing.is_empty() {
            Some(false)
        }
        else if !result.unknown.is_empty() {
            None
        }
        else {
            Some(true)
        };
        Ok(result)
    }

    /// Verify the image as a whole, for formats that carry an image-level checksum.
    fn verify_media_image(&mut self) -> Option<bool> {
        None
    }
}

/// Images that can be created and written.
///
/// Every write fails fast, returning an error and recording a message retrievable through
/// [WritableImage::error_message]. Writes before [WritableImage::create] fail with
/// [MediaImageError::NotOpen].
pub trait WritableImage: MediaImage {
    fn supported_media_types(&self) -> Vec<MediaType>;
    fn supported_media_tags(&self) -> Vec<MediaTagType>;
    fn supported_sector_tags(&self) -> Vec<SectorTagType>;
    fn known_extensions(&self) -> Vec<&'static str>;

    /// Create a new image at `path`.
    fn create(
        &mut self,
        path: &Path,
        media_type: MediaType,
        options: &CreateOptions,
        sectors: u64,
        sector_size: u32,
    ) -> Result<(), MediaImageError>;

    fn write_sector(&mut self, data: &[u8], address: u64) -> Result<(), MediaImageError> {
        self.write_sectors(data, address, 1)
    }
    fn write_sectors(&mut self, data: &[u8], address: u64, count: u64) -> Result<(), MediaImageError>;

    fn write_sector_long(&mut self, data: &[u8], address: u64) -> Result<(), MediaImageError> {
        self.write_sectors_long(data, address, 1)
    }
    fn write_sectors_long(&mut self, data: &[u8], address: u64, count: u64) -> Result<(), MediaImageError>;

    fn write_sector_tag(&mut self, data: &[u8], address: u64, tag: SectorTagType) -> Result<(), MediaImageError> {
        self.write_sectors_tag(data, address, 1, tag)
    }
    fn write_sectors_tag(
        &mut self,
        data: &[u8],
        address: u64,
        count: u64,
        tag: SectorTagType,
    ) -> Result<(), MediaImageError>;

    /// Buffer a media tag. Tags are persisted on [WritableImage::close].
    fn write_media_tag(&mut self, data: &[u8], tag: MediaTagType) -> Result<(), MediaImageError>;

    fn set_geometry(&mut self, cylinders: u32, heads: u32, sectors_per_track: u32) -> Result<(), MediaImageError>;
    fn set_metadata(&mut self, metadata: &ImageMetadata) -> Result<(), MediaImageError>;
    fn set_dump_hardware(&mut self, dump_hardware: Vec<DumpHardware>) -> Result<(), MediaImageError>;
    fn set_cicm_metadata(&mut self, metadata: Vec<u8>) -> Result<(), MediaImageError>;

    /// Flush buffered state and close the image. Closing an image that is not open fails with
    /// [MediaImageError::NotOpen].
    fn close(&mut self) -> Result<(), MediaImageError>;

    /// Return the message recorded by the last failed operation.
    fn error_message(&self) -> Option<&str>;
}

/// Writable optical images accept a track layout.
pub trait WritableOpticalImage: WritableImage + OpticalMediaImage {
    fn set_tracks(&mut self, tracks: Vec<Track>) -> Result<(), MediaImageError>;
}

/// Format-specific options passed to [WritableImage::create], as string key/value pairs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CreateOptions {
    options: BTreeMap<String, String>,
}

impl CreateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.options.insert(key.to_string(), value.to_string());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(|s| s.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.options.keys().map(|s| s.as_str())
    }

    /// Fail with [MediaImageError::InvalidArgument] if any option is not in `supported`.
    pub fn validate(&self, supported: &[&str]) -> Result<(), MediaImageError> {
        match self.keys().find(|key| !supported.contains(key)) {
            Some(key) => Err(MediaImageError::InvalidArgument(format!("Unsupported option: {}", key))),
            None => Ok(()),
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CreateOptions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        CreateOptions {
            options: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_options_validate() {
        let options = CreateOptions::new();
        assert!(options.validate(&[]).is_ok());

        let options: CreateOptions = [("compress", "true")].into_iter().collect();
        assert_eq!(options.get("compress"), Some("true"));
        assert!(options.validate(&["compress"]).is_ok());
        assert!(matches!(
            options.validate(&[]),
            Err(MediaImageError::InvalidArgument(_))
        ));
    }
}
