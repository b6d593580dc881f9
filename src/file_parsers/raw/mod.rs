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

    src/file_parsers/raw/mod.rs

    The raw sector image codec. A raw sector image is a headerless dump of
    consecutive sectors; everything about it is inferred from its extension,
    its length, its first sectors and its companion sidecar files.
*/

mod optical;
mod writer;

use crate::{
    file_parsers::MediaImageFileFormat,
    inference::{self, sizing, ImageProbe},
    io::{Read, Seek, SeekFrom},
    media_image::{MediaImage, OpticalMediaImage, VerifiableSectorsImage, WritableImage, WritableOpticalImage},
    sector_layout::{self, RawCdLayout, RawCdMode, SectorLayout, TrackZeroLayout},
    sidecar::{self, SidecarTagStore},
    structure_parsers::cd_sector::{self, CD_RAW_SECTOR_SIZE, CD_RAW_SECTOR_SIZE_SUBCHANNEL},
    types::{
        flags::CdFlags,
        image_info::{DumpHardware, ImageInfo},
        optical::{Partition, Session, Track, TrackSubchannelType, TrackType},
        tags::{MediaTagType, SectorTagType},
    },
    util::get_length,
    MediaImageError,
};
use std::{
    fs::File,
    path::{Path, PathBuf},
};

/// Number of leading bytes identification may inspect.
const IDENTIFY_PROBE_LEN: usize = 12;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
enum ImageState {
    #[default]
    New,
    Reading,
    Writing,
    Closed,
}

/// A raw sector image.
///
/// A `RawImage` is constructed empty, then either opened for reading with [MediaImage::open] or
/// created for writing with [WritableImage::create]. Each instance is used for exactly one image.
#[derive(Debug, Default)]
pub struct RawImage {
    state: ImageState,
    file: Option<File>,
    base_path: PathBuf,
    info: ImageInfo,
    tags: SidecarTagStore,
    raw_cd: Option<RawCdLayout>,
    track_zero: Option<TrackZeroLayout>,
    tracks: Vec<Track>,
    sessions: Vec<Session>,
    partitions: Vec<Partition>,
    dump_hardware: Vec<DumpHardware>,
    cicm: Option<Vec<u8>>,
    error_message: Option<String>,
}

/// Return the lower-cased extension of `path`, without the leading dot.
pub(crate) fn extension_of(path: &Path) -> Option<String> {
    path.extension().and_then(|e| e.to_str()).map(|e| e.to_ascii_lowercase())
}

/// Identify a raw sector image from its extension, its length and at most its first 12 bytes.
pub(crate) fn identify_stream<R: Read>(extension: Option<&str>, image_size: u64, source: &mut R) -> bool {
    if image_size == 0 {
        return false;
    }

    if let Some(ext) = extension {
        if let Some(size) = sizing::fixed_sector_size(ext) {
            return image_size % size as u64 == 0;
        }
        if ext == "iso" && image_size % 2048 == 0 {
            return true;
        }
    }

    if image_size % crate::DEFAULT_SECTOR_SIZE as u64 == 0 {
        return true;
    }

    let cd_sized = sizing::raw_cd_candidates(image_size)
        .any(|size| image_size / size as u64 <= sizing::CD_MAX_SECTORS);
    if cd_sized {
        let mut head = [0u8; IDENTIFY_PROBE_LEN];
        if source.read_exact(&mut head).is_ok() && cd_sector::has_sync(&head) {
            return true;
        }
    }

    sizing::KNOWN_LENGTHS.contains(&image_size)
}

impl RawImage {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn extensions() -> Vec<&'static str> {
        vec![
            "1kn", "2kn", "4kn", "8kn", "16kn", "32kn", "64kn", "512", "512e", "128", "256", "iso", "adf", "adl",
            "d81", "dsk", "hdf", "ima", "img", "ssd", "dsd", "st", "bin", "raw", "2352", "2448",
        ]
    }

    /// The physical layout of a raw CD image, if this is one.
    pub fn raw_cd_layout(&self) -> Option<RawCdLayout> {
        self.raw_cd
    }

    fn detect_raw_cd(
        file: &mut File,
        extension: Option<&str>,
        image_size: u64,
    ) -> Result<Option<RawCdLayout>, MediaImageError> {
        // An extension fixing a non-CD sector size rules out raw CD sectors.
        if let Some(size) = extension.and_then(sizing::fixed_sector_size) {
            if size as usize != CD_RAW_SECTOR_SIZE && size as usize != CD_RAW_SECTOR_SIZE_SUBCHANNEL {
                return Ok(None);
            }
        }
        if image_size < 16 {
            return Ok(None);
        }

        let mut head = [0u8; 16];
        file.seek(SeekFrom::Start(0))?;
        file.read_exact(&mut head)?;

        Ok(sizing::detect_raw_cd(image_size, &head, |size| {
            let mut sync = [0u8; 12];
            file.seek(SeekFrom::Start(size as u64)).is_ok()
                && file.read_exact(&mut sync).is_ok()
                && cd_sector::has_sync(&sync)
        }))
    }

    /// Build the single track, session and partition an optical raw image holds.
    fn build_optical_layout(&mut self) {
        if !self.info.media_type.is_optical() || self.info.sectors == 0 {
            self.tracks.clear();
            self.sessions.clear();
            self.partitions.clear();
            return;
        }

        let (track_type, raw_bytes_per_sector) = match self.raw_cd.map(|cd| cd.mode) {
            Some(RawCdMode::Mode1) => (TrackType::CdMode1, CD_RAW_SECTOR_SIZE as u32),
            Some(RawCdMode::Mode2) => (TrackType::CdMode2Formless, CD_RAW_SECTOR_SIZE as u32),
            None => (TrackType::Data, self.info.sector_size),
        };
        let subchannel_type = match self.raw_cd.is_some_and(|cd| cd.subchannel) {
            true => TrackSubchannelType::RawInterleaved,
            false => TrackSubchannelType::None,
        };

        let track = Track {
            sequence: 1,
            session: 1,
            track_type,
            start_sector: 0,
            end_sector: self.info.sectors - 1,
            pregap: 0,
            bytes_per_sector: self.info.sector_size,
            raw_bytes_per_sector,
            subchannel_type,
            file_offset: 0,
            description: None,
        };
        self.set_single_track(track);
    }

    fn set_single_track(&mut self, track: Track) {
        self.sessions = vec![Session {
            sequence: track.session,
            start_track: track.sequence,
            end_track: track.sequence,
            start_sector: track.start_sector,
            end_sector: track.end_sector,
        }];
        self.partitions = vec![Partition {
            sequence: 0,
            name: None,
            partition_type: track.track_type.to_string(),
            start: track.start_sector,
            length: track.sector_count(),
            size: track.sector_count() * track.bytes_per_sector as u64,
            offset: track.file_offset,
            scheme: "Optical".to_string(),
        }];
        self.tracks = vec![track];
    }

    fn check_range(&self, address: u64, count: u64) -> Result<(), MediaImageError> {
        match address.checked_add(count) {
            Some(end) if end <= self.info.sectors => Ok(()),
            _ => Err(MediaImageError::OutOfRange {
                address,
                count,
                sectors: self.info.sectors,
            }),
        }
    }

    fn file_mut(&mut self) -> Result<&mut File, MediaImageError> {
        match self.state {
            ImageState::Reading | ImageState::Writing => self.file.as_mut().ok_or(MediaImageError::NotOpen),
            _ => Err(MediaImageError::NotOpen),
        }
    }

    /// Return the byte offset of the physical sector at `address`.
    fn sector_offset(&self, address: u64) -> u64 {
        match (self.raw_cd, self.track_zero) {
            (Some(cd), _) => address * cd.physical_size() as u64,
            (None, Some(zones)) => zones.offset_of(address),
            (None, None) => address * self.info.sector_size as u64,
        }
    }
}

impl MediaImage for RawImage {
    fn format(&self) -> MediaImageFileFormat {
        MediaImageFileFormat::RawSectorImage
    }

    fn identify(&self, path: &Path) -> bool {
        let Ok(mut file) = File::open(path) else {
            return false;
        };
        let Ok(image_size) = get_length(&mut file) else {
            return false;
        };
        identify_stream(extension_of(path).as_deref(), image_size, &mut file)
    }

    fn open(&mut self, path: &Path) -> Result<(), MediaImageError> {
        if self.state != ImageState::New {
            return Err(MediaImageError::AlreadyOpen);
        }

        let mut file = File::open(path).map_err(|e| MediaImageError::Unreadable(e.to_string()))?;
        let image_size = get_length(&mut file).map_err(|e| MediaImageError::Unreadable(e.to_string()))?;
        if image_size == 0 {
            return Err(MediaImageError::Unreadable("Image file is empty".to_string()));
        }

        let extension = extension_of(path);
        let raw_cd = Self::detect_raw_cd(&mut file, extension.as_deref(), image_size)
            .map_err(|e| MediaImageError::Unreadable(e.to_string()))?;

        let base_path = sidecar::base_path(path);
        let mut tags = SidecarTagStore::load(&base_path);
        log::debug!("RawImage::open(): Loaded {} sidecar tags", tags.len());

        let probe = ImageProbe {
            extension,
            image_size,
            raw_cd,
        };
        let inference = inference::infer(&probe, &mut tags);
        if inference.info.sectors == 0 {
            return Err(MediaImageError::Unreadable(format!(
                "Image of {} bytes holds no whole sectors",
                image_size
            )));
        }

        self.info = inference.info;
        if let Ok(metadata) = file.metadata() {
            self.info.creation_time = metadata.created().ok();
            self.info.last_modification_time = metadata.modified().ok();
        }
        self.raw_cd = inference.raw_cd;
        self.track_zero = inference.track_zero;
        self.tags = tags;
        self.cicm = sidecar::load_cicm(&base_path);
        self.base_path = base_path;
        self.file = Some(file);
        self.build_optical_layout();
        self.state = ImageState::Reading;

        log::debug!(
            "RawImage::open(): {} sectors of {} bytes, media type {}",
            self.info.sectors,
            self.info.sector_size,
            self.info.media_type
        );
        Ok(())
    }

    fn info(&self) -> &ImageInfo {
        &self.info
    }

    fn read_sectors(&mut self, address: u64, count: u64) -> Result<Vec<u8>, MediaImageError> {
        self.check_range(address, count)?;
        let base = self.sector_offset(address);

        match (self.raw_cd, self.track_zero) {
            (Some(cd), _) => {
                let layout = cd.user_data();
                let data = sector_layout::read_sectors(self.file_mut()?, base, &layout, count)?;
                match cd.mode {
                    RawCdMode::Mode1 => Ok(data),
                    RawCdMode::Mode2 => Ok(data
                        .chunks_exact(layout.size)
                        .flat_map(cd_sector::mode2_user_data)
                        .copied()
                        .collect()),
                }
            }
            (None, Some(zones)) => {
                let end = zones.offset_of(address + count);
                sector_layout::read_span(self.file_mut()?, base, end)
            }
            (None, None) => {
                let layout = SectorLayout::plain(self.info.sector_size as usize);
                sector_layout::read_sectors(self.file_mut()?, base, &layout, count)
            }
        }
    }

    fn read_sectors_long(&mut self, address: u64, count: u64) -> Result<Vec<u8>, MediaImageError> {
        let Some(cd) = self.raw_cd else {
            return Err(MediaImageError::Unsupported(
                "Long sectors are only stored by raw CD images".to_string(),
            ));
        };
        self.check_range(address, count)?;
        let base = self.sector_offset(address);
        sector_layout::read_sectors(self.file_mut()?, base, &cd.long(), count)
    }

    /// Read a sector tag. `CdTrackFlags` describes the whole track and is returned as a single
    /// byte regardless of `count`.
    fn read_sectors_tag(&mut self, address: u64, count: u64, tag: SectorTagType) -> Result<Vec<u8>, MediaImageError> {
        if !self.info.readable_sector_tags.contains(&tag) {
            return Err(MediaImageError::Unsupported(format!("Sector tag {} is not stored in this image", tag)));
        }
        self.check_range(address, count)?;

        if tag == SectorTagType::CdTrackFlags {
            return Ok(vec![CdFlags::DATA_TRACK.bits()]);
        }

        let layout = self
            .raw_cd
            .and_then(|cd| cd.tag(tag))
            .ok_or_else(|| MediaImageError::Unsupported(format!("Sector tag {} is not stored in this image", tag)))?;
        let base = self.sector_offset(address);
        sector_layout::read_sectors(self.file_mut()?, base, &layout, count)
    }

    fn read_media_tag(&self, tag: MediaTagType) -> Result<Vec<u8>, MediaImageError> {
        self.tags.get(tag).map(|data| data.to_vec()).ok_or(MediaImageError::NotPresent)
    }

    fn dump_hardware(&self) -> Option<&[DumpHardware]> {
        match self.dump_hardware.is_empty() {
            true => None,
            false => Some(&self.dump_hardware),
        }
    }

    fn cicm_metadata(&self) -> Option<&[u8]> {
        self.cicm.as_deref()
    }

    fn as_optical(&self) -> Option<&dyn OpticalMediaImage> {
        match self.info.media_type.is_optical() {
            true => Some(self),
            false => None,
        }
    }

    fn as_optical_mut(&mut self) -> Option<&mut dyn OpticalMediaImage> {
        match self.info.media_type.is_optical() {
            true => Some(self),
            false => None,
        }
    }

    fn as_verifiable(&self) -> Option<&dyn VerifiableSectorsImage> {
        Some(self)
    }

    fn as_verifiable_mut(&mut self) -> Option<&mut dyn VerifiableSectorsImage> {
        Some(self)
    }

    fn as_writable(&self) -> Option<&dyn WritableImage> {
        Some(self)
    }

    fn as_writable_mut(&mut self) -> Option<&mut dyn WritableImage> {
        Some(self)
    }

    fn as_writable_optical_mut(&mut self) -> Option<&mut dyn WritableOpticalImage> {
        match self.info.media_type.is_optical() {
            true => Some(self),
            false => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure_parsers::cd_sector::CD_SYNC;
    use std::io::Cursor;

    /// A reader that fails the test if more than the identification probe is read.
    struct BoundedReader<'a> {
        inner: Cursor<&'a [u8]>,
        read: usize,
    }

    impl Read for BoundedReader<'_> {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            let n = self.inner.read(buf)?;
            self.read += n;
            assert!(self.read <= IDENTIFY_PROBE_LEN, "identification read {} bytes", self.read);
            Ok(n)
        }
    }

    fn identify(extension: Option<&str>, image_size: u64, head: &[u8]) -> bool {
        let mut reader = BoundedReader {
            inner: Cursor::new(head),
            read: 0,
        };
        identify_stream(extension, image_size, &mut reader)
    }

    #[test]
    fn test_identify_extension_rules() {
        assert!(identify(Some("4kn"), 4096 * 3, &[]));
        assert!(!identify(Some("4kn"), 4096 * 3 + 512, &[]));
        assert!(identify(Some("128"), 128 * 7, &[]));
        assert!(identify(Some("2448"), 2448 * 2, &[]));
        assert!(!identify(Some("2352"), 2352 * 2 + 1, &CD_SYNC));
        // A non-multiple .iso falls through to the generic rules.
        assert!(identify(Some("iso"), 512 * 3, &[]));
    }

    #[test]
    fn test_identify_fallbacks() {
        assert!(identify(Some("img"), 1_474_560, &[]));
        assert!(!identify(Some("img"), 0, &[]));
        assert!(identify(None, 2352 * 3, &CD_SYNC));
        assert!(!identify(None, 2352 * 3, &[0u8; 12]));
        assert!(identify(None, 116_480, &[]));
        assert!(identify(Some("img"), 81_664, &[]));
        assert!(!identify(Some("img"), 1000, &[0u8; 12]));
    }

    #[test]
    fn test_identify_rejects_oversized_cd() {
        let len = 2352 * (sizing::CD_MAX_SECTORS + 1);
        assert!(!identify(None, len, &CD_SYNC));
    }
}
