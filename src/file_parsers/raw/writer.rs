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

    src/file_parsers/raw/writer.rs

    Creation and writing of raw sector images. Only plain user data is
    written; media tags are buffered and persisted as sidecar files when the
    image is closed.
*/

use super::{ImageState, RawImage};
use crate::{
    inference::geometry::geometry_for,
    io::Write,
    media_image::{CreateOptions, WritableImage, WritableOpticalImage},
    sector_layout,
    sidecar::{self, SidecarTagStore},
    types::{
        image_info::{DumpHardware, ImageInfo, ImageMetadata},
        media_type::MediaType,
        optical::Track,
        tags::{MediaTagType, SectorTagType},
    },
    MediaImageError,
    MAXIMUM_SECTOR_SIZE,
};
use std::{fs::OpenOptions, path::Path};
use strum::IntoEnumIterator;

impl RawImage {
    /// Record `err` as the last error message and return it.
    fn fail(&mut self, err: MediaImageError) -> MediaImageError {
        log::error!("RawImage: {}", err);
        self.error_message = Some(err.to_string());
        err
    }

    fn require_writing(&mut self) -> Result<(), MediaImageError> {
        match self.state {
            ImageState::Writing => Ok(()),
            _ => Err(self.fail(MediaImageError::NotOpen)),
        }
    }

    fn create_inner(
        &mut self,
        path: &Path,
        media_type: MediaType,
        options: &CreateOptions,
        sectors: u64,
        sector_size: u32,
    ) -> Result<(), MediaImageError> {
        if self.state != ImageState::New {
            return Err(MediaImageError::AlreadyOpen);
        }
        options.validate(&[])?;
        if sector_size == 0 || sector_size as usize > MAXIMUM_SECTOR_SIZE {
            return Err(MediaImageError::InvalidArgument(format!(
                "Sector size {} is outside of 1..={}",
                sector_size, MAXIMUM_SECTOR_SIZE
            )));
        }
        if sectors == 0 {
            return Err(MediaImageError::InvalidArgument("Image must hold at least one sector".to_string()));
        }
        let image_size = sectors
            .checked_mul(sector_size as u64)
            .ok_or_else(|| MediaImageError::InvalidArgument(format!("{} sectors is too many", sectors)))?;

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .map_err(|e| MediaImageError::Unwritable(e.to_string()))?;
        file.set_len(image_size)
            .map_err(|e| MediaImageError::Unwritable(e.to_string()))?;

        let (cylinders, heads, sectors_per_track) = geometry_for(media_type, sectors).get();
        self.info = ImageInfo {
            sector_size,
            sectors,
            image_size,
            media_type,
            metadata_media_type: media_type.metadata_media_type(),
            cylinders,
            heads,
            sectors_per_track,
            has_sessions: media_type.is_optical(),
            has_partitions: media_type.is_optical(),
            application: Some(env!("CARGO_PKG_NAME").to_string()),
            application_version: Some(env!("CARGO_PKG_VERSION").to_string()),
            ..ImageInfo::default()
        };
        self.raw_cd = None;
        self.track_zero = None;
        self.tags = SidecarTagStore::new();
        self.base_path = sidecar::base_path(path);
        self.file = Some(file);
        self.build_optical_layout();
        self.state = ImageState::Writing;

        log::debug!(
            "RawImage::create(): Created {} image of {} sectors of {} bytes",
            media_type,
            sectors,
            sector_size
        );
        Ok(())
    }

    fn write_sectors_inner(&mut self, data: &[u8], address: u64, count: u64) -> Result<(), MediaImageError> {
        let expected = count.checked_mul(self.info.sector_size as u64);
        if expected != Some(data.len() as u64) {
            return Err(MediaImageError::InvalidArgument(format!(
                "Expected {} sectors of {} bytes, got {} bytes",
                count,
                self.info.sector_size,
                data.len()
            )));
        }
        self.check_range(address, count)?;
        let base = address * self.info.sector_size as u64;
        sector_layout::write_sectors(self.file_mut()?, base, data)
    }

    fn close_inner(&mut self) -> Result<(), MediaImageError> {
        let Some(mut file) = self.file.take() else {
            return Err(MediaImageError::NotOpen);
        };
        file.flush().map_err(|e| MediaImageError::Unwritable(e.to_string()))?;
        file.sync_all().map_err(|e| MediaImageError::Unwritable(e.to_string()))?;
        drop(file);

        self.tags.save(&self.base_path)?;
        if let Some(cicm) = &self.cicm {
            sidecar::save_cicm(&self.base_path, cicm)?;
        }
        Ok(())
    }
}

impl WritableImage for RawImage {
    fn supported_media_types(&self) -> Vec<MediaType> {
        MediaType::iter().collect()
    }

    fn supported_media_tags(&self) -> Vec<MediaTagType> {
        MediaTagType::iter().filter(|tag| sidecar::write_suffix(*tag).is_some()).collect()
    }

    fn supported_sector_tags(&self) -> Vec<SectorTagType> {
        Vec::new()
    }

    fn known_extensions(&self) -> Vec<&'static str> {
        RawImage::extensions()
    }

    fn create(
        &mut self,
        path: &Path,
        media_type: MediaType,
        options: &CreateOptions,
        sectors: u64,
        sector_size: u32,
    ) -> Result<(), MediaImageError> {
        self.create_inner(path, media_type, options, sectors, sector_size)
            .map_err(|e| self.fail(e))
    }

    fn write_sectors(&mut self, data: &[u8], address: u64, count: u64) -> Result<(), MediaImageError> {
        self.require_writing()?;
        self.write_sectors_inner(data, address, count).map_err(|e| self.fail(e))
    }

    fn write_sectors_long(&mut self, _data: &[u8], _address: u64, _count: u64) -> Result<(), MediaImageError> {
        self.require_writing()?;
        Err(self.fail(MediaImageError::Unsupported(
            "Raw sector images do not store long sectors".to_string(),
        )))
    }

    fn write_sectors_tag(
        &mut self,
        _data: &[u8],
        _address: u64,
        _count: u64,
        tag: SectorTagType,
    ) -> Result<(), MediaImageError> {
        self.require_writing()?;
        Err(self.fail(MediaImageError::Unsupported(format!(
            "Raw sector images do not store sector tag {}",
            tag
        ))))
    }

    fn write_media_tag(&mut self, data: &[u8], tag: MediaTagType) -> Result<(), MediaImageError> {
        self.require_writing()?;
        if sidecar::write_suffix(tag).is_none() {
            return Err(self.fail(MediaImageError::Unsupported(format!(
                "Media tag {} cannot be stored as a sidecar",
                tag
            ))));
        }
        if let Some(held) = self.tags.suffix_conflict(tag) {
            return Err(self.fail(MediaImageError::InvalidArgument(format!(
                "Media tag {} shares a sidecar file with {}, which is already written",
                tag, held
            ))));
        }
        self.tags.insert(tag, data.to_vec());
        self.info.readable_media_tags.insert(tag);
        Ok(())
    }

    fn set_geometry(&mut self, cylinders: u32, heads: u32, sectors_per_track: u32) -> Result<(), MediaImageError> {
        self.require_writing()?;
        self.info.cylinders = cylinders;
        self.info.heads = heads;
        self.info.sectors_per_track = sectors_per_track;
        Ok(())
    }

    fn set_metadata(&mut self, metadata: &ImageMetadata) -> Result<(), MediaImageError> {
        self.require_writing()?;
        self.info.apply_metadata(metadata);
        Ok(())
    }

    fn set_dump_hardware(&mut self, dump_hardware: Vec<DumpHardware>) -> Result<(), MediaImageError> {
        self.require_writing()?;
        self.dump_hardware = dump_hardware;
        Ok(())
    }

    fn set_cicm_metadata(&mut self, metadata: Vec<u8>) -> Result<(), MediaImageError> {
        self.require_writing()?;
        self.cicm = Some(metadata);
        Ok(())
    }

    fn close(&mut self) -> Result<(), MediaImageError> {
        self.require_writing()?;
        let result = self.close_inner().map_err(|e| self.fail(e));
        self.state = ImageState::Closed;
        result
    }

    fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }
}

impl WritableOpticalImage for RawImage {
    fn set_tracks(&mut self, tracks: Vec<Track>) -> Result<(), MediaImageError> {
        self.require_writing()?;
        if !self.info.media_type.is_optical() {
            return Err(self.fail(MediaImageError::Unsupported(format!(
                "{} is not an optical media type",
                self.info.media_type
            ))));
        }
        let track = match <[Track; 1]>::try_from(tracks) {
            Ok([track]) => track,
            Err(tracks) => {
                return Err(self.fail(MediaImageError::InvalidArgument(format!(
                    "Raw sector images hold one track, got {}",
                    tracks.len()
                ))));
            }
        };

        if track.end_sector >= self.info.sectors || track.start_sector > track.end_sector {
            return Err(self.fail(MediaImageError::InvalidArgument(format!(
                "Track {} spans sectors {}..={} of a {} sector image",
                track.sequence, track.start_sector, track.end_sector, self.info.sectors
            ))));
        }
        self.set_single_track(track);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::optical::TrackType;

    #[test]
    fn test_writes_before_create_fail() {
        let mut image = RawImage::new();
        assert_eq!(image.write_sector(&[0u8; 512], 0), Err(MediaImageError::NotOpen));
        assert_eq!(image.set_geometry(80, 2, 18), Err(MediaImageError::NotOpen));
        assert_eq!(image.close(), Err(MediaImageError::NotOpen));
        assert!(image.error_message().is_some());
    }

    #[test]
    fn test_create_rejects_options() {
        let dir = tempfile::tempdir().unwrap();
        let mut image = RawImage::new();
        let options = CreateOptions::new().with("compress", "true");
        let result = image.create(&dir.path().join("disk.img"), MediaType::DOS_35_HD, &options, 2880, 512);
        assert!(matches!(result, Err(MediaImageError::InvalidArgument(_))));
        assert!(image.error_message().unwrap().contains("compress"));
    }

    #[test]
    fn test_set_tracks() {
        let dir = tempfile::tempdir().unwrap();
        let mut image = RawImage::new();
        image
            .create(&dir.path().join("disc.iso"), MediaType::CD, &CreateOptions::new(), 100, 2048)
            .unwrap();

        let track = Track {
            sequence: 1,
            session: 1,
            track_type: TrackType::Data,
            end_sector: 99,
            bytes_per_sector: 2048,
            raw_bytes_per_sector: 2048,
            ..Track::default()
        };
        assert!(image.set_tracks(vec![track.clone(), track.clone()]).is_err());
        image.set_tracks(vec![track]).unwrap();
        assert_eq!(image.tracks.len(), 1);
        assert_eq!(image.partitions[0].length, 100);
        image.close().unwrap();
    }
}
