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

    src/file_parsers/raw/optical.rs

    Track-relative access and sector verification for raw sector images.
*/

use super::RawImage;
use crate::{
    media_image::{MediaImage, OpticalMediaImage, VerifiableSectorsImage},
    structure_parsers::cd_sector::{self, CD_RAW_SECTOR_SIZE},
    types::{
        optical::{Partition, Session, Track},
        tags::SectorTagType,
    },
    MediaImageError,
};

impl RawImage {
    /// Resolve a track-relative address to an absolute one. A raw image holds a single track.
    fn track_address(&self, address: u64, count: u64, track: u32) -> Result<u64, MediaImageError> {
        self.require_optical()?;
        match self.tracks.first() {
            Some(first) if track == first.sequence => Ok(first.start_sector + address),
            _ => Err(MediaImageError::OutOfRange {
                address,
                count,
                sectors: self.info.sectors,
            }),
        }
    }

    fn require_optical(&self) -> Result<(), MediaImageError> {
        match self.info.media_type.is_optical() {
            true => Ok(()),
            false => Err(MediaImageError::Unsupported(format!(
                "{} is not an optical media type",
                self.info.media_type
            ))),
        }
    }
}

impl OpticalMediaImage for RawImage {
    fn tracks(&self) -> Result<&[Track], MediaImageError> {
        self.require_optical()?;
        Ok(&self.tracks)
    }

    fn sessions(&self) -> Result<&[Session], MediaImageError> {
        self.require_optical()?;
        Ok(&self.sessions)
    }

    fn partitions(&self) -> Result<&[Partition], MediaImageError> {
        self.require_optical()?;
        Ok(&self.partitions)
    }

    fn read_sectors_in_track(&mut self, address: u64, count: u64, track: u32) -> Result<Vec<u8>, MediaImageError> {
        let address = self.track_address(address, count, track)?;
        self.read_sectors(address, count)
    }

    fn read_sectors_long_in_track(
        &mut self,
        address: u64,
        count: u64,
        track: u32,
    ) -> Result<Vec<u8>, MediaImageError> {
        let address = self.track_address(address, count, track)?;
        self.read_sectors_long(address, count)
    }

    fn read_sectors_tag_in_track(
        &mut self,
        address: u64,
        count: u64,
        track: u32,
        tag: SectorTagType,
    ) -> Result<Vec<u8>, MediaImageError> {
        let address = self.track_address(address, count, track)?;
        self.read_sectors_tag(address, count, tag)
    }
}

impl VerifiableSectorsImage for RawImage {
    /// Check the EDC of a raw CD sector. Images without raw sectors carry nothing to verify and
    /// report `None`.
    fn verify_sector(&mut self, address: u64) -> Result<Option<bool>, MediaImageError> {
        if self.raw_cd.is_none() {
            self.check_range(address, 1)?;
            return Ok(None);
        }
        let sector = self.read_sector_long(address)?;
        let result = cd_sector::verify_edc(&sector[..CD_RAW_SECTOR_SIZE]);
        if result == Some(false) {
            log::debug!("verify_sector(): EDC mismatch in sector {}", address);
        }
        Ok(result)
    }
}
