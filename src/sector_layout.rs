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

    src/sector_layout.rs

    Byte layout arithmetic for extracting sectors and sub-sector components
    from a sector image.

    A SectorLayout describes where one component lives inside each physical
    sector as an (offset, size, skip) triple: skip `offset` bytes, take `size`
    bytes, then skip `skip` bytes to reach the end of the physical sector.
    Multi-sector reads walk consecutive physical sectors with a single seek.
*/

use crate::{
    io::{BufReader, Read, ReadSeek, SeekFrom, WriteSeek},
    structure_parsers::cd_sector::{CD_RAW_SECTOR_SIZE, CD_RAW_SECTOR_SIZE_SUBCHANNEL, CD_SUBCHANNEL_SIZE},
    types::tags::SectorTagType,
    MediaImageError,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SectorLayout {
    pub offset: usize,
    pub size: usize,
    pub skip: usize,
}

impl SectorLayout {
    pub const fn new(offset: usize, size: usize, skip: usize) -> Self {
        Self { offset, size, skip }
    }

    /// A layout that takes every byte of each sector.
    pub const fn plain(sector_size: usize) -> Self {
        Self::new(0, sector_size, 0)
    }

    /// The size of the physical sector this layout walks.
    pub fn stride(&self) -> usize {
        self.offset + self.size + self.skip
    }

    pub fn is_contiguous(&self) -> bool {
        self.offset == 0 && self.skip == 0
    }

    fn with_extra_skip(self, extra: usize) -> Self {
        Self::new(self.offset, self.size, self.skip + extra)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RawCdMode {
    Mode1,
    Mode2,
}

/// The physical layout of a raw CD image.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawCdLayout {
    pub mode: RawCdMode,
    /// 96 bytes of subchannel follow each 2352-byte sector.
    pub subchannel: bool,
}

impl RawCdLayout {
    pub fn physical_size(&self) -> usize {
        match self.subchannel {
            true => CD_RAW_SECTOR_SIZE_SUBCHANNEL,
            false => CD_RAW_SECTOR_SIZE,
        }
    }

    fn subchannel_skip(&self) -> usize {
        match self.subchannel {
            true => CD_SUBCHANNEL_SIZE,
            false => 0,
        }
    }

    /// Layout of user data reads. Mode 2 reads take the full 2352 bytes, which the caller reduces
    /// to the 2336-byte sub-header and user data form.
    pub fn user_data(&self) -> SectorLayout {
        match self.mode {
            RawCdMode::Mode1 => SectorLayout::new(16, 2048, 288),
            RawCdMode::Mode2 => SectorLayout::new(0, 2352, 0),
        }
        .with_extra_skip(self.subchannel_skip())
    }

    /// Layout of long reads: the full physical sector including any subchannel.
    pub fn long(&self) -> SectorLayout {
        SectorLayout::plain(self.physical_size())
    }

    /// Layout of a sector tag read, or `None` if the tag is not stored in the sector.
    pub fn tag(&self, tag: SectorTagType) -> Option<SectorLayout> {
        let layout = match tag {
            SectorTagType::CdSectorSync => SectorLayout::new(0, 12, 2340),
            SectorTagType::CdSectorHeader => SectorLayout::new(12, 4, 2336),
            SectorTagType::CdSectorSubHeader => SectorLayout::new(16, 8, 2328),
            SectorTagType::CdSectorEcc => SectorLayout::new(2076, 276, 0),
            SectorTagType::CdSectorEccP => SectorLayout::new(2076, 172, 104),
            SectorTagType::CdSectorEccQ => SectorLayout::new(2248, 104, 0),
            SectorTagType::CdSectorEdc => SectorLayout::new(2064, 4, 284),
            SectorTagType::CdSectorSubchannel if self.subchannel => {
                return Some(SectorLayout::new(CD_RAW_SECTOR_SIZE, CD_SUBCHANNEL_SIZE, 0));
            }
            _ => return None,
        };
        Some(layout.with_extra_skip(self.subchannel_skip()))
    }
}

/// A cylinder zero whose sectors differ in size from the rest of the disk.
///
/// `zones` lists runs of `(count, size)` sectors at the start of the image. All sectors after the
/// zones are `sector_size` bytes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TrackZeroLayout {
    pub zones: &'static [(u32, u32)],
    pub sector_size: u32,
}

impl TrackZeroLayout {
    pub fn zone_sectors(&self) -> u64 {
        self.zones.iter().map(|&(count, _)| count as u64).sum()
    }

    pub fn zone_bytes(&self) -> u64 {
        self.zones.iter().map(|&(count, size)| count as u64 * size as u64).sum()
    }

    /// Total addressable sectors for an image of `image_size` bytes.
    pub fn sectors(&self, image_size: u64) -> u64 {
        self.zone_sectors() + image_size.saturating_sub(self.zone_bytes()) / self.sector_size as u64
    }

    /// Byte offset of the sector at `address`.
    pub fn offset_of(&self, address: u64) -> u64 {
        let mut remaining = address;
        let mut offset = 0;
        for &(count, size) in self.zones {
            let count = count as u64;
            if remaining < count {
                return offset + remaining * size as u64;
            }
            remaining -= count;
            offset += count * size as u64;
        }
        offset + remaining * self.sector_size as u64
    }
}

fn buffer_len(count: u64, size: usize) -> Result<usize, MediaImageError> {
    usize::try_from(count)
        .ok()
        .and_then(|c| c.checked_mul(size))
        .ok_or_else(|| MediaImageError::InvalidArgument(format!("Read of {} sectors is too large", count)))
}

/// Read `count` sectors through `layout`, starting with the physical sector at byte `base`.
pub fn read_sectors<R: ReadSeek>(
    source: &mut R,
    base: u64,
    layout: &SectorLayout,
    count: u64,
) -> Result<Vec<u8>, MediaImageError> {
    let mut buffer = vec![0u8; buffer_len(count, layout.size)?];
    if buffer.is_empty() {
        return Ok(buffer);
    }
    source.seek(SeekFrom::Start(base + layout.offset as u64))?;

    if layout.is_contiguous() {
        source.read_exact(&mut buffer)?;
        return Ok(buffer);
    }

    let gap = (layout.skip + layout.offset) as i64;
    let mut reader = BufReader::with_capacity(layout.stride() * 16, source);
    let mut chunks = buffer.chunks_exact_mut(layout.size).peekable();
    while let Some(chunk) = chunks.next() {
        reader.read_exact(chunk)?;
        if chunks.peek().is_some() {
            reader.seek_relative(gap)?;
        }
    }
    Ok(buffer)
}

/// Read the byte range `[start, end)` of the image.
pub fn read_span<R: ReadSeek>(source: &mut R, start: u64, end: u64) -> Result<Vec<u8>, MediaImageError> {
    let mut buffer = vec![0u8; buffer_len(end.saturating_sub(start), 1)?];
    source.seek(SeekFrom::Start(start))?;
    source.read_exact(&mut buffer)?;
    Ok(buffer)
}

/// Write whole sectors starting at byte `base`.
pub fn write_sectors<W: WriteSeek>(dest: &mut W, base: u64, data: &[u8]) -> Result<(), MediaImageError> {
    dest.seek(SeekFrom::Start(base))?;
    dest.write_all(data)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn raw_cd(sectors: usize, physical: usize) -> Vec<u8> {
        (0..sectors * physical).map(|i| ((i % physical) % 256) as u8 ^ (i / physical) as u8).collect()
    }

    #[test]
    fn test_layouts_cover_physical_sector() {
        for subchannel in [false, true] {
            for mode in [RawCdMode::Mode1, RawCdMode::Mode2] {
                let cd = RawCdLayout { mode, subchannel };
                assert_eq!(cd.user_data().stride(), cd.physical_size());
                assert_eq!(cd.long().stride(), cd.physical_size());
                for tag in [
                    SectorTagType::CdSectorSync,
                    SectorTagType::CdSectorHeader,
                    SectorTagType::CdSectorSubHeader,
                    SectorTagType::CdSectorEcc,
                    SectorTagType::CdSectorEccP,
                    SectorTagType::CdSectorEccQ,
                    SectorTagType::CdSectorEdc,
                ] {
                    assert_eq!(cd.tag(tag).unwrap().stride(), cd.physical_size(), "{}", tag);
                }
            }
        }
        let cd = RawCdLayout { mode: RawCdMode::Mode1, subchannel: false };
        assert!(cd.tag(SectorTagType::CdSectorSubchannel).is_none());
        assert!(cd.tag(SectorTagType::AppleSectorTag).is_none());
    }

    #[test]
    fn test_read_sectors_strided() {
        let image = raw_cd(3, CD_RAW_SECTOR_SIZE);
        let mut cursor = Cursor::new(image.clone());
        let cd = RawCdLayout { mode: RawCdMode::Mode1, subchannel: false };

        let data = read_sectors(&mut cursor, 0, &cd.user_data(), 3).unwrap();
        assert_eq!(data.len(), 3 * 2048);
        for s in 0..3 {
            let physical = s * CD_RAW_SECTOR_SIZE;
            assert_eq!(&data[s * 2048..(s + 1) * 2048], &image[physical + 16..physical + 2064]);
        }

        let header_layout = cd.tag(SectorTagType::CdSectorHeader).unwrap();
        let header = read_sectors(&mut cursor, CD_RAW_SECTOR_SIZE as u64, &header_layout, 2).unwrap();
        assert_eq!(&header[..4], &image[CD_RAW_SECTOR_SIZE + 12..CD_RAW_SECTOR_SIZE + 16]);
        assert_eq!(&header[4..], &image[2 * CD_RAW_SECTOR_SIZE + 12..2 * CD_RAW_SECTOR_SIZE + 16]);
    }

    #[test]
    fn test_read_past_end_fails() {
        let mut cursor = Cursor::new(vec![0u8; 1024]);
        assert!(read_sectors(&mut cursor, 0, &SectorLayout::plain(512), 3).is_err());
        assert_eq!(read_sectors(&mut cursor, 0, &SectorLayout::plain(512), 0).unwrap().len(), 0);
    }

    #[test]
    fn test_track_zero_layout() {
        const ZONES: [(u32, u32); 2] = [(26, 128), (26, 256)];
        let layout = TrackZeroLayout { zones: &ZONES, sector_size: 512 };
        assert_eq!(layout.zone_sectors(), 52);
        assert_eq!(layout.zone_bytes(), 26 * 128 + 26 * 256);
        assert_eq!(layout.sectors(1_146_624), 2272);

        assert_eq!(layout.offset_of(0), 0);
        assert_eq!(layout.offset_of(25), 25 * 128);
        assert_eq!(layout.offset_of(26), 26 * 128);
        assert_eq!(layout.offset_of(52), 26 * 128 + 26 * 256);
        assert_eq!(layout.offset_of(53), 26 * 128 + 26 * 256 + 512);
    }
}
