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

    src/types/optical.rs

    Descriptors for the logical structure of optical images: tracks,
    sessions and partitions.
*/

use std::fmt::{self, Display, Formatter};

/// The type of data held by a track.
#[derive(Copy, Clone, Debug, Default, Hash, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrackType {
    /// Red Book audio.
    Audio,
    /// Generic data, cooked 2048-byte sectors.
    #[default]
    Data,
    /// CD Mode 1 data.
    CdMode1,
    /// CD Mode 2, without form discrimination.
    CdMode2Formless,
    /// CD Mode 2 Form 1.
    CdMode2Form1,
    /// CD Mode 2 Form 2.
    CdMode2Form2,
}

impl Display for TrackType {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            TrackType::Audio => write!(f, "Audio"),
            TrackType::Data => write!(f, "Data"),
            TrackType::CdMode1 => write!(f, "Mode 1"),
            TrackType::CdMode2Formless => write!(f, "Mode 2"),
            TrackType::CdMode2Form1 => write!(f, "Mode 2 Form 1"),
            TrackType::CdMode2Form2 => write!(f, "Mode 2 Form 2"),
        }
    }
}

/// How, if at all, subchannel data is stored for a track.
#[derive(Copy, Clone, Debug, Default, Hash, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrackSubchannelType {
    #[default]
    None,
    /// 96 bytes of subchannel, interleaved after each 2352-byte sector in the data file.
    RawInterleaved,
    /// 96 bytes of subchannel per sector, stored packed.
    Packed,
}

/// A single track of an optical image.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Track {
    /// Track number, starting at 1.
    pub sequence: u32,
    pub session: u16,
    pub track_type: TrackType,
    /// First sector of the track, as an absolute LBA.
    pub start_sector: u64,
    /// Last sector of the track, inclusive, as an absolute LBA.
    pub end_sector: u64,
    pub pregap: u64,
    /// Size in bytes of a sector as returned by `read_sector`.
    pub bytes_per_sector: u32,
    /// Size in bytes of a sector as stored in the image, excluding subchannel.
    pub raw_bytes_per_sector: u32,
    pub subchannel_type: TrackSubchannelType,
    /// Byte offset of the track's first sector within the image file.
    pub file_offset: u64,
    pub description: Option<String>,
}

impl Track {
    /// Return the number of sectors in this track.
    pub fn sector_count(&self) -> u64 {
        self.end_sector.saturating_sub(self.start_sector) + 1
    }

    /// Return true if the absolute LBA lies within this track.
    pub fn contains(&self, lba: u64) -> bool {
        lba >= self.start_sector && lba <= self.end_sector
    }
}

/// A recording session of an optical image.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Session {
    pub sequence: u16,
    pub start_track: u32,
    pub end_track: u32,
    pub start_sector: u64,
    pub end_sector: u64,
}

/// A logical partition of an image, as seen by partition-scheme and filesystem collaborators.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Partition {
    pub sequence: u64,
    pub name: Option<String>,
    pub partition_type: String,
    pub start: u64,
    /// Partition length in sectors.
    pub length: u64,
    /// Partition length in bytes.
    pub size: u64,
    /// Partition start in bytes.
    pub offset: u64,
    pub scheme: String,
}
