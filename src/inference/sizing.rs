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

    src/inference/sizing.rs

    Sector size selection for headerless images. A sector size is chosen from
    the file extension where the extension implies one, else from tables of
    known image lengths, else the default of 512 bytes.
*/

use crate::{
    sector_layout::{RawCdLayout, RawCdMode, TrackZeroLayout},
    structure_parsers::cd_sector::{self, CD_RAW_SECTOR_SIZE, CD_RAW_SECTOR_SIZE_SUBCHANNEL},
    DEFAULT_SECTOR_SIZE,
};

/// Raw CD images are accepted up to this many sectors by size-based identification.
pub const CD_MAX_SECTORS: u64 = 360_000;

/// Extensions that fix the sector size of the image.
#[rustfmt::skip]
pub const FIXED_SIZE_EXTENSIONS: [(&str, u32); 13] = [
    ("1kn",  1024),
    ("2kn",  2048),
    ("4kn",  4096),
    ("8kn",  8192),
    ("16kn", 16384),
    ("32kn", 32768),
    ("64kn", 65536),
    ("512",  512),
    ("512e", 512),
    ("128",  128),
    ("256",  256),
    ("2352", 2352),
    ("2448", 2448),
];

/// Image lengths of legacy media that are accepted regardless of alignment.
pub const KNOWN_LENGTHS: [u64; 18] = [
    81664, 116480, 242944, 256256, 287488, 306432, 495872, 988416, 995072, 1021696, 1146624, 1177344, 1222400,
    1255168, 1304320, 174848, 196608, 349696,
];

/// Image lengths of media with a uniform sector size other than 512 bytes.
#[rustfmt::skip]
const ODD_SECTOR_SIZES: [(u64, u32); 19] = [
    (81664,   128),
    (92160,   128),
    (133120,  128),
    (242944,  128),
    (256256,  128),
    (495872,  128),
    (102400,  256),
    (116480,  256),
    (143360,  256),
    (174848,  256),
    (196608,  256),
    (204800,  256),
    (232960,  256),
    (286720,  256),
    (349696,  256),
    (503808,  256),
    (512512,  256),
    (1261568, 1024),
    (1638400, 1024),
];

const ZONE_128: [(u32, u32); 1] = [(26, 128)];
const ZONE_128_256: [(u32, u32); 2] = [(26, 128), (26, 256)];

/// Image lengths of 8" media whose first track is recorded at a lower density.
#[rustfmt::skip]
const TRACK_ZERO_LAYOUTS: [(u64, TrackZeroLayout); 10] = [
    (287488,  TrackZeroLayout { zones: &ZONE_128,     sector_size: 256 }),
    (306432,  TrackZeroLayout { zones: &ZONE_128,     sector_size: 512 }),
    (988416,  TrackZeroLayout { zones: &ZONE_128,     sector_size: 256 }),
    (995072,  TrackZeroLayout { zones: &ZONE_128,     sector_size: 256 }),
    (1021696, TrackZeroLayout { zones: &ZONE_128,     sector_size: 256 }),
    (1146624, TrackZeroLayout { zones: &ZONE_128_256, sector_size: 512 }),
    (1177344, TrackZeroLayout { zones: &ZONE_128_256, sector_size: 512 }),
    (1222400, TrackZeroLayout { zones: &ZONE_128_256, sector_size: 1024 }),
    (1255168, TrackZeroLayout { zones: &ZONE_128_256, sector_size: 1024 }),
    (1304320, TrackZeroLayout { zones: &ZONE_128_256, sector_size: 1024 }),
];

/// The sector arrangement chosen for an image.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SectorSizing {
    Regular(u32),
    TrackZero(TrackZeroLayout),
}

impl SectorSizing {
    /// The size of a regular sector.
    pub fn sector_size(&self) -> u32 {
        match self {
            SectorSizing::Regular(size) => *size,
            SectorSizing::TrackZero(layout) => layout.sector_size,
        }
    }

    pub fn sectors(&self, image_size: u64) -> u64 {
        match self {
            SectorSizing::Regular(size) => image_size / *size as u64,
            SectorSizing::TrackZero(layout) => layout.sectors(image_size),
        }
    }
}

/// Return the sector size fixed by an extension, if any.
pub fn fixed_sector_size(extension: &str) -> Option<u32> {
    FIXED_SIZE_EXTENSIONS
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, size)| *size)
}

/// Return the sector size implied by an extension for an image of `image_size` bytes.
fn extension_sector_size(extension: &str, image_size: u64) -> Option<u32> {
    if let Some(size) = fixed_sector_size(extension) {
        return Some(size);
    }
    match (extension, image_size) {
        ("iso", len) if len % 2048 == 0 => Some(2048),
        ("d81", 819200) => Some(256),
        ("adf" | "adl" | "ssd" | "dsd", 163840 | 327680 | 655360) => Some(256),
        ("adf" | "adl", 819200) => Some(1024),
        ("hdf", len) if len % 256 == 0 => Some(256),
        _ => None,
    }
}

/// Choose the sector arrangement of a headerless image.
pub fn select_sector_size(extension: Option<&str>, image_size: u64) -> SectorSizing {
    if let Some(size) = extension.and_then(|ext| extension_sector_size(ext, image_size)) {
        log::trace!("select_sector_size(): {} bytes from extension {:?}", size, extension);
        return SectorSizing::Regular(size);
    }

    if let Some((_, size)) = ODD_SECTOR_SIZES.iter().find(|(len, _)| *len == image_size) {
        log::trace!("select_sector_size(): {} bytes from image length {}", size, image_size);
        return SectorSizing::Regular(*size);
    }

    if let Some((_, layout)) = TRACK_ZERO_LAYOUTS.iter().find(|(len, _)| *len == image_size) {
        log::trace!("select_sector_size(): Irregular track zero for image length {}", image_size);
        return SectorSizing::TrackZero(*layout);
    }

    SectorSizing::Regular(DEFAULT_SECTOR_SIZE as u32)
}

/// Candidate physical sector sizes of a raw CD image, by image length.
pub fn raw_cd_candidates(image_size: u64) -> impl Iterator<Item = usize> {
    [CD_RAW_SECTOR_SIZE, CD_RAW_SECTOR_SIZE_SUBCHANNEL]
        .into_iter()
        .filter(move |&size| image_size > 0 && image_size % size as u64 == 0)
}

/// Determine whether an image is a raw CD image.
///
/// `first` holds at least the first 16 bytes of the image. `second_sync` is called with a
/// candidate physical sector size and returns whether the second sector also begins with a sync
/// pattern; it is used to choose between 2352 and 2448 byte sectors when the image length is a
/// multiple of both.
pub fn detect_raw_cd<F>(image_size: u64, first: &[u8], mut second_sync: F) -> Option<RawCdLayout>
where
    F: FnMut(usize) -> bool,
{
    if first.len() < 16 || !cd_sector::has_sync(first) {
        return None;
    }

    let candidates: Vec<usize> = raw_cd_candidates(image_size).collect();
    let physical = match candidates.as_slice() {
        [] => return None,
        [only] => *only,
        [..] => candidates
            .iter()
            .copied()
            .find(|&size| second_sync(size))
            .unwrap_or(CD_RAW_SECTOR_SIZE),
    };

    let mode = match cd_sector::is_mode2(first) {
        true => RawCdMode::Mode2,
        false => RawCdMode::Mode1,
    };
    log::debug!("detect_raw_cd(): Raw CD with {} byte sectors, {:?}", physical, mode);

    Some(RawCdLayout {
        mode,
        subchannel: physical == CD_RAW_SECTOR_SIZE_SUBCHANNEL,
    })
}
